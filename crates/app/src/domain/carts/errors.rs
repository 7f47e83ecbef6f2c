//! Carts service errors.

use kaiten::pricing::{BonusError, PricingError};
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("no matching cart line or catalog item")]
    NotFound,

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("this line kind cannot be added directly")]
    KindNotAllowed,

    #[error("an item id is required for this line kind")]
    MissingItemId,

    #[error(transparent)]
    Bonus(#[from] BonusError),

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for CartsServiceError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<PricingError> for CartsServiceError {
    fn from(error: PricingError) -> Self {
        // A cart line pointing at a vanished catalog item prices the same as
        // a missing item.
        match error {
            PricingError::UnknownItem { .. } => Self::NotFound,
        }
    }
}
