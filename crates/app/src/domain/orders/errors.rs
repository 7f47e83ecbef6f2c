//! Order service errors.

use kaiten::pricing::PricingError;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

use crate::domain::carts::errors::CartsServiceError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("Cart has no purchasable items")]
    EmptyCart,

    #[error("Order total cannot be negative")]
    NegativeTotal,

    #[error("Order belongs to another user")]
    Forbidden,

    #[error("Order not found")]
    NotFound,

    #[error("Cart references an unknown catalog item")]
    UnknownItem,

    #[error("Missing required data: {0}")]
    MissingRequiredData(String),

    #[error("Invalid data")]
    InvalidData,

    #[error("SQL error: {0}")]
    Sql(sqlx::Error),
}

impl From<sqlx::Error> for OrdersServiceError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownItem,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(_: PricingError) -> Self {
        Self::UnknownItem
    }
}

/// Cart failures surfacing through checkout. A line the catalog no longer
/// knows is the only NotFound the shared pricing path can produce.
impl From<CartsServiceError> for OrdersServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::NotFound => Self::UnknownItem,
            CartsServiceError::Sql(sql_error) => Self::Sql(sql_error),
            _ => Self::InvalidData,
        }
    }
}
