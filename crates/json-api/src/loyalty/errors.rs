//! Loyalty error mapping.

use kaiten_app::domain::loyalty::LoyaltyServiceError;
use salvo::prelude::*;

pub(crate) fn into_status_error(error: LoyaltyServiceError) -> StatusError {
    match error {
        LoyaltyServiceError::NotFound => StatusError::not_found(),
        LoyaltyServiceError::RollNotAvailable => {
            StatusError::bad_request().brief("Roll is not available for redemption")
        }
        LoyaltyServiceError::InvalidData => StatusError::bad_request(),
        LoyaltyServiceError::Sql(error) => {
            tracing::error!(%error, "Loyalty query failed");
            StatusError::internal_server_error()
        }
    }
}
