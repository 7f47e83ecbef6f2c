//! User Errors

use kaiten_app::domain::users::UsersServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => {
            StatusError::conflict().brief("An account with this email already exists")
        }
        UsersServiceError::InvalidReferralCode => {
            StatusError::bad_request().brief("Unknown referral code")
        }
        UsersServiceError::MissingRequiredData | UsersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid registration payload")
        }
        UsersServiceError::NotFound => StatusError::not_found(),
        UsersServiceError::Sql(source) => {
            error!("users storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
