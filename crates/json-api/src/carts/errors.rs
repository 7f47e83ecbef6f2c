//! Cart Errors

use kaiten_app::domain::carts::CartsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found(),
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be positive")
        }
        CartsServiceError::KindNotAllowed => {
            StatusError::bad_request().brief("This line kind cannot be modified directly")
        }
        CartsServiceError::MissingItemId => {
            StatusError::bad_request().brief("An item id is required for this line kind")
        }
        CartsServiceError::Bonus(source) => StatusError::bad_request().brief(source.to_string()),
        CartsServiceError::InvalidData => StatusError::bad_request(),
        CartsServiceError::Sql(source) => {
            error!("carts storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
