//! Order Errors

use kaiten_app::domain::orders::OrdersServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => {
            StatusError::bad_request().brief("Cart has no purchasable items")
        }
        OrdersServiceError::NegativeTotal => {
            StatusError::bad_request().brief("Order total cannot be negative")
        }
        OrdersServiceError::UnknownItem => {
            StatusError::bad_request().brief("Cart references an unknown catalog item")
        }
        OrdersServiceError::MissingRequiredData(field) => {
            StatusError::bad_request().brief(format!("Missing required field: {field}"))
        }
        OrdersServiceError::InvalidData => StatusError::bad_request(),
        OrdersServiceError::Forbidden => StatusError::forbidden(),
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
