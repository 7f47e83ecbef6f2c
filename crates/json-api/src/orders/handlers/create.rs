//! Create Order Handler

use std::sync::Arc;

use kaiten_app::domain::orders::models::NewOrder;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Contact phone for this delivery
    pub phone: String,

    /// Delivery address
    pub delivery_address: String,

    /// Payment method
    pub payment_method: String,

    /// Optional courier comment
    pub comment: Option<String>,

    /// Client-side total, if the client wants to pin the total it showed.
    /// Must be non-negative.
    pub total_amount: Option<i64>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            phone: request.phone,
            delivery_address: request.delivery_address,
            payment_method: request.payment_method,
            comment: request.comment,
            total_override: request.total_amount,
        }
    }
}

/// Create Order Handler
///
/// Checks the cart out into an order. The cart is cleared and loyalty
/// stamps are credited in the same transaction.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .orders
        .create_order(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
