//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, requests::ItemKind, responses::CartResponse},
    extensions::*,
    state::State,
};

/// Add to Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddLineRequest {
    /// Line kind; only roll and set can be added directly
    pub item_type: ItemKind,

    /// The catalog item to add
    pub item_id: Uuid,

    /// Units to add; merged into an existing line for the same item
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Add Cart Line Handler
///
/// Adds a catalog item to the cart and returns the repriced cart.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown catalog item"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let view = state
        .carts
        .add_line(user, request.item_type.into(), request.item_id, request.quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
