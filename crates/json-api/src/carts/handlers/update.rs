//! Update Cart Line Handler

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

/// Update Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateLineRequest {
    /// Line kind to update
    pub item_type: ItemKind,

    /// The item the line holds
    pub item_id: Uuid,

    /// New quantity; zero or negative removes the line
    pub quantity: i64,
}

/// Update Cart Line Handler
///
/// Overwrites a line's quantity and returns the repriced cart.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "No such line"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let view = state
        .carts
        .update_quantity(user, request.item_type.into(), request.item_id, request.quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
