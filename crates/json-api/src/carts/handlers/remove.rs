//! Remove Cart Line Handler

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

/// Remove Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RemoveLineRequest {
    /// Line kind to remove
    pub item_type: ItemKind,

    /// The item the line holds; not needed for the bonus line
    pub item_id: Option<Uuid>,
}

/// Remove Cart Line Handler
///
/// Removes one line from the cart. Removing the bonus line returns the
/// points to the balance.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Line",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "No such line"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveLineRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let view = state
        .carts
        .remove_line(user, request.item_type.into(), request.item_id)
        .await
        .map_err(into_status_error)?;

    Ok(Json(view.into()))
}
