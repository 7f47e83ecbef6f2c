//! Use Bonus Points Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Use Bonus Points Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UseBonusRequest {
    /// Points to convert into a discount
    pub bonus_points: i64,
}

/// Use Bonus Points Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UseBonusResponse {
    /// Points actually applied, after clamping to the cart total
    pub bonus_points_used: i64,

    /// Balance remaining after the debit
    pub remaining_bonus_points: i64,
}

/// Use Bonus Points Handler
///
/// Converts bonus points into a cart discount. The applied amount is capped
/// at the catalog total; a previous application is replaced, not stacked.
#[endpoint(
    tags("cart"),
    summary = "Use Bonus Points",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount applied"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UseBonusRequest>,
    depot: &mut Depot,
) -> Result<Json<UseBonusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let application = state
        .carts
        .use_bonus_points(user, json.into_inner().bonus_points)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UseBonusResponse {
        bonus_points_used: application.applied,
        remaining_bonus_points: application.remaining,
    }))
}
