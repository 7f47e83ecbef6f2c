//! Use Loyalty Card Handler

use std::sync::Arc;

use kaiten_app::domain::loyalty::models::CardUsage;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// Use Loyalty Card Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UseCardRequest {
    /// The completed card to spend
    pub card_id: Uuid,

    /// The whitelisted roll to receive
    pub roll_id: Uuid,
}

/// Use Loyalty Card Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UseCardResponse {
    /// The spent card's number, kept for the ledger
    pub card_number: String,

    /// The roll added to the cart free of charge
    pub roll_id: Uuid,

    /// When the card was spent
    pub used_at: String,
}

impl From<CardUsage> for UseCardResponse {
    fn from(usage: CardUsage) -> Self {
        UseCardResponse {
            card_number: usage.card_number,
            roll_id: usage.roll_id,
            used_at: usage.used_at.to_string(),
        }
    }
}

/// Use Loyalty Card Handler
///
/// Spends a completed card: the chosen roll lands in the cart at price
/// zero and the card is consumed.
#[endpoint(
    tags("loyalty"),
    summary = "Use Loyalty Card",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Card redeemed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Not Found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UseCardRequest>,
    depot: &mut Depot,
) -> Result<Json<UseCardResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let request = json.into_inner();

    let usage = state
        .loyalty
        .redeem(user, request.card_id.into(), request.roll_id)
        .await
        .map_err(into_status_error)?;

    Ok(Json(usage.into()))
}
