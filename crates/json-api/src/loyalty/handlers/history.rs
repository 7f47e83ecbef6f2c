//! Loyalty History Handler

use std::sync::Arc;

use kaiten_app::domain::loyalty::models::CardUsage;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// One past card redemption.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsageResponse {
    /// The ledger entry's unique identifier
    pub uuid: Uuid,

    /// Number of the card that was spent
    pub card_number: String,

    /// The roll it was exchanged for
    pub roll_id: Uuid,

    /// When the card was spent
    pub used_at: String,
}

impl From<CardUsage> for UsageResponse {
    fn from(usage: CardUsage) -> Self {
        UsageResponse {
            uuid: usage.uuid,
            card_number: usage.card_number,
            roll_id: usage.roll_id,
            used_at: usage.used_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HistoryResponse {
    /// Past redemptions, newest first
    pub history: Vec<UsageResponse>,
}

/// Loyalty History Handler
///
/// Returns the authenticated user's redemption ledger.
#[endpoint(
    tags("loyalty"),
    summary = "Loyalty Redemption History",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<HistoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let usages = state
        .loyalty
        .history(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(HistoryResponse {
        history: usages.into_iter().map(Into::into).collect(),
    }))
}
