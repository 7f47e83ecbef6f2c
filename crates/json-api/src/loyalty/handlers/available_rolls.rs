//! Available Loyalty Rolls Handler

use std::sync::Arc;

use kaiten_app::domain::loyalty::models::LoyaltyRollOption;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// A roll a completed card can be exchanged for.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailableRollResponse {
    /// The roll's unique identifier
    pub uuid: Uuid,

    /// The roll's name
    pub name: String,

    /// The roll's regular sale price
    pub sale_price: i64,
}

impl From<LoyaltyRollOption> for AvailableRollResponse {
    fn from(option: LoyaltyRollOption) -> Self {
        AvailableRollResponse {
            uuid: option.roll_id,
            name: option.name,
            sale_price: option.sale_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailableRollsResponse {
    pub rolls: Vec<AvailableRollResponse>,
}

/// Available Loyalty Rolls Handler
///
/// Returns the rolls currently whitelisted for card redemption.
#[endpoint(
    tags("loyalty"),
    summary = "List Redeemable Rolls",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AvailableRollsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let rolls = state
        .loyalty
        .available_rolls()
        .await
        .map_err(into_status_error)?;

    Ok(Json(AvailableRollsResponse {
        rolls: rolls.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use kaiten_app::domain::loyalty::MockLoyaltyService;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{authed_service, state_with_loyalty};

    use super::*;

    #[tokio::test]
    async fn test_available_rolls_returns_whitelist() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty.expect_available_rolls().once().return_once(|| {
            Ok(vec![LoyaltyRollOption {
                roll_id: Uuid::now_v7(),
                name: "Kappa Maki".to_string(),
                sale_price: 250,
            }])
        });

        let service = authed_service(
            state_with_loyalty(loyalty),
            Router::with_path("loyalty/available-rolls").get(handler),
        );

        let response: AvailableRollsResponse =
            TestClient::get("http://example.com/loyalty/available-rolls")
                .send(&service)
                .await
                .take_json()
                .await?;

        assert_eq!(
            response.rolls.first().map(|roll| roll.name.as_str()),
            Some("Kappa Maki")
        );

        Ok(())
    }
}
