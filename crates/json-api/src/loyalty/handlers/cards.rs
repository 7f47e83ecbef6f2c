//! Loyalty Cards Handler

use std::sync::Arc;

use kaiten_app::domain::loyalty::models::LoyaltyCard;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, loyalty::errors::into_status_error, state::State};

/// One stamp card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CardResponse {
    /// The card's unique identifier
    pub uuid: Uuid,

    /// Human-readable card number
    pub card_number: String,

    /// Stamps collected so far
    pub filled_rolls: u8,

    /// Whether the card is full and redeemable
    pub is_completed: bool,

    /// When the card was completed, if it is
    pub completed_at: Option<String>,

    /// When the card was started
    pub created_at: String,
}

impl From<LoyaltyCard> for CardResponse {
    fn from(card: LoyaltyCard) -> Self {
        CardResponse {
            uuid: card.uuid.into_uuid(),
            card_number: card.card_number,
            filled_rolls: card.filled_rolls,
            is_completed: card.is_completed,
            completed_at: card.completed_at.map(|at| at.to_string()),
            created_at: card.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CardsResponse {
    /// The user's cards, newest first
    pub cards: Vec<CardResponse>,
}

/// Loyalty Cards Handler
///
/// Returns the authenticated user's stamp cards.
#[endpoint(tags("loyalty"), summary = "List Loyalty Cards", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CardsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cards = state
        .loyalty
        .list_cards(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CardsResponse {
        cards: cards.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use kaiten_app::{domain::loyalty::MockLoyaltyService, ids::CardUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, authed_service, state_with_loyalty};

    use super::*;

    #[tokio::test]
    async fn test_cards_returns_cards() -> TestResult {
        let mut loyalty = MockLoyaltyService::new();

        loyalty
            .expect_list_cards()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|user| {
                Ok(vec![
                    LoyaltyCard {
                        uuid: CardUuid::new(),
                        user_uuid: user,
                        card_number: "KC-0A1B2C3D-0002".to_string(),
                        filled_rolls: 8,
                        is_completed: true,
                        completed_at: Some(Timestamp::UNIX_EPOCH),
                        created_at: Timestamp::UNIX_EPOCH,
                    },
                    LoyaltyCard {
                        uuid: CardUuid::new(),
                        user_uuid: user,
                        card_number: "KC-0A1B2C3D-0001".to_string(),
                        filled_rolls: 3,
                        is_completed: false,
                        completed_at: None,
                        created_at: Timestamp::UNIX_EPOCH,
                    },
                ])
            });

        let service = authed_service(
            state_with_loyalty(loyalty),
            Router::with_path("loyalty/cards").get(handler),
        );

        let response: CardsResponse = TestClient::get("http://example.com/loyalty/cards")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.cards.len(), 2, "expected two cards");

        let completed = response.cards.iter().find(|card| card.is_completed);

        assert_eq!(
            completed.map(|card| card.filled_rolls),
            Some(8),
            "completed card is full"
        );

        Ok(())
    }
}
