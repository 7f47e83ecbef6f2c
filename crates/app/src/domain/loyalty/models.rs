//! Loyalty models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::ids::{CardUuid, UserUuid};

#[derive(Debug, Clone)]
pub struct LoyaltyCard {
    pub uuid: CardUuid,
    pub user_uuid: UserUuid,
    pub card_number: String,
    pub filled_rolls: u8,
    pub is_completed: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A whitelisted roll a completed card can be exchanged for.
#[derive(Debug, Clone)]
pub struct LoyaltyRollOption {
    pub roll_id: Uuid,
    pub name: String,
    pub sale_price: i64,
}

/// One redemption ledger entry. Keeps its own copy of the card number
/// because the card row is gone by the time anyone reads this.
#[derive(Debug, Clone)]
pub struct CardUsage {
    pub uuid: Uuid,
    pub card_uuid: CardUuid,
    pub card_number: String,
    pub roll_id: Uuid,
    pub used_at: Timestamp,
}
