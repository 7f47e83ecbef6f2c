//! Loyalty stamp accrual.
//!
//! Every order converts spend into stamps, one per [`SPEND_PER_STAMP`]
//! currency units. Stamps fill an eight-slot card; a full card is completed
//! and overflow rolls into the next card. A user holds at most one active
//! card at a time.

use uuid::Uuid;

/// Spend, in minor currency units, that earns one stamp.
pub const SPEND_PER_STAMP: i64 = 1000;

/// Stamps on a full card.
pub const CARD_CAPACITY: u8 = 8;

/// Stamps earned by an order. Non-positive amounts earn nothing.
#[must_use]
pub fn stamps_for(order_amount: i64) -> u64 {
    if order_amount <= 0 {
        return 0;
    }

    (order_amount / SPEND_PER_STAMP).unsigned_abs()
}

/// Result of applying stamps to the active card.
///
/// `cards_completed` counts cards filled by this accrual, including the
/// previously active one. `leftover` is the fill of the next active card;
/// zero means the accrual landed exactly on a card boundary and no active
/// card remains until the next accrual creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualPlan {
    /// Cards newly completed by this accrual.
    pub cards_completed: u64,
    /// Fill carried into the next active card, `0..CARD_CAPACITY`.
    pub leftover: u8,
}

impl AccrualPlan {
    /// Whether the accrual leaves the card state as it found it.
    #[must_use]
    pub fn is_noop(&self, current_fill: u8) -> bool {
        self.cards_completed == 0 && self.leftover == current_fill
    }
}

/// Distribute stamps over cards, starting from the active card's fill.
///
/// Runs the overflow to exhaustion, so a single order worth sixteen or more
/// stamps completes several cards in one call.
#[must_use]
pub fn plan_accrual(current_fill: u8, stamps: u64) -> AccrualPlan {
    let capacity = u64::from(CARD_CAPACITY);
    let total = u64::from(current_fill.min(CARD_CAPACITY)) + stamps;

    // The remainder is < CARD_CAPACITY, so the narrowing is lossless.
    #[expect(clippy::cast_possible_truncation, reason = "remainder is < 8")]
    let leftover = (total % capacity) as u8;

    AccrualPlan {
        cards_completed: total / capacity,
        leftover,
    }
}

/// Deterministic, human-readable card number: the user id prefix plus a
/// per-user sequence counter. Uniqueness comes from the counter, never from
/// randomness.
#[must_use]
pub fn card_number(user: Uuid, seq: u32) -> String {
    let (prefix, ..) = user.as_fields();

    format!("KC-{prefix:08X}-{seq:04}")
}
