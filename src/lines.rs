//! Cart line model.
//!
//! A cart is an ordered sequence of [`CartLine`] values attached to a user.
//! Lines are a tagged union so that pricing and checkout can match on them
//! exhaustively: catalog lines (rolls and sets) carry a quantity and are
//! priced from the catalog, loyalty lines are free redemptions, and the bonus
//! line is a flat negative discount with no catalog item behind it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminant for cart line kinds, matching the wire-level `item_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A roll from the catalog.
    Roll,
    /// A set from the catalog.
    Set,
    /// A free roll redeemed from a completed loyalty card.
    LoyaltyRoll,
    /// The bonus-points discount line.
    BonusPoints,
}

impl LineKind {
    /// Whether lines of this kind are priced from the catalog.
    #[must_use]
    pub fn is_catalog(self) -> bool {
        matches!(self, Self::Roll | Self::Set)
    }

    /// Whether lines of this kind carry a quantity.
    #[must_use]
    pub fn has_quantity(self) -> bool {
        !matches!(self, Self::BonusPoints)
    }
}

/// One line of a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum CartLine {
    /// A catalog roll.
    Roll {
        /// Catalog id of the roll.
        item_id: Uuid,
        /// Number of units; always positive.
        quantity: u32,
    },
    /// A catalog set.
    Set {
        /// Catalog id of the set.
        item_id: Uuid,
        /// Number of units; always positive.
        quantity: u32,
    },
    /// A free roll from a redeemed loyalty card. Priced at zero.
    LoyaltyRoll {
        /// Catalog id of the whitelisted roll.
        item_id: Uuid,
        /// Number of redeemed units; always positive.
        quantity: u32,
    },
    /// The bonus-points discount. At most one per cart.
    BonusPoints {
        /// Negative amount subtracted from the cart total.
        amount: i64,
    },
}

impl CartLine {
    /// The kind discriminant of this line.
    #[must_use]
    pub fn kind(&self) -> LineKind {
        match self {
            Self::Roll { .. } => LineKind::Roll,
            Self::Set { .. } => LineKind::Set,
            Self::LoyaltyRoll { .. } => LineKind::LoyaltyRoll,
            Self::BonusPoints { .. } => LineKind::BonusPoints,
        }
    }

    /// The catalog item behind this line, if any.
    #[must_use]
    pub fn item_id(&self) -> Option<Uuid> {
        match self {
            Self::Roll { item_id, .. }
            | Self::Set { item_id, .. }
            | Self::LoyaltyRoll { item_id, .. } => Some(*item_id),
            Self::BonusPoints { .. } => None,
        }
    }

    /// Unit count of this line. The bonus line counts as one unit.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Roll { quantity, .. }
            | Self::Set { quantity, .. }
            | Self::LoyaltyRoll { quantity, .. } => *quantity,
            Self::BonusPoints { .. } => 1,
        }
    }

    /// Whether this line occupies the cart slot identified by
    /// `(kind, item_id)`. Adding to an occupied slot merges quantities
    /// instead of appending a second line.
    #[must_use]
    pub fn occupies(&self, kind: LineKind, item_id: Option<Uuid>) -> bool {
        self.kind() == kind && self.item_id() == item_id
    }
}
