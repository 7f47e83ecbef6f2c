//! Cart models.

use kaiten::pricing::PricedCart;

/// A user's cart, priced, together with their spendable balance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
    pub priced: PricedCart,
    /// Current bonus-point balance (after any pending discount was debited).
    pub bonus_points: i64,
}

impl CartView {
    /// Whether the UI should offer spending bonus points right now.
    #[must_use]
    pub fn can_use_bonus(&self) -> bool {
        self.bonus_points > 0 && self.priced.catalog_total > 0
    }
}

/// Outcome of applying bonus points to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusApplication {
    /// Points actually converted into a discount.
    pub applied: i64,
    /// Balance left after the debit.
    pub remaining: i64,
}
