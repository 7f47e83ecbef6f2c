//! Cart pricing engine.
//!
//! Resolves unit prices per line kind, computes line and cart totals, and
//! clamps bonus-point discounts against the balance and the priced cart.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::lines::{CartLine, LineKind};

/// Errors from pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A catalog line references an item the catalog does not know.
    #[error("unknown {kind:?} item {item_id}")]
    UnknownItem {
        /// Kind of the offending line.
        kind: LineKind,
        /// The unresolvable catalog id.
        item_id: Uuid,
    },
}

/// Errors from validating a bonus-points application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BonusError {
    /// The requested amount was zero or negative.
    #[error("bonus amount must be positive")]
    NonPositive,

    /// The requested amount exceeds the user's balance.
    #[error("requested {requested} bonus points, balance is {balance}")]
    InsufficientBalance {
        /// Points asked for.
        requested: i64,
        /// Points actually held.
        balance: i64,
    },

    /// The cart has no positive catalog total to discount.
    #[error("cart has nothing to discount")]
    NothingToDiscount,
}

/// Source of catalog unit prices.
pub trait PriceSource {
    /// Sale price of a roll, if it exists.
    fn roll_price(&self, item_id: Uuid) -> Option<i64>;

    /// Set price of a set, if it exists.
    fn set_price(&self, item_id: Uuid) -> Option<i64>;
}

/// Catalog prices loaded up front, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct CatalogPrices {
    rolls: FxHashMap<Uuid, i64>,
    sets: FxHashMap<Uuid, i64>,
}

impl CatalogPrices {
    /// Build a price table from `(id, price)` pairs for rolls and sets.
    pub fn new(
        rolls: impl IntoIterator<Item = (Uuid, i64)>,
        sets: impl IntoIterator<Item = (Uuid, i64)>,
    ) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            sets: sets.into_iter().collect(),
        }
    }
}

impl PriceSource for CatalogPrices {
    fn roll_price(&self, item_id: Uuid) -> Option<i64> {
        self.rolls.get(&item_id).copied()
    }

    fn set_price(&self, item_id: Uuid) -> Option<i64> {
        self.sets.get(&item_id).copied()
    }
}

/// A cart line with its resolved unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// The underlying line.
    pub line: CartLine,
    /// Resolved price per unit. Zero for loyalty lines, negative for the
    /// bonus line.
    pub unit_price: i64,
    /// `unit_price × quantity`.
    pub line_total: i64,
}

/// A fully priced cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricedCart {
    /// Priced lines in cart order.
    pub lines: SmallVec<[PricedLine; 8]>,
    /// Sum over all lines, bonus discount included. Informational; may be
    /// negative, which checkout rejects separately.
    pub total: i64,
    /// Sum over catalog-priced lines only. This is the amount a bonus
    /// discount is clamped against.
    pub catalog_total: i64,
}

impl PricedCart {
    /// Whether the cart contains at least one catalog-priced line, which is
    /// what makes it submittable at checkout.
    #[must_use]
    pub fn has_catalog_line(&self) -> bool {
        self.lines.iter().any(|l| l.line.kind().is_catalog())
    }
}

/// Price every line of a cart.
///
/// Unit prices resolve by kind: rolls and sets from the catalog, loyalty
/// rolls at zero (redemption is always free), and the bonus line at its
/// stored negative amount with an implicit quantity of one.
///
/// # Errors
///
/// [`PricingError::UnknownItem`] when a roll or set line references an item
/// missing from the price source.
pub fn price_cart(
    lines: &[CartLine],
    prices: &impl PriceSource,
) -> Result<PricedCart, PricingError> {
    let mut priced = PricedCart::default();

    for line in lines {
        let unit_price = match line {
            CartLine::Roll { item_id, .. } => {
                prices
                    .roll_price(*item_id)
                    .ok_or(PricingError::UnknownItem {
                        kind: LineKind::Roll,
                        item_id: *item_id,
                    })?
            }
            CartLine::Set { item_id, .. } => {
                prices.set_price(*item_id).ok_or(PricingError::UnknownItem {
                    kind: LineKind::Set,
                    item_id: *item_id,
                })?
            }
            CartLine::LoyaltyRoll { .. } => 0,
            CartLine::BonusPoints { amount } => *amount,
        };

        let line_total = unit_price * i64::from(line.quantity());

        priced.total += line_total;

        if line.kind().is_catalog() {
            priced.catalog_total += line_total;
        }

        priced.lines.push(PricedLine {
            line: line.clone(),
            unit_price,
            line_total,
        });
    }

    Ok(priced)
}

/// Clamp a bonus-points request against the balance and the cart.
///
/// Returns the amount actually applied:
/// `min(requested, balance, catalog_total)`.
///
/// # Errors
///
/// - [`BonusError::NonPositive`] when `requested <= 0`.
/// - [`BonusError::InsufficientBalance`] when `requested > balance`.
/// - [`BonusError::NothingToDiscount`] when the catalog total is not
///   positive.
pub fn bonus_to_apply(requested: i64, balance: i64, catalog_total: i64) -> Result<i64, BonusError> {
    if requested <= 0 {
        return Err(BonusError::NonPositive);
    }

    if requested > balance {
        return Err(BonusError::InsufficientBalance { requested, balance });
    }

    if catalog_total <= 0 {
        return Err(BonusError::NothingToDiscount);
    }

    Ok(requested.min(balance).min(catalog_total))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn catalog(rolls: &[(Uuid, i64)], sets: &[(Uuid, i64)]) -> CatalogPrices {
        CatalogPrices::new(rolls.iter().copied(), sets.iter().copied())
    }

    #[test]
    fn totals_are_sum_of_unit_price_times_quantity() -> TestResult {
        let roll = Uuid::now_v7();
        let set = Uuid::now_v7();
        let prices = catalog(&[(roll, 450)], &[(set, 1200)]);

        let cart = [
            CartLine::Roll {
                item_id: roll,
                quantity: 3,
            },
            CartLine::Set {
                item_id: set,
                quantity: 1,
            },
        ];

        let priced = price_cart(&cart, &prices)?;

        assert_eq!(priced.total, 3 * 450 + 1200);
        assert_eq!(priced.catalog_total, priced.total);
        assert!(priced.has_catalog_line());

        Ok(())
    }

    #[test]
    fn bonus_line_subtracts_from_total_but_not_catalog_total() -> TestResult {
        let roll = Uuid::now_v7();
        let prices = catalog(&[(roll, 500)], &[]);

        let cart = [
            CartLine::Roll {
                item_id: roll,
                quantity: 2,
            },
            CartLine::BonusPoints { amount: -300 },
        ];

        let priced = price_cart(&cart, &prices)?;

        assert_eq!(priced.total, 700);
        assert_eq!(priced.catalog_total, 1000);

        Ok(())
    }

    #[test]
    fn loyalty_rolls_price_at_zero() -> TestResult {
        let roll = Uuid::now_v7();
        let prices = catalog(&[], &[]);

        let cart = [CartLine::LoyaltyRoll {
            item_id: roll,
            quantity: 2,
        }];

        let priced = price_cart(&cart, &prices)?;

        assert_eq!(priced.total, 0);
        assert!(!priced.has_catalog_line());

        Ok(())
    }

    #[test]
    fn unknown_roll_fails_pricing() {
        let item_id = Uuid::now_v7();
        let prices = catalog(&[], &[]);

        let cart = [CartLine::Roll {
            item_id,
            quantity: 1,
        }];

        assert_eq!(
            price_cart(&cart, &prices),
            Err(PricingError::UnknownItem {
                kind: LineKind::Roll,
                item_id,
            })
        );
    }

    #[test]
    fn empty_cart_prices_to_zero() -> TestResult {
        let priced = price_cart(&[], &catalog(&[], &[]))?;

        assert_eq!(priced.total, 0);
        assert!(!priced.has_catalog_line());

        Ok(())
    }

    #[test]
    fn bonus_clamps_to_catalog_total() -> TestResult {
        // Balance 300, cart worth 250: all 300 requested, 250 applied.
        let applied = bonus_to_apply(300, 300, 250)?;

        assert_eq!(applied, 250);

        Ok(())
    }

    #[test]
    fn bonus_within_total_applies_fully() -> TestResult {
        assert_eq!(bonus_to_apply(100, 300, 250)?, 100);

        Ok(())
    }

    #[test]
    fn bonus_rejects_non_positive_request() {
        assert_eq!(bonus_to_apply(0, 300, 250), Err(BonusError::NonPositive));
        assert_eq!(bonus_to_apply(-10, 300, 250), Err(BonusError::NonPositive));
    }

    #[test]
    fn bonus_rejects_overdrawn_request() {
        assert_eq!(
            bonus_to_apply(301, 300, 250),
            Err(BonusError::InsufficientBalance {
                requested: 301,
                balance: 300,
            })
        );
    }

    #[test]
    fn bonus_rejects_empty_cart() {
        assert_eq!(
            bonus_to_apply(100, 300, 0),
            Err(BonusError::NothingToDiscount)
        );
    }
}
