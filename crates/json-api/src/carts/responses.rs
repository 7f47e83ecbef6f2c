//! Cart response payloads shared by several handlers.

use kaiten::{lines::LineKind, pricing::PricedLine};
use kaiten_app::domain::carts::models::CartView;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) fn kind_str(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Roll => "roll",
        LineKind::Set => "set",
        LineKind::LoyaltyRoll => "loyalty_roll",
        LineKind::BonusPoints => "bonus_points",
    }
}

/// One priced cart line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// Line kind: roll, set, loyalty_roll or bonus_points
    pub item_type: String,

    /// Catalog item id; absent for the bonus line
    pub item_id: Option<Uuid>,

    /// Units of the item; always 1 for the bonus line
    pub quantity: u32,

    /// Resolved price per unit; negative for the bonus line
    pub unit_price: i64,

    /// `unit_price × quantity`
    pub total_price: i64,
}

impl From<&PricedLine> for CartLineResponse {
    fn from(priced: &PricedLine) -> Self {
        CartLineResponse {
            item_type: kind_str(priced.line.kind()).to_string(),
            item_id: priced.line.item_id(),
            quantity: priced.line.quantity(),
            unit_price: priced.unit_price,
            total_price: priced.line_total,
        }
    }
}

/// The priced cart plus the balance the user could still spend on it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Lines in cart order
    #[serde(rename = "cart")]
    pub lines: Vec<CartLineResponse>,

    /// Cart total with the bonus discount applied
    pub total_price: i64,

    /// Total over catalog lines only
    pub catalog_total: i64,

    /// The user's current bonus-point balance
    pub bonus_points: i64,

    /// Whether applying bonus points is possible right now
    pub can_use_bonus: bool,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        CartResponse {
            lines: view.priced.lines.iter().map(Into::into).collect(),
            total_price: view.priced.total,
            catalog_total: view.priced.catalog_total,
            bonus_points: view.bonus_points,
            can_use_bonus: view.can_use_bonus(),
        }
    }
}
