//! Order models.

use jiff::Timestamp;
use kaiten::lines::LineKind;
use uuid::Uuid;

use crate::ids::{OrderUuid, UserUuid};

/// Lifecycle of an order after checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Accepted,
    Preparing,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Preparing => "preparing",
            Self::Delivering => "delivering",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(Self::Accepted),
            "preparing" => Some(Self::Preparing),
            "delivering" => Some(Self::Delivering),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub phone: String,
    pub delivery_address: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub total_price: i64,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub items: Vec<OrderItem>,
}

/// One priced line captured at checkout time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub kind: LineKind,
    pub item_id: Uuid,
    pub quantity: u32,
    pub unit_price: i64,
    pub total_price: i64,
}

/// Checkout input. `total_override` lets the client pin the total it was
/// shown; a mismatch with the server-side price is still bounded below by
/// zero.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub phone: String,
    pub delivery_address: String,
    pub payment_method: String,
    pub comment: Option<String>,
    pub total_override: Option<i64>,
}
