//! Order response payloads shared by several handlers.

use kaiten_app::domain::orders::models::{Order, OrderItem};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::carts::responses::kind_str;

/// One line of a placed order, priced at checkout time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    /// Line kind: roll, set or loyalty_roll
    pub item_type: String,

    /// The catalog item
    pub item_id: Uuid,

    /// Units ordered
    pub quantity: u32,

    /// Price per unit at checkout time
    pub unit_price: i64,

    /// `unit_price × quantity`
    pub total_price: i64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            item_type: kind_str(item.kind).to_string(),
            item_id: item.item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}

/// A placed order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The order's unique identifier
    pub uuid: Uuid,

    /// Lifecycle status
    pub status: String,

    /// Contact phone for this delivery
    pub phone: String,

    /// Delivery address
    pub delivery_address: String,

    /// Payment method chosen at checkout
    pub payment_method: String,

    /// Final total in minor currency units
    pub total_price: i64,

    /// Optional courier comment
    pub comment: Option<String>,

    /// When the order was placed
    pub created_at: String,

    /// The order's lines
    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            uuid: order.uuid.into_uuid(),
            status: order.status.as_str().to_string(),
            phone: order.phone,
            delivery_address: order.delivery_address,
            payment_method: order.payment_method,
            total_price: order.total_price,
            comment: order.comment,
            created_at: order.created_at.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}
