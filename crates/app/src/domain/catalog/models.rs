//! Catalog models.

use jiff::Timestamp;
use uuid::Uuid;

/// A roll on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Roll {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price per unit, minor currency units.
    pub sale_price: i64,
    pub image_url: Option<String>,
    pub is_popular: bool,
    pub is_new: bool,
    pub created_at: Timestamp,
}

/// A set (bundle of rolls) on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Bundle price, minor currency units.
    pub set_price: i64,
    pub image_url: Option<String>,
    pub is_popular: bool,
    pub is_new: bool,
    pub created_at: Timestamp,
}
