//! Kaiten domain concerns.

pub mod carts;
pub mod catalog;
pub mod loyalty;
pub mod orders;
pub mod referrals;
pub mod users;
