//! Loyalty cards: stamp accrual and completed-card redemption.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::LoyaltyServiceError;
pub use service::*;
