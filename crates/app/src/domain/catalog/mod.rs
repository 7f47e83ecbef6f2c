//! Menu catalog: rolls and sets.
//!
//! Read-only from the pricing engine's perspective; writes happen out of
//! band (seed data, back office).

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
