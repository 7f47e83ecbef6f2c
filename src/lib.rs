//! Kaiten core engines.
//!
//! This crate holds the business rules of the Kaiten food-ordering backend
//! that do not depend on persistence or transport: the cart line model, the
//! cart pricing engine, and the loyalty stamp accrual state machine. The
//! `kaiten-app` crate wires these into Postgres-backed services; the
//! `kaiten-json` crate exposes them over HTTP.
//!
//! All monetary amounts are `i64` minor currency units. Discounts are
//! represented as negative amounts.

pub mod lines;
pub mod loyalty;
pub mod pricing;
