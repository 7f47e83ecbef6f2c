//! Signup referral ledger.
//!
//! Thin, append-only: one row per successful referred signup, written inside
//! the registration transaction. The fixed bonus goes to the new user.

pub mod models;
pub(crate) mod repository;

/// Bonus points credited to a referred signup.
pub const REFERRAL_BONUS: i64 = 200;
