//! Loyalty handlers.

pub(crate) mod available_rolls;
pub(crate) mod cards;
pub(crate) mod history;
pub(crate) mod use_card;
