//! Cart handlers.

pub(crate) mod add;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod update;
pub(crate) mod use_bonus;
