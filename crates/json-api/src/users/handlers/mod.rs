//! User handlers.

pub(crate) mod profile;
pub(crate) mod register;
