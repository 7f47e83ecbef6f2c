//! Menu handlers.

pub(crate) mod rolls;
pub(crate) mod sets;
