//! Bearer-token authentication for the HTTP layer.

pub(crate) mod middleware;
