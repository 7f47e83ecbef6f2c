//! Shared infrastructure for persistence tests.

mod db;

pub(crate) use context::TestContext;
