//! Depot helper extensions.

use std::any::Any;

use kaiten_app::ids::UserUuid;
use salvo::prelude::{Depot, StatusError};

const USER_UUID_KEY: &str = "user_uuid";

/// Helpers for moving the authenticated user and shared state through the
/// depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_user_uuid(&mut self, user: UserUuid);

    /// The user the auth middleware resolved, or a 401 when the route was
    /// wired without it.
    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.insert(USER_UUID_KEY, user);
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.get::<UserUuid>(USER_UUID_KEY)
            .map(|user| *user)
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
