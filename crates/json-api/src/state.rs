//! State

use std::sync::Arc;

use kaiten_app::{
    auth::AuthService,
    context::AppContext,
    domain::{
        carts::CartsService, catalog::CatalogService, loyalty::LoyaltyService,
        orders::OrdersService, users::UsersService,
    },
};

/// Shared handler state. Holds each service behind its trait so tests can
/// swap in mocks per service.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) users: Arc<dyn UsersService>,
    pub(crate) catalog: Arc<dyn CatalogService>,
    pub(crate) carts: Arc<dyn CartsService>,
    pub(crate) orders: Arc<dyn OrdersService>,
    pub(crate) loyalty: Arc<dyn LoyaltyService>,
    pub(crate) auth: Arc<dyn AuthService>,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            users: app.users,
            catalog: app.catalog,
            carts: app.carts,
            orders: app.orders,
            loyalty: app.loyalty,
            auth: app.auth,
        })
    }
}
