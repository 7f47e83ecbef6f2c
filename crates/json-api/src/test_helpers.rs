//! Test helpers.

use std::sync::Arc;

use kaiten_app::{
    auth::MockAuthService,
    domain::{
        carts::MockCartsService, catalog::MockCatalogService, loyalty::MockLoyaltyService,
        orders::MockOrdersService, users::MockUsersService,
    },
    ids::UserUuid,
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Stand-in for the auth middleware: marks every request as coming from
/// [`TEST_USER_UUID`].
#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// One mock per service; unconfigured mocks panic on first use, so a test
/// touching an unexpected service fails loudly.
#[derive(Default)]
pub(crate) struct Mocks {
    pub users: MockUsersService,
    pub catalog: MockCatalogService,
    pub carts: MockCartsService,
    pub orders: MockOrdersService,
    pub loyalty: MockLoyaltyService,
    pub auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        Arc::new(State {
            users: Arc::new(self.users),
            catalog: Arc::new(self.catalog),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            loyalty: Arc::new(self.loyalty),
            auth: Arc::new(self.auth),
        })
    }
}

pub(crate) fn state_with_users(users: MockUsersService) -> Arc<State> {
    Mocks {
        users,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn state_with_catalog(catalog: MockCatalogService) -> Arc<State> {
    Mocks {
        catalog,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Mocks {
        carts,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    Mocks {
        orders,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn state_with_loyalty(loyalty: MockLoyaltyService) -> Arc<State> {
    Mocks {
        loyalty,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

/// A service with the test user pre-authenticated.
pub(crate) fn authed_service(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service without authentication, for the public routes.
pub(crate) fn public_service(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}
