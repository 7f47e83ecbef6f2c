//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The user's orders, newest first
    pub orders: Vec<OrderResponse>,
}

/// Order Index Handler
///
/// Returns the authenticated user's orders.
#[endpoint(tags("orders"), summary = "List Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let orders = state
        .orders
        .list_orders(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use kaiten_app::{
        domain::orders::{
            MockOrdersService,
            models::{Order, OrderStatus},
        },
        ids::OrderUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, authed_service, state_with_orders};

    use super::*;

    fn make_order(total_price: i64) -> Order {
        Order {
            uuid: OrderUuid::new(),
            user_uuid: TEST_USER_UUID,
            phone: "+4479460001".to_string(),
            delivery_address: "1 Fish Lane".to_string(),
            payment_method: "card".to_string(),
            status: OrderStatus::Accepted,
            total_price,
            comment: None,
            created_at: Timestamp::UNIX_EPOCH,
            items: vec![],
        }
    }

    #[tokio::test]
    async fn test_index_returns_orders() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(vec![make_order(2350), make_order(800)]));

        let service = authed_service(
            state_with_orders(orders),
            Router::with_path("orders").get(handler),
        );

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.orders.len(), 2, "expected two orders");
        assert_eq!(
            response.orders.first().map(|order| order.total_price),
            Some(2350)
        );

        Ok(())
    }
}
