//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, responses::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns one of the authenticated user's orders.
#[endpoint(tags("orders"), summary = "Get Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .orders
        .get_order(user, uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use kaiten_app::{
        domain::orders::{
            MockOrdersService, OrdersServiceError,
            models::{Order, OrderStatus},
        },
        ids::OrderUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USER_UUID, authed_service, state_with_orders};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        authed_service(
            state_with_orders(orders),
            Router::with_path("orders/{uuid}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_order_returns_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |user, order| *user == TEST_USER_UUID && *order == uuid)
            .return_once(move |_, order| {
                Ok(Order {
                    uuid: order,
                    user_uuid: TEST_USER_UUID,
                    phone: "+4479460001".to_string(),
                    delivery_address: "1 Fish Lane".to_string(),
                    payment_method: "cash".to_string(),
                    status: OrderStatus::Delivering,
                    total_price: 1200,
                    comment: Some("ring twice".to_string()),
                    created_at: Timestamp::UNIX_EPOCH,
                    items: vec![],
                })
            });

        let response: OrderResponse =
            TestClient::get(format!("http://example.com/orders/{uuid}"))
                .send(&make_service(orders))
                .await
                .take_json()
                .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.status, "delivering");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_of_another_user_returns_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
