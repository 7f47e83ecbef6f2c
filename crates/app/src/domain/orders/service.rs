//! Orders service. Checkout runs every step in one transaction.

use async_trait::async_trait;
use kaiten::pricing::{PricedCart, PricedLine};
use mockall::automock;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::{repository::PgCartsRepository, service::price_lines_in_tx},
        catalog::repository::PgCatalogRepository,
        loyalty::repository::PgLoyaltyRepository,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderItem},
            repository::{NewOrderRecord, PgOrdersRepository},
        },
        users::repository::PgUsersRepository,
    },
    ids::{OrderUuid, UserUuid},
};

fn require(value: &str, field: &str) -> Result<String, OrdersServiceError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(OrdersServiceError::MissingRequiredData(field.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Order items captured from the priced cart. Bonus lines shape the total
/// but are not items.
fn items_from(priced: &PricedCart) -> Vec<OrderItem> {
    priced
        .lines
        .iter()
        .filter_map(|line: &PricedLine| {
            let item_id = line.line.item_id()?;

            Some(OrderItem {
                kind: line.line.kind(),
                item_id,
                quantity: line.line.quantity(),
                unit_price: line.unit_price,
                total_price: line.line_total,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    carts: PgCartsRepository,
    catalog: PgCatalogRepository,
    users: PgUsersRepository,
    loyalty: PgLoyaltyRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            catalog: PgCatalogRepository::new(),
            users: PgUsersRepository::new(),
            loyalty: PgLoyaltyRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        let phone = require(&order.phone, "phone")?;
        let delivery_address = require(&order.delivery_address, "delivery_address")?;
        let payment_method = require(&order.payment_method, "payment_method")?;

        if order.total_override.is_some_and(|total| total < 0) {
            return Err(OrdersServiceError::NegativeTotal);
        }

        let mut tx = self.db.begin().await?;

        // Serializes same-user checkouts and cart mutations.
        self.users.lock_user(&mut tx, user).await?;

        let lines = self.carts.get_lines(&mut tx, user).await?;
        let priced = price_lines_in_tx(&mut tx, &self.catalog, &lines).await?;

        if !priced.has_catalog_line() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let total_price = order.total_override.unwrap_or(priced.total);

        if total_price < 0 {
            return Err(OrdersServiceError::NegativeTotal);
        }

        let record = NewOrderRecord {
            uuid: OrderUuid::new(),
            user_uuid: user,
            phone,
            delivery_address,
            payment_method,
            total_price,
            comment: order.comment,
        };

        let mut created = self.orders.create_order(&mut tx, &record).await?;

        let items = items_from(&priced);

        for item in &items {
            self.orders
                .create_order_item(&mut tx, created.uuid, item)
                .await?;
        }

        self.loyalty.accrue(&mut tx, user, total_price).await?;

        // The bonus discount was spent on this order, so clearing must not
        // refund it.
        self.carts.clear(&mut tx, user).await?;

        tx.commit().await?;

        created.items = items;

        tracing::info!(order = %created.uuid, total = total_price, "Order placed");

        Ok(created)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_orders(&mut tx, user).await?;

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();
        let item_rows = self.orders.get_order_items(&mut tx, &uuids).await?;

        tx.commit().await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItem>> = FxHashMap::default();

        for row in item_rows {
            by_order.entry(row.order_uuid).or_default().push(row.item);
        }

        for order in &mut orders {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self
            .orders
            .get_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if found.user_uuid != user {
            return Err(OrdersServiceError::Forbidden);
        }

        let item_rows = self
            .orders
            .get_order_items(&mut tx, &[order.into_uuid()])
            .await?;

        tx.commit().await?;

        found.items = item_rows.into_iter().map(|row| row.item).collect();

        Ok(found)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Check the cart out into an order, accruing loyalty stamps and
    /// clearing the cart, all atomically.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// The user's orders with items, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// One order; owned by someone else is a Forbidden.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use kaiten::{
        lines::{CartLine, LineKind},
        loyalty::card_number,
        pricing::{CatalogPrices, price_cart},
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::{
            carts::service::CartsService, loyalty::service::LoyaltyService,
            orders::models::OrderStatus, users::service::UsersService,
        },
        test::TestContext,
    };

    use super::*;

    fn new_order() -> NewOrder {
        NewOrder {
            phone: "+4479460001".to_string(),
            delivery_address: "1 Fish Lane".to_string(),
            payment_method: "card".to_string(),
            comment: None,
            total_override: None,
        }
    }

    #[test]
    fn blank_fields_are_rejected() {
        let error = require("  ", "phone").unwrap_err();

        assert!(matches!(
            error,
            OrdersServiceError::MissingRequiredData(field) if field == "phone"
        ));
    }

    #[test]
    fn bonus_lines_become_no_order_item() -> TestResult {
        let roll = Uuid::now_v7();
        let prices = CatalogPrices::new([(roll, 300)], []);

        let lines = [
            CartLine::Roll {
                item_id: roll,
                quantity: 2,
            },
            CartLine::BonusPoints { amount: -150 },
        ];

        let priced = price_cart(&lines, &prices)?;
        let items = items_from(&priced);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, LineKind::Roll);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].total_price, 600);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_accrues_stamps_and_clears_the_cart() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("checkout@example.com").await;
        let roll = ctx.seed_roll("Sake Nigiri", 1500).await;

        ctx.carts
            .add_line(user, LineKind::Roll, roll, 2)
            .await
            .expect("add should succeed");

        let order = ctx
            .orders
            .create_order(user, new_order())
            .await
            .expect("checkout should succeed");

        assert_eq!(order.total_price, 3000);
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.items.len(), 1, "expected one order item");
        assert_eq!(order.items.first().map(|item| item.quantity), Some(2));

        let view = ctx.carts.get_cart(user).await.expect("get_cart");

        assert!(view.priced.lines.is_empty(), "cart should be cleared");

        // 3000 spent at 1000 per stamp.
        let cards = ctx.loyalty.list_cards(user).await.expect("list_cards");

        assert_eq!(cards.len(), 1, "expected one card, got {cards:?}");
        assert_eq!(cards.first().map(|card| card.filled_rolls), Some(3));
    }

    #[tokio::test]
    async fn checkout_spends_the_applied_discount() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("discount@example.com").await;
        let roll = ctx.seed_roll("Ebi Nigiri", 2000).await;

        ctx.set_bonus_points(user, 500).await;
        ctx.carts
            .add_line(user, LineKind::Roll, roll, 1)
            .await
            .expect("add should succeed");
        ctx.carts
            .use_bonus_points(user, 500)
            .await
            .expect("application should succeed");

        let order = ctx
            .orders
            .create_order(user, new_order())
            .await
            .expect("checkout should succeed");

        assert_eq!(order.total_price, 1500);

        // The points were spent on this order; clearing the cart at
        // checkout must not hand them back.
        let profile = ctx.users.profile(user).await.expect("profile");

        assert_eq!(profile.bonus_points, 0);
    }

    #[tokio::test]
    async fn failed_checkout_rolls_back_completely() {
        let ctx = TestContext::new().await;
        let user = ctx.register_user("atomic@example.com").await;
        let roll = ctx.seed_roll("Tekka Maki", 1500).await;

        ctx.carts
            .add_line(user, LineKind::Roll, roll, 1)
            .await
            .expect("add should succeed");

        // Occupy the card number the accrual step will generate, under a
        // different account, so the card insert inside checkout fails after
        // the order rows are already written.
        let decoy = ctx.register_user("decoy@example.com").await;

        sqlx::query(
            "INSERT INTO loyalty_cards (uuid, user_uuid, card_number, filled_rolls)
             VALUES ($1, $2, $3, 3)",
        )
        .bind(Uuid::now_v7())
        .bind(decoy.into_uuid())
        .bind(card_number(user.into_uuid(), 1))
        .execute(ctx.db.pool())
        .await
        .expect("decoy card insert should succeed");

        let result = ctx.orders.create_order(user, new_order()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Sql(_))),
            "expected a storage error, got {result:?}"
        );

        // Nothing from the failed checkout may stick: no order, cart intact.
        let orders = ctx.orders.list_orders(user).await.expect("list_orders");

        assert!(orders.is_empty(), "order row survived the rollback");

        let view = ctx.carts.get_cart(user).await.expect("get_cart");

        assert_eq!(view.priced.lines.len(), 1, "cart line was lost");
    }
}
