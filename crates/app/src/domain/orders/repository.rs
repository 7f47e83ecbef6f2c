//! Orders repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use kaiten::lines::LineKind;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        carts::repository::kind_slug,
        orders::models::{Order, OrderItem, OrderStatus},
    },
    ids::{OrderUuid, UserUuid},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");

/// Columns persisted for a new order.
#[derive(Debug, Clone)]
pub(crate) struct NewOrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub phone: String,
    pub delivery_address: String,
    pub payment_method: String,
    pub total_price: i64,
    pub comment: Option<String>,
}

#[derive(Debug)]
pub(crate) struct OrderItemRow {
    pub order_uuid: OrderUuid,
    pub item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrderRecord,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(&order.phone)
            .bind(&order.delivery_address)
            .bind(&order.payment_method)
            .bind(OrderStatus::Accepted.as_str())
            .bind(order.total_price)
            .bind(order.comment.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &OrderItem,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(Uuid::now_v7())
            .bind(order.into_uuid())
            .bind(kind_slug(item.kind))
            .bind(item.item_id)
            .bind(i32::try_from(item.quantity).unwrap_or(i32::MAX))
            .bind(item.unit_price)
            .bind(item.total_price)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// A user's orders, newest first, without items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Items of every order in `orders`, for attaching to listings.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<OrderItemRow>, sqlx::Error> {
        query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown order status {status:?}").into(),
        })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            phone: row.try_get("phone")?,
            delivery_address: row.try_get("delivery_address")?,
            payment_method: row.try_get("payment_method")?,
            status,
            total_price: row.try_get("total_price")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let item_type: String = row.try_get("item_type")?;
        let kind = match item_type.as_str() {
            "roll" => LineKind::Roll,
            "set" => LineKind::Set,
            "loyalty_roll" => LineKind::LoyaltyRoll,
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "item_type".to_string(),
                    source: format!("unknown item_type {other:?}").into(),
                });
            }
        };

        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItem {
                kind,
                item_id: row.try_get("item_id")?,
                quantity: quantity.unsigned_abs(),
                unit_price: row.try_get("unit_price")?,
                total_price: row.try_get("total_price")?,
            },
        })
    }
}
