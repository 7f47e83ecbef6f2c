//! Carts repository.
//!
//! One row per cart slot; the `cart_lines` schema mirrors the
//! [`CartLine`] tagged union and is decoded back into it here.

use kaiten::lines::{CartLine, LineKind};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::ids::UserUuid;

const GET_LINES_SQL: &str = include_str!("sql/get_lines.sql");
const UPSERT_ITEM_LINE_SQL: &str = include_str!("sql/upsert_item_line.sql");
const SET_QUANTITY_SQL: &str = include_str!("sql/set_quantity.sql");
const DELETE_ITEM_LINE_SQL: &str = include_str!("sql/delete_item_line.sql");
const DELETE_BONUS_LINE_SQL: &str = include_str!("sql/delete_bonus_line.sql");
const UPSERT_BONUS_LINE_SQL: &str = include_str!("sql/upsert_bonus_line.sql");
const CLEAR_SQL: &str = include_str!("sql/clear.sql");

pub(crate) fn kind_slug(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Roll => "roll",
        LineKind::Set => "set",
        LineKind::LoyaltyRoll => "loyalty_roll",
        LineKind::BonusPoints => "bonus_points",
    }
}

/// Row wrapper so `CartLine` (a foreign enum) can implement `FromRow`.
#[derive(Debug)]
pub(crate) struct CartLineRow(pub(crate) CartLine);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// All lines of a user's cart, in insertion order.
    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        let rows = query_as::<Postgres, CartLineRow>(GET_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// Insert an item-backed line or add to the quantity of the line already
    /// occupying the same `(kind, item_id)` slot. Returns the new quantity.
    pub(crate) async fn upsert_item_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
        quantity: u32,
    ) -> Result<u32, sqlx::Error> {
        let quantity: i32 = clamp_quantity(quantity);

        let merged: i32 = query_scalar(UPSERT_ITEM_LINE_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .bind(kind_slug(kind))
            .bind(item_id)
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await?;

        Ok(merged.unsigned_abs())
    }

    /// Overwrite the quantity of an existing line. Returns affected rows.
    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(kind_slug(kind))
            .bind(item_id)
            .bind(clamp_quantity(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Delete an item-backed line. Returns affected rows.
    pub(crate) async fn delete_item_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        kind: LineKind,
        item_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_LINE_SQL)
            .bind(user.into_uuid())
            .bind(kind_slug(kind))
            .bind(item_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Delete the bonus line, returning the (negative) amount it carried.
    pub(crate) async fn delete_bonus_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<i64>, sqlx::Error> {
        query_scalar(DELETE_BONUS_LINE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert or replace the single bonus line. `amount` is negative.
    pub(crate) async fn upsert_bonus_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        amount: i64,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_BONUS_LINE_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .bind(amount)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Delete every line of the user's cart. Returns affected rows.
    pub(crate) async fn clear(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn clamp_quantity(quantity: u32) -> i32 {
    i32::try_from(quantity).unwrap_or(i32::MAX)
}

impl<'r> FromRow<'r, PgRow> for CartLineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let item_type: String = row.try_get("item_type")?;
        let item_id: Option<Uuid> = row.try_get("item_id")?;
        let quantity: i32 = row.try_get("quantity")?;
        let bonus_amount: Option<i64> = row.try_get("bonus_amount")?;

        let missing = |index: &str| sqlx::Error::ColumnDecode {
            index: index.to_string(),
            source: "column required for this item_type is NULL".into(),
        };

        let quantity = quantity.unsigned_abs();

        let line = match item_type.as_str() {
            "roll" => CartLine::Roll {
                item_id: item_id.ok_or_else(|| missing("item_id"))?,
                quantity,
            },
            "set" => CartLine::Set {
                item_id: item_id.ok_or_else(|| missing("item_id"))?,
                quantity,
            },
            "loyalty_roll" => CartLine::LoyaltyRoll {
                item_id: item_id.ok_or_else(|| missing("item_id"))?,
                quantity,
            },
            "bonus_points" => CartLine::BonusPoints {
                amount: bonus_amount.ok_or_else(|| missing("bonus_amount"))?,
            },
            other => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "item_type".to_string(),
                    source: format!("unknown item_type {other:?}").into(),
                });
            }
        };

        Ok(Self(line))
    }
}
