//! Catalog repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use kaiten::pricing::CatalogPrices;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::catalog::models::{Roll, Set};

const LIST_ROLLS_SQL: &str = include_str!("sql/list_rolls.sql");
const LIST_SETS_SQL: &str = include_str!("sql/list_sets.sql");
const ROLL_EXISTS_SQL: &str = include_str!("sql/roll_exists.sql");
const SET_EXISTS_SQL: &str = include_str!("sql/set_exists.sql");
const ROLL_PRICES_SQL: &str = include_str!("sql/roll_prices.sql");
const SET_PRICES_SQL: &str = include_str!("sql/set_prices.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_rolls(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Roll>, sqlx::Error> {
        query_as::<Postgres, Roll>(LIST_ROLLS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_sets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Set>, sqlx::Error> {
        query_as::<Postgres, Set>(LIST_SETS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn roll_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        roll: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<i32> = query_scalar(ROLL_EXISTS_SQL)
            .bind(roll)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(found.is_some())
    }

    pub(crate) async fn set_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        set: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<i32> = query_scalar(SET_EXISTS_SQL)
            .bind(set)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(found.is_some())
    }

    /// Load unit prices for the given roll and set ids in two array-bound
    /// queries, ready for the pricing engine.
    pub(crate) async fn load_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        roll_ids: &[Uuid],
        set_ids: &[Uuid],
    ) -> Result<CatalogPrices, sqlx::Error> {
        let rolls: Vec<(Uuid, i64)> = query_as(ROLL_PRICES_SQL)
            .bind(roll_ids)
            .fetch_all(&mut **tx)
            .await?;

        let sets: Vec<(Uuid, i64)> = query_as(SET_PRICES_SQL)
            .bind(set_ids)
            .fetch_all(&mut **tx)
            .await?;

        Ok(CatalogPrices::new(rolls, sets))
    }
}

impl<'r> FromRow<'r, PgRow> for Roll {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            sale_price: row.try_get("sale_price")?,
            image_url: row.try_get("image_url")?,
            is_popular: row.try_get("is_popular")?,
            is_new: row.try_get("is_new")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Set {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            set_price: row.try_get("set_price")?,
            image_url: row.try_get("image_url")?,
            is_popular: row.try_get("is_popular")?,
            is_new: row.try_get("is_new")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
