//! Loyalty repository, including the accrual engine invoked from checkout.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use kaiten::loyalty::{CARD_CAPACITY, card_number, plan_accrual, stamps_for};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::loyalty::models::{CardUsage, LoyaltyCard, LoyaltyRollOption},
    ids::{CardUuid, UserUuid},
};

const LOCK_ACTIVE_CARD_SQL: &str = include_str!("sql/lock_active_card.sql");
const CREATE_CARD_SQL: &str = include_str!("sql/create_card.sql");
const COMPLETE_CARD_SQL: &str = include_str!("sql/complete_card.sql");
const SET_FILL_SQL: &str = include_str!("sql/set_fill.sql");
const NEXT_CARD_SEQ_SQL: &str = include_str!("sql/next_card_seq.sql");
const LIST_CARDS_SQL: &str = include_str!("sql/list_cards.sql");
const GET_COMPLETED_CARD_SQL: &str = include_str!("sql/get_completed_card.sql");
const DELETE_CARD_SQL: &str = include_str!("sql/delete_card.sql");
const ROLL_AVAILABLE_SQL: &str = include_str!("sql/roll_available.sql");
const AVAILABLE_ROLLS_SQL: &str = include_str!("sql/available_rolls.sql");
const CREATE_USAGE_SQL: &str = include_str!("sql/create_usage.sql");
const HISTORY_SQL: &str = include_str!("sql/history.sql");
const SEED_WHITELIST_SQL: &str = include_str!("sql/seed_whitelist.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLoyaltyRepository;

impl PgLoyaltyRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Credit the stamps earned by an order. Runs inside the checkout
    /// transaction; the user row is already locked, and the active card row
    /// is locked here before it is mutated.
    pub(crate) async fn accrue(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order_amount: i64,
    ) -> Result<(), sqlx::Error> {
        let stamps = stamps_for(order_amount);

        if stamps == 0 {
            return Ok(());
        }

        let active = self.lock_active_card(tx, user).await?;
        let current_fill = active.as_ref().map_or(0, |(_, fill)| *fill);

        let plan = plan_accrual(current_fill, stamps);

        if plan.is_noop(current_fill) {
            return Ok(());
        }

        let mut to_create = plan.cards_completed;

        if let Some((card, _)) = active {
            if plan.cards_completed > 0 {
                self.complete_card(tx, card).await?;
                to_create -= 1;
            } else {
                self.set_fill(tx, card, plan.leftover).await?;
                return Ok(());
            }
        }

        for _ in 0..to_create {
            self.create_card(tx, user, CARD_CAPACITY, true).await?;
        }

        // Exactly on a card boundary there is no partial card to carry over.
        if plan.leftover > 0 {
            self.create_card(tx, user, plan.leftover, false).await?;
        }

        Ok(())
    }

    /// The user's single not-yet-completed card, locked `FOR UPDATE`.
    pub(crate) async fn lock_active_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<(CardUuid, u8)>, sqlx::Error> {
        let row: Option<(Uuid, i16)> = query_as(LOCK_ACTIVE_CARD_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(uuid, fill)| (CardUuid::from_uuid(uuid), fill.unsigned_abs() as u8)))
    }

    /// Insert a card with the user's next card number.
    async fn create_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        filled_rolls: u8,
        is_completed: bool,
    ) -> Result<CardUuid, sqlx::Error> {
        let seq: i32 = query_scalar(NEXT_CARD_SEQ_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let uuid = CardUuid::new();
        let number = card_number(user.into_uuid(), seq.unsigned_abs());

        query(CREATE_CARD_SQL)
            .bind(uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(number)
            .bind(i16::from(filled_rolls))
            .bind(is_completed)
            .execute(&mut **tx)
            .await?;

        Ok(uuid)
    }

    async fn complete_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        card: CardUuid,
    ) -> Result<(), sqlx::Error> {
        query(COMPLETE_CARD_SQL)
            .bind(card.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn set_fill(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        card: CardUuid,
        filled_rolls: u8,
    ) -> Result<(), sqlx::Error> {
        query(SET_FILL_SQL)
            .bind(card.into_uuid())
            .bind(i16::from(filled_rolls))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_cards(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<LoyaltyCard>, sqlx::Error> {
        query_as::<Postgres, LoyaltyCard>(LIST_CARDS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// A completed card owned by `user`, locked so concurrent redemptions
    /// of the same card serialize; the loser sees no row.
    pub(crate) async fn get_completed_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        card: CardUuid,
    ) -> Result<Option<(CardUuid, String)>, sqlx::Error> {
        let row: Option<(Uuid, String)> = query_as(GET_COMPLETED_CARD_SQL)
            .bind(card.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(uuid, number)| (CardUuid::from_uuid(uuid), number)))
    }

    pub(crate) async fn delete_card(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        card: CardUuid,
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CARD_SQL)
            .bind(card.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn roll_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        roll_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<i32> = query_scalar(ROLL_AVAILABLE_SQL)
            .bind(roll_id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(found.is_some())
    }

    pub(crate) async fn available_rolls(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<LoyaltyRollOption>, sqlx::Error> {
        query_as::<Postgres, LoyaltyRollOption>(AVAILABLE_ROLLS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        card: CardUuid,
        card_number: &str,
        roll_id: Uuid,
    ) -> Result<CardUsage, sqlx::Error> {
        query_as::<Postgres, CardUsage>(CREATE_USAGE_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .bind(card.into_uuid())
            .bind(card_number)
            .bind(roll_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CardUsage>, sqlx::Error> {
        query_as::<Postgres, CardUsage>(HISTORY_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Whitelist the `limit` cheapest rolls. Used by the seeding CLI.
    pub(crate) async fn seed_whitelist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SEED_WHITELIST_SQL)
            .bind(limit)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for LoyaltyCard {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let filled_rolls: i16 = row.try_get("filled_rolls")?;

        Ok(Self {
            uuid: CardUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            card_number: row.try_get("card_number")?,
            filled_rolls: filled_rolls.unsigned_abs() as u8,
            is_completed: row.try_get("is_completed")?,
            completed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("completed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LoyaltyRollOption {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            roll_id: row.try_get("roll_uuid")?,
            name: row.try_get("name")?,
            sale_price: row.try_get("sale_price")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CardUsage {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            card_uuid: CardUuid::from_uuid(row.try_get("card_uuid")?),
            card_number: row.try_get("card_number")?,
            roll_id: row.try_get("roll_uuid")?,
            used_at: row.try_get::<SqlxTimestamp, _>("used_at")?.to_jiff(),
        })
    }
}
