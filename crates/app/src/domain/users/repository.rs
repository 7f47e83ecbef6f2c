//! Users repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{domain::users::models::User, ids::UserUuid};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const FIND_REFERRER_SQL: &str = include_str!("sql/find_user_by_referral_code.sql");
const ADJUST_BONUS_POINTS_SQL: &str = include_str!("sql/adjust_bonus_points.sql");
const LOCK_USER_SQL: &str = include_str!("sql/lock_user.sql");

/// Data persisted for a new account; hashing happens in the service.
#[derive(Debug, Clone)]
pub(crate) struct NewUserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub referral_code: String,
}

/// Owner of a referral code, for validating referred signups.
#[derive(Debug, Clone)]
pub(crate) struct ReferralTarget {
    pub uuid: UserUuid,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUserRecord,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(&user.referral_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_user_by_referral_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<ReferralTarget>, sqlx::Error> {
        let row = query_as::<Postgres, (Uuid, String)>(FIND_REFERRER_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(uuid, email)| ReferralTarget {
            uuid: UserUuid::from_uuid(uuid),
            email,
        }))
    }

    /// Add `delta` (possibly negative) to the user's bonus-point balance.
    /// Returns the new balance. The `bonus_points >= 0` check constraint
    /// rejects overdrafts at the schema level.
    pub(crate) async fn adjust_bonus_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        delta: i64,
    ) -> Result<i64, sqlx::Error> {
        let (balance,): (i64,) = query_as(ADJUST_BONUS_POINTS_SQL)
            .bind(user.into_uuid())
            .bind(delta)
            .fetch_one(&mut **tx)
            .await?;

        Ok(balance)
    }

    /// Lock the user row for the rest of the transaction and return the
    /// current bonus-point balance. Serializes same-user cart and checkout
    /// mutations.
    pub(crate) async fn lock_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<i64, sqlx::Error> {
        let (balance,): (i64,) = query_as(LOCK_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(balance)
    }

}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            bonus_points: row.try_get("bonus_points")?,
            referral_code: row.try_get("referral_code")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
