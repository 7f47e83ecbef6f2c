//! Referrals repository.

use sqlx::{Postgres, Transaction, query};
use uuid::Uuid;

use crate::domain::referrals::models::NewReferralUsage;

const CREATE_REFERRAL_USAGE_SQL: &str = include_str!("sql/create_referral_usage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReferralsRepository;

impl PgReferralsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        usage: &NewReferralUsage,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_REFERRAL_USAGE_SQL)
            .bind(Uuid::now_v7())
            .bind(usage.referrer.into_uuid())
            .bind(usage.referred.into_uuid())
            .bind(&usage.referral_code)
            .bind(usage.bonus_points_awarded)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
