//! Users service.

use async_trait::async_trait;
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};

use crate::{
    auth::{generate_token, hash_token, repository::PgAuthRepository},
    database::Db,
    domain::{
        referrals::{
            REFERRAL_BONUS, models::NewReferralUsage, repository::PgReferralsRepository,
        },
        users::{
            errors::UsersServiceError,
            models::{NewUser, RegisteredUser, User},
            repository::{NewUserRecord, PgUsersRepository},
        },
    },
    ids::UserUuid,
};

const MIN_PASSWORD_LEN: usize = 6;
const REFERRAL_CODE_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    users: PgUsersRepository,
    referrals: PgReferralsRepository,
    auth: PgAuthRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            referrals: PgReferralsRepository::new(),
            auth: PgAuthRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn register(&self, new_user: NewUser) -> Result<RegisteredUser, UsersServiceError> {
        let name = new_user.name.trim();
        let email = new_user.email.trim().to_lowercase();
        let phone = new_user.phone.trim();

        if name.is_empty() || email.is_empty() || phone.is_empty() || new_user.password.is_empty()
        {
            return Err(UsersServiceError::MissingRequiredData);
        }

        if new_user.password.len() < MIN_PASSWORD_LEN {
            return Err(UsersServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        // A supplied referral code must belong to someone else; the whole
        // registration fails otherwise.
        let referrer = match new_user.referral_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => {
                let target = self
                    .users
                    .find_user_by_referral_code(&mut tx, code)
                    .await?
                    .ok_or(UsersServiceError::InvalidReferralCode)?;

                if target.email.eq_ignore_ascii_case(&email) {
                    return Err(UsersServiceError::InvalidReferralCode);
                }

                Some((target, code.to_string()))
            }
        };

        let uuid = UserUuid::new();

        let mut user = self
            .users
            .create_user(
                &mut tx,
                &NewUserRecord {
                    uuid,
                    name: name.to_string(),
                    email,
                    phone: phone.to_string(),
                    password_hash: hash_token(&new_user.password),
                    referral_code: generate_referral_code(),
                },
            )
            .await?;

        if let Some((target, code)) = referrer {
            user.bonus_points = self
                .users
                .adjust_bonus_points(&mut tx, uuid, REFERRAL_BONUS)
                .await?;

            self.referrals
                .create_usage(
                    &mut tx,
                    &NewReferralUsage {
                        referrer: target.uuid,
                        referred: uuid,
                        referral_code: code,
                        bonus_points_awarded: REFERRAL_BONUS,
                    },
                )
                .await?;
        }

        let api_token = generate_token();

        self.auth
            .create_api_token(&mut tx, uuid, &hash_token(&api_token))
            .await?;

        tx.commit().await?;

        tracing::info!(user = %uuid, "registered new user");

        Ok(RegisteredUser { user, api_token })
    }

    async fn profile(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.users.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }
}

fn generate_referral_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERRAL_CODE_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create an account, apply any referral bonus, and issue an API token.
    async fn register(&self, new_user: NewUser) -> Result<RegisteredUser, UsersServiceError>;

    /// Fetch the account behind an authenticated user id.
    async fn profile(&self, user: UserUuid) -> Result<User, UsersServiceError>;
}
