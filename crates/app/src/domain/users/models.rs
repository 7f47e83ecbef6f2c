//! User models.

use jiff::Timestamp;

use crate::ids::UserUuid;

/// User account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Spendable bonus-point balance, earned via referrals.
    pub bonus_points: i64,
    /// This user's own shareable referral code.
    pub referral_code: String,
    pub created_at: Timestamp,
}

/// Registration input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Someone else's referral code, if the signup was referred.
    pub referral_code: Option<String>,
}

/// A freshly registered account plus its one-time API token.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredUser {
    pub user: User,
    /// Raw bearer token. Only the hash is persisted.
    pub api_token: String,
}
