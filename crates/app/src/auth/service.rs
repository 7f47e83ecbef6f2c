//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::{
    auth::{AuthServiceError, generate_token, hash_token, repository::PgAuthRepository},
    ids::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    pool: PgPool,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repository: PgAuthRepository::new(),
        }
    }

    /// Mint a raw API token for an existing user. Only the hash is stored;
    /// the caller must show the raw token immediately or lose it.
    ///
    /// # Errors
    ///
    /// Fails when the user does not exist or the insert fails.
    pub async fn issue_token(&self, user: UserUuid) -> Result<String, AuthServiceError> {
        let raw_token = generate_token();

        let mut tx = self.pool.begin().await?;

        self.repository
            .create_api_token(&mut tx, user, &hash_token(&raw_token))
            .await?;

        tx.commit().await?;

        Ok(raw_token)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let hash = hash_token(bearer_token);

        self.repository
            .find_user_by_token_hash(&self.pool, &hash)
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it authenticates.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}
