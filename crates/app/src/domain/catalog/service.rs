//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{Roll, Set},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_rolls(&self) -> Result<Vec<Roll>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rolls = self.repository.list_rolls(&mut tx).await?;

        tx.commit().await?;

        Ok(rolls)
    }

    async fn list_sets(&self) -> Result<Vec<Set>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let sets = self.repository.list_sets(&mut tx).await?;

        tx.commit().await?;

        Ok(sets)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// All rolls on the menu.
    async fn list_rolls(&self) -> Result<Vec<Roll>, CatalogServiceError>;

    /// All sets on the menu.
    async fn list_sets(&self) -> Result<Vec<Set>, CatalogServiceError>;
}
