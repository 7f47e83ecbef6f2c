//! Containerized Postgres for persistence tests.
//!
//! All tests share one Postgres container; each test gets its own freshly
//! created, migrated database, so state never leaks between tests. The
//! databases live only as long as the container, which testcontainers
//! reaps when the test process exits.

use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::OnceCell;
use uuid::Uuid;

const PG_USER: &str = "kaiten_test";
const PG_PASSWORD: &str = "kaiten_test_password";

static CONTAINER: OnceCell<ContainerAsync<PostgresImage>> = OnceCell::const_new();

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(PG_USER)
        .with_password(PG_PASSWORD)
        .with_db_name("postgres")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("postgres container should start")
}

/// An isolated, migrated test database inside the shared container.
#[derive(Debug, Clone)]
pub(crate) struct TestDb {
    pool: PgPool,
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        let container = CONTAINER.get_or_init(start_container).await;

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("container port should be mapped");

        let host = std::env::var("TESTCONTAINERS_HOST_OVERRIDE")
            .unwrap_or_else(|_| "localhost".to_string());

        // Database names may not start with a digit.
        let name = format!("kaiten_test_{}", Uuid::now_v7().simple());

        let admin_url = format!("postgresql://{PG_USER}:{PG_PASSWORD}@{host}:{port}/postgres");

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("admin connection should open");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("test database should be created");

        conn.close().await.expect("admin connection should close");

        let url = format!("postgresql://{PG_USER}:{PG_PASSWORD}@{host}:{port}/{name}");

        let pool = PgPool::connect(&url)
            .await
            .expect("test database pool should connect");

        crate::database::MIGRATOR
            .run(&pool)
            .await
            .expect("migrations should apply");

        Self { pool }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrated_database_is_reachable() {
        let db = TestDb::new().await;

        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(db.pool())
            .await
            .expect("query should run");

        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn databases_are_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("INSERT INTO rolls (uuid, name, sale_price) VALUES ($1, 'Tekka Maki', 300)")
            .bind(Uuid::now_v7())
            .execute(first.pool())
            .await
            .expect("insert should run");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rolls")
            .fetch_one(second.pool())
            .await
            .expect("count should run");

        assert_eq!(count, 0, "second database saw the first database's rows");
    }
}
