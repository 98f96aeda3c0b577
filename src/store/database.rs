//! SQLite connection pool
//!
//! Wraps a `sqlx::SqlitePool`. The pool is cloned into every request
//! context; clones share the same connections.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

const CREATE_PERSON_TABLE: &str = "CREATE TABLE IF NOT EXISTS person (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL,
    age     REAL NOT NULL,
    address TEXT NOT NULL
)";

/// Handle to the relational database
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool using the configured URL and limits
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// sqlx names a fresh shared-cache database for each `sqlite::memory:`
    /// options value, and SQLite discards it once its last connection
    /// closes. The pool therefore keeps exactly one connection open with
    /// no idle or lifetime expiry.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `person` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_PERSON_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Round-trip a trivial statement
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
