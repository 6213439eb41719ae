use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Schema error: {0}")]
    Schema(#[source] sqlx::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_CATEGORY_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS category (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(200) NOT NULL
)";

/// Owns the connection pool for the lifetime of the process. The entry point
/// creates it and hands clones of the pool to the services that need it.
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// Open the pool described by `config` and make sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(DatabaseError::Connection)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime())
            .idle_timeout(config.idle_timeout())
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(DatabaseError::Connection)?;

        ensure_schema(&pool).await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Created database pool for: {}",
            config.url
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to come back
    pub async fn close(self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Create the category table if it is missing
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(CREATE_CATEGORY_TABLE)
        .execute(pool)
        .await
        .map_err(DatabaseError::Schema)?;
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Connection)?;
    Ok(())
}
