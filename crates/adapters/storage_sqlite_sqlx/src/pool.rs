//! `SQLite` connection pool setup and schema bootstrap.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

const CREATE_TODOS: &str = r"
    CREATE TABLE IF NOT EXISTS todos (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        title     TEXT    NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0
    )
";

/// Configuration for the `SQLite` storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:ergo.db?mode=rwc` or `sqlite::memory:`).
    pub database_url: String,
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections older than this are closed and replaced.
    pub max_lifetime: Option<Duration>,
    /// Idle connections are closed after this long.
    pub idle_timeout: Option<Duration>,
}

impl Config {
    /// Configuration for `database_url` with the default pool bounds
    /// (10 connections, 3 minute lifetime, 10 minute idle timeout).
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            max_lifetime: Some(Duration::from_secs(180)),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and makes sure the `todos` table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or the schema bootstrap fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(self).await
    }
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn initialize(config: Config) -> Result<Self, StorageError> {
        let options =
            SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        // An in-memory database lives exactly as long as its one connection.
        let pool = if is_in_memory(&config.database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .max_lifetime(None)
                .idle_timeout(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .max_lifetime(config.max_lifetime)
                .idle_timeout(config.idle_timeout)
        }
        .connect_with(options)
        .await?;

        sqlx::query(CREATE_TODOS).execute(&pool).await?;

        tracing::debug!(
            max_connections = config.max_connections,
            "sqlite pool ready"
        );

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_create_pool_and_todos_table_when_using_memory_db() {
        let db = Config::new("sqlite::memory:").build().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, ["todos"]);
    }

    #[tokio::test]
    async fn should_bootstrap_schema_idempotently() {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        sqlx::query(CREATE_TODOS).execute(db.pool()).await.unwrap();
    }

    #[test]
    fn should_use_bounded_pool_defaults() {
        let config = Config::new("sqlite::memory:");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.max_lifetime, Some(Duration::from_secs(180)));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn should_detect_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:todos?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:ergo.db?mode=rwc"));
    }
}
