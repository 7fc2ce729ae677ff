//! Database client for Slotwise
//!
//! This module provides a database client backed by a SQLite connection pool.
//! SQLite is deliberately used as a concrete driver rather than through the
//! `Any` abstraction so that typed decoding and SQLite-specific pragmas are
//! available to the repositories.

use crate::error::DbError;
use slotwise_config::{AppConfig, DatabaseConfig};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Database client for Slotwise
///
/// Wraps the SQLite connection pool shared by all repositories.
#[derive(Debug, Clone)]
pub struct DbClient {
    /// The database connection pool
    pool: SqlitePool,
}

impl DbClient {
    /// Create a new database client
    ///
    /// This function creates a new database client using the provided configuration.
    /// It will attempt to connect to the database using the URL from the configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * The database configuration is missing
    /// * The database URL is missing
    /// * The database connection fails
    pub async fn new(config: &Arc<AppConfig>) -> Result<Self, DbError> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;

        Self::from_config(db_config).await
    }

    /// Create a new database client from a database configuration
    ///
    /// # Errors
    ///
    /// This function will return an error if the database URL is empty or the
    /// connection fails.
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        let db_url = &db_config.url;
        if db_url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        let pool = Self::create_pool(db_url).await?;

        Ok(Self { pool })
    }

    /// Create a new database client from a database URL
    ///
    /// # Errors
    ///
    /// This function will return an error if the database URL is invalid or the
    /// connection fails.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }

        let pool = Self::create_pool(db_url).await?;

        Ok(Self { pool })
    }

    /// Create a connection pool
    ///
    /// File-backed databases run in WAL mode with a busy timeout so concurrent
    /// writers queue instead of failing. An in-memory database is limited to a
    /// single connection, because every SQLite connection to `:memory:` opens
    /// its own private database.
    async fn create_pool(db_url: &str) -> Result<SqlitePool, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        let in_memory = db_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // create_if_missing creates the file, but not a missing parent directory
        if let Some(db_path) = db_url
            .strip_prefix("sqlite://")
            .or_else(|| db_url.strip_prefix("sqlite:"))
        {
            if !in_memory && !db_path.is_empty() {
                if let Some(dir) = std::path::Path::new(db_path).parent() {
                    if !dir.as_os_str().is_empty() && !dir.exists() {
                        debug!("Creating directory for SQLite database: {:?}", dir);
                        std::fs::create_dir_all(dir).map_err(|e| {
                            error!("Failed to create directory for SQLite database: {}", e);
                            DbError::PoolError(format!("Failed to create directory: {}", e))
                        })?;
                    }
                }
            }
        }

        let pool_options = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600));

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            error!("Failed to create database pool: {}", e);
            DbError::PoolError(e.to_string())
        })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Execute a query that returns no rows
    ///
    /// # Errors
    ///
    /// This function will return an error if the query fails to execute.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database is healthy
    ///
    /// # Returns
    ///
    /// `true` if the database is healthy, `false` otherwise
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
