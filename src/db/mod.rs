// Database module - storage adapter over an in-process SQLite store

use std::{str::FromStr, time::Duration};

use color_eyre::{eyre::ensure, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

// Re-export models for convenience
pub mod models;
pub use models::*;

pub mod store;
pub use store::{Filter, Record, Store, Table, UnitOfWork, Value};

// Internal modules
mod ops;
mod schema;
mod user;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connects to `url` (e.g. `sqlite::memory:` or `sqlite://quiz.db`) and creates the schema.
    pub async fn new(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // An in-memory database lives exactly as long as its connection, so it
        // gets a single connection that is never recycled.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        // Verify connection
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        ensure!(one == 1, "connection check failed");

        schema::create_schema(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    /// Opens a unit of work. Writes made through it are discarded unless
    /// [`UnitOfWork::commit`] is called.
    ///
    /// The write lock is taken up front, so units of work on a file database
    /// queue behind each other instead of failing with `SQLITE_BUSY` when they
    /// upgrade from reading to writing.
    pub async fn begin(&self) -> Result<UnitOfWork> {
        Ok(UnitOfWork::new(self.pool.begin_with("BEGIN IMMEDIATE").await?))
    }
}

/// True when `err` is SQLite rejecting a write on a `UNIQUE` column.
pub fn is_unique_violation(err: &color_eyre::Report) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
