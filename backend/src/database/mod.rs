//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the database connection pool
//! and applying the schema migrations.

use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub mod models;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Initializes the database connection pool.
    ///
    /// The pool is the only shared mutable resource of the service, so it is
    /// bounded and connections are recycled after the configured idle time
    /// and lifetime.
    pub async fn new(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("DATABASE_URL is not a valid SQLite URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
            .connect_with(options)
            .await
            .context("cannot connect to db")?;

        Ok(Database { pool })
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("cannot run migrations")?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
