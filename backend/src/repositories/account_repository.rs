//! Database repository for account persistence.
//!
//! Implements [`AccountStore`] on top of the SQLite pool.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{AccountRecord, NewAccount};
use crate::errors::StoreError;
use crate::repositories::AccountStore;

const ACCOUNT_COLUMNS: &str = "username, email, hashed_password, is_email_verified, is_deleted, \
                               created_at, updated_at, deleted_at";

/// Repository for account database operations.
///
/// Owns a handle to the pool (not a borrow) because store operations run on
/// their own tasks.
#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create_account(&self, account: NewAccount) -> Result<AccountRecord, StoreError> {
        let query = format!(
            "INSERT INTO accounts (username, email, hashed_password, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, AccountRecord>(&query)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.hashed_password)
            .bind(account.created_at)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, &account.username))
    }

    async fn get_account_by_username(&self, username: &str) -> Result<AccountRecord, StoreError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE username = ? AND is_deleted = 0 LIMIT 1",
            ACCOUNT_COLUMNS
        );

        sqlx::query_as::<_, AccountRecord>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, username))?
            .ok_or_else(|| StoreError::not_found("Account", username))
    }
}

/// Maps a driver error onto the store taxonomy.
fn classify(error: sqlx::Error, username: &str) -> StoreError {
    match error {
        sqlx::Error::RowNotFound => StoreError::not_found("Account", username),
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            StoreError::conflict("Username or email", username)
        }
        other => StoreError::Internal(other.into()),
    }
}
