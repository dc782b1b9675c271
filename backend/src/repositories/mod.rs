//! Persistence boundary for account records.
//!
//! Request handling only sees the [`AccountStore`] trait; the SQLite-backed
//! implementation lives in [`account_repository`].

use async_trait::async_trait;

use crate::database::models::{AccountRecord, NewAccount};
use crate::errors::StoreError;

pub mod account_repository;

/// Asynchronous account persistence and lookup.
///
/// A record is returned only on success. Implementations must tolerate being
/// dropped mid-operation, which is how cancellation reaches them.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account.
    ///
    /// Fails with [`StoreError::Conflict`] when the username or email is taken.
    async fn create_account(&self, account: NewAccount) -> Result<AccountRecord, StoreError>;

    /// Looks up a live (not soft-deleted) account.
    ///
    /// Fails with [`StoreError::NotFound`] when no such account exists.
    async fn get_account_by_username(&self, username: &str) -> Result<AccountRecord, StoreError>;
}
