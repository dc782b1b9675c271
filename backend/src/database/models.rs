//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row of the `accounts` table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRecord {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_email_verified: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Values needed to insert a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    pub fn new(username: String, email: String, hashed_password: String) -> Self {
        Self {
            username,
            email,
            hashed_password,
            created_at: Utc::now(),
        }
    }
}
