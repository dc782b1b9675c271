//! Data structures for authentication requests and responses.
//!
//! This module defines the register/login payloads, the token pair returned on
//! success and the session view exposed to bearer-authenticated callers.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::models::AccountRecord;
use crate::utils::payload::Payload;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(
        min = 6,
        max = 72,
        message = "Password must be between 6-72 characters"
    ))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 72, message = "Password is required"))]
    pub password: String,
}

/// Token pair and account summary returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub access_token_expires_at: i64,
    pub refresh_token: String,
    pub refresh_token_expires_at: i64,
    pub user: UserResponse,
}

/// Public view of an account
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub created_at: i64,
}

impl From<&AccountRecord> for UserResponse {
    fn from(account: &AccountRecord) -> Self {
        Self {
            username: account.username.clone(),
            email: account.email.clone(),
            created_at: account.created_at.timestamp(),
        }
    }
}

/// Claims of the bearer token presented on the current request
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: String,
    pub issued_at: i64,
    pub expired_at: i64,
    pub time_zone: String,
}

impl From<Payload> for SessionResponse {
    fn from(payload: Payload) -> Self {
        Self {
            username: payload.username,
            issued_at: payload.issued_at,
            expired_at: payload.expired_at,
            time_zone: payload.time_zone,
        }
    }
}
