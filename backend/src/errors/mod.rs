//! Global application error types.
//!
//! This module defines the error types shared across the backend: failures
//! reported by the account store, failures of the timeout-guarded store
//! dispatch, and the service-level error that handlers turn into responses.

use std::time::Duration;
use thiserror::Error;

use crate::utils::jwt::TokenError;

/// Errors reported by an account store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("{entity} already exists: {identifier}")]
    Conflict { entity: String, identifier: String },

    /// No live record matched the lookup.
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// The operation observed cancellation before completing.
    #[error("store operation cancelled")]
    Cancelled,

    /// Any other persistence failure.
    #[error("store failure: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    pub fn conflict(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }
}

/// Outcome of a store operation raced against a deadline.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("store operation timed out after {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: String, identifier: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Request timeout: {message}")]
    Timeout { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict { entity, identifier } => Self::AlreadyExists { entity, identifier },
            StoreError::NotFound { entity, identifier } => Self::NotFound { entity, identifier },
            StoreError::Cancelled => Self::internal_error("store operation cancelled"),
            StoreError::Internal(source) => Self::Database { source },
        }
    }
}

impl From<DispatchError> for ServiceError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::TimedOut(_) => Self::timeout("request timeout"),
            DispatchError::Store(e) => e.into(),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(error: TokenError) -> Self {
        Self::internal_error(format!("Token generation failed: {}", error))
    }
}
