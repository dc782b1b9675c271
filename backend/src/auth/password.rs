//! Password hashing and verification.
//!
//! bcrypt is CPU bound, so both operations run on the blocking pool.

use tracing::debug;

use crate::errors::{ServiceError, ServiceResult};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Hashes a plain text password with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ServiceError::internal_error(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
}

/// Verifies a plain text password against a stored hash.
///
/// Mismatches and unreadable hashes are both reported as unauthorized.
pub async fn verify_password(password: String, hash: String) -> ServiceResult<()> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            ServiceError::internal_error(format!("Password verification task failed: {}", e))
        })?;

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(ServiceError::unauthorized(INVALID_CREDENTIALS)),
        Err(e) => {
            debug!("Stored password hash rejected: {}", e);
            Err(ServiceError::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("hunter22".into(), TEST_COST).await.unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22".into(), hash).await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let hash = hash_password("hunter22".into(), TEST_COST).await.unwrap();
        let err = verify_password("hunter23".into(), hash).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_unauthorized() {
        let err = verify_password("hunter22".into(), "not-a-bcrypt-hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_unusable_cost_is_internal_error() {
        let err = hash_password("hunter22".into(), crate::config::BCRYPT_MIN_COST - 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InternalError { .. }));
    }
}
