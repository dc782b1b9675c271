//! Signed session tokens.
//!
//! Provides the [`TokenMaker`] capability and its HMAC-SHA256 implementation,
//! [`JwtMaker`]. Tokens are compact JWTs whose claims are a [`Payload`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::debug;

use crate::utils::payload::Payload;
use crate::utils::time_zone::TimeZoneError;

/// Minimum accepted length of the symmetric signing key, in bytes.
pub const MIN_SECRET_KEY_SIZE: usize = 32;

/// Errors produced while creating or verifying tokens.
///
/// Every verification failure other than expiry is reported as
/// [`TokenError::InvalidToken`].
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("invalid key size: must be at least {min} characters")]
    InvalidKeySize { min: usize },

    #[error("token duration must be positive")]
    InvalidDuration,

    #[error("token subject must not be empty")]
    EmptySubject,

    #[error(transparent)]
    TimeZone(#[from] TimeZoneError),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Creates and verifies signed tokens.
pub trait TokenMaker: Send + Sync {
    /// Issues a token for `username` that expires after `duration`.
    fn create_token(
        &self,
        username: &str,
        time_zone: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError>;

    /// Checks the token signature and expiry and returns its payload.
    fn verify_token(&self, token: &str) -> Result<Payload, TokenError>;
}

/// HS256 token maker holding the process-wide signing secret.
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtMaker {
    /// Builds a maker from the symmetric secret.
    ///
    /// Fails with [`TokenError::InvalidKeySize`] when the secret is shorter than
    /// [`MIN_SECRET_KEY_SIZE`] bytes.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret_key.as_ref();
        if secret.len() < MIN_SECRET_KEY_SIZE {
            return Err(TokenError::InvalidKeySize {
                min: MIN_SECRET_KEY_SIZE,
            });
        }

        // Only HS256 is accepted. Expiry lives in our own claims and is checked
        // by `Payload::valid_at`, so the library's `exp` handling is disabled.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(JwtMaker {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Signs an already built payload.
    pub fn sign(&self, payload: &Payload) -> Result<String, TokenError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            payload,
            &self.encoding_key,
        )?)
    }

    /// Verifies `token` as of `now`.
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let payload = decode::<Payload>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                TokenError::InvalidToken
            })?;

        match payload.valid_at(now) {
            Ok(()) => Ok(payload),
            Err(TokenError::ExpiredToken) => Err(TokenError::ExpiredToken),
            Err(e) => {
                debug!("Token payload rejected: {}", e);
                Err(TokenError::InvalidToken)
            }
        }
    }
}

impl TokenMaker for JwtMaker {
    fn create_token(
        &self,
        username: &str,
        time_zone: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(username, time_zone, duration)?;
        let token = self.sign(&payload)?;
        Ok((token, payload))
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        self.verify_token_at(token, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_A: &str = "0123456789abcdef0123456789abcdef";
    const SECRET_B: &str = "fedcba9876543210fedcba9876543210";

    fn maker(secret: &str) -> JwtMaker {
        JwtMaker::new(secret).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        for len in [0, 1, 16, MIN_SECRET_KEY_SIZE - 1] {
            let secret = "x".repeat(len);
            assert!(matches!(
                JwtMaker::new(&secret),
                Err(TokenError::InvalidKeySize { min: 32 })
            ));
        }
        assert!(JwtMaker::new("x".repeat(MIN_SECRET_KEY_SIZE)).is_ok());
    }

    #[test]
    fn test_create_and_verify() {
        let maker = maker(SECRET_A);
        let (token, payload) = maker
            .create_token("alice", "Asia/Jakarta", Duration::minutes(15))
            .unwrap();

        assert!(!token.is_empty());
        let verified = maker.verify_token(&token).unwrap();
        assert_eq!(verified, payload);
        assert_eq!(verified.username, "alice");
        assert_eq!(verified.time_zone, "Asia/Jakarta");
        assert_eq!(verified.lifetime_seconds(), 15 * 60);
    }

    #[test]
    fn test_token_expires_after_duration() {
        let maker = maker(SECRET_A);
        let (token, _) = maker
            .create_token("alice", "Asia/Jakarta", Duration::minutes(15))
            .unwrap();

        let verified = maker.verify_token_at(&token, Utc::now()).unwrap();
        assert_eq!(verified.username, "alice");

        let later = Utc::now() + Duration::minutes(16);
        assert!(matches!(
            maker.verify_token_at(&token, later),
            Err(TokenError::ExpiredToken)
        ));
    }

    #[test]
    fn test_expired_token_is_not_reported_as_invalid() {
        let maker = maker(SECRET_A);
        let issued = Utc::now() - Duration::hours(2);
        for zone in ["UTC", "Asia/Seoul", "America/New_York"] {
            let payload = Payload::new_at("dave", zone, Duration::hours(1), issued).unwrap();
            let token = maker.sign(&payload).unwrap();

            assert!(matches!(
                maker.verify_token(&token),
                Err(TokenError::ExpiredToken)
            ));
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let (token, _) = maker(SECRET_A)
            .create_token("alice", "UTC", Duration::minutes(5))
            .unwrap();

        assert!(matches!(
            maker(SECRET_B).verify_token(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_on_expired_token_is_still_invalid() {
        let payload = Payload::new_at(
            "alice",
            "UTC",
            Duration::minutes(1),
            Utc::now() - Duration::hours(1),
        )
        .unwrap();
        let token = maker(SECRET_A).sign(&payload).unwrap();

        assert!(matches!(
            maker(SECRET_B).verify_token(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let payload = Payload::new("alice", "UTC", Duration::minutes(5)).unwrap();
        for alg in [Algorithm::HS384, Algorithm::HS512] {
            let token = encode(
                &Header::new(alg),
                &payload,
                &EncodingKey::from_secret(SECRET_A.as_bytes()),
            )
            .unwrap();

            assert!(matches!(
                maker(SECRET_A).verify_token(&token),
                Err(TokenError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let maker = maker(SECRET_A);
        let (alice_token, _) = maker.create_token("alice", "UTC", Duration::minutes(5)).unwrap();
        let (mallory_token, _) = maker
            .create_token("mallory", "UTC", Duration::minutes(5))
            .unwrap();

        // Splice mallory's claims under alice's signature
        let alice_parts: Vec<&str> = alice_token.split('.').collect();
        let mallory_parts: Vec<&str> = mallory_token.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], mallory_parts[1], alice_parts[2]);

        assert!(matches!(
            maker.verify_token(&forged),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let maker = maker(SECRET_A);
        for token in ["", "not-a-token", "a.b.c", "a.b", "...."] {
            assert!(
                matches!(maker.verify_token(token), Err(TokenError::InvalidToken)),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_signed_payload_with_unknown_zone_is_invalid() {
        let maker = maker(SECRET_A);
        let mut payload = Payload::new("alice", "UTC", Duration::minutes(5)).unwrap();
        payload.time_zone = "Atlantis/Capital".to_string();
        let token = maker.sign(&payload).unwrap();

        assert!(matches!(
            maker.verify_token(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_create_token_rejects_bad_arguments() {
        let maker = maker(SECRET_A);
        assert!(matches!(
            maker.create_token("alice", "UTC", Duration::zero()),
            Err(TokenError::InvalidDuration)
        ));
        assert!(matches!(
            maker.create_token("alice", "Bogus/Zone", Duration::minutes(1)),
            Err(TokenError::TimeZone(_))
        ));
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let maker = maker(SECRET_A);
        for zone in ["UTC", "Asia/Kolkata", "America/Argentina/Buenos_Aires", "Etc/GMT+5"] {
            let (token, payload) = maker.create_token("erin", zone, Duration::days(1)).unwrap();
            let verified = maker.verify_token(&token).unwrap();

            assert_eq!(verified.id, payload.id);
            assert_eq!(verified.username, payload.username);
            assert_eq!(verified.issued_at, payload.issued_at);
            assert_eq!(verified.expired_at, payload.expired_at);
            assert_eq!(verified.time_zone.as_bytes(), zone.as_bytes());
        }
    }
}
