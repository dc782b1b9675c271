//! Claims embedded in every signed session token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::jwt::TokenError;
use crate::utils::time_zone::{epoch_to_time_zone, load_time_zone};

/// Token payload.
///
/// Built once when a token is created and reconstructed from the token body on
/// verification. Both timestamps are UTC epoch seconds; `time_zone` is the
/// IANA zone the expiry check is carried out in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub id: Uuid,
    pub username: String,
    pub issued_at: i64,
    pub expired_at: i64,
    pub time_zone: String,
}

impl Payload {
    /// Creates a payload issued now and expiring after `duration`.
    pub fn new(username: &str, time_zone: &str, duration: Duration) -> Result<Self, TokenError> {
        Self::new_at(username, time_zone, duration, Utc::now())
    }

    /// Creates a payload issued at `now`.
    pub fn new_at(
        username: &str,
        time_zone: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        if username.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        if duration <= Duration::zero() {
            return Err(TokenError::InvalidDuration);
        }
        load_time_zone(time_zone)?;

        let expires = now
            .checked_add_signed(duration)
            .ok_or(TokenError::InvalidDuration)?;

        Ok(Payload {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issued_at: now.timestamp(),
            expired_at: expires.timestamp(),
            time_zone: time_zone.to_string(),
        })
    }

    /// Checks the payload against the current instant.
    pub fn valid(&self) -> Result<(), TokenError> {
        self.valid_at(Utc::now())
    }

    /// Checks the payload against `now`.
    ///
    /// Both instants are projected into the payload's own zone before being
    /// compared; the token is expired only when `now` is strictly after expiry.
    pub fn valid_at(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        let now = epoch_to_time_zone(now.timestamp(), &self.time_zone)?;
        let expired_at = epoch_to_time_zone(self.expired_at, &self.time_zone)?;

        if now > expired_at {
            return Err(TokenError::ExpiredToken);
        }
        Ok(())
    }

    /// Lifetime of the token in seconds.
    pub fn lifetime_seconds(&self) -> i64 {
        self.expired_at - self.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_zone::TimeZoneError;

    #[test]
    fn test_new_payload_fields() {
        let now = Utc::now();
        let payload =
            Payload::new_at("alice", "Asia/Jakarta", Duration::minutes(15), now).unwrap();

        assert_eq!(payload.username, "alice");
        assert_eq!(payload.time_zone, "Asia/Jakarta");
        assert_eq!(payload.issued_at, now.timestamp());
        assert_eq!(payload.lifetime_seconds(), 15 * 60);
        assert!(payload.expired_at > payload.issued_at);
    }

    #[test]
    fn test_new_payload_unique_ids() {
        let a = Payload::new("alice", "UTC", Duration::minutes(1)).unwrap();
        let b = Payload::new("alice", "UTC", Duration::minutes(1)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_payload_rejects_bad_input() {
        assert!(matches!(
            Payload::new("alice", "UTC", Duration::zero()),
            Err(TokenError::InvalidDuration)
        ));
        assert!(matches!(
            Payload::new("alice", "UTC", Duration::seconds(-5)),
            Err(TokenError::InvalidDuration)
        ));
        assert!(matches!(
            Payload::new("", "UTC", Duration::minutes(1)),
            Err(TokenError::EmptySubject)
        ));
        assert!(matches!(
            Payload::new("alice", "Nowhere/City", Duration::minutes(1)),
            Err(TokenError::TimeZone(TimeZoneError::UnknownZone(_)))
        ));
    }

    #[test]
    fn test_valid_at_boundaries() {
        let now = Utc::now();
        let payload =
            Payload::new_at("alice", "Asia/Seoul", Duration::minutes(15), now).unwrap();

        assert!(payload.valid_at(now).is_ok());
        // Expiry instant itself is still valid
        assert!(payload.valid_at(now + Duration::minutes(15)).is_ok());
        assert!(matches!(
            payload.valid_at(now + Duration::minutes(15) + Duration::seconds(1)),
            Err(TokenError::ExpiredToken)
        ));
    }

    #[test]
    fn test_valid_at_unknown_zone_is_time_zone_error() {
        let mut payload = Payload::new("alice", "UTC", Duration::minutes(5)).unwrap();
        payload.time_zone = "Invalid/Zone".to_string();

        assert!(matches!(
            payload.valid(),
            Err(TokenError::TimeZone(TimeZoneError::UnknownZone(_)))
        ));
    }

    #[test]
    fn test_expiry_is_zone_invariant() {
        let now = Utc::now();
        for zone in ["UTC", "Asia/Jakarta", "America/Los_Angeles", "Pacific/Chatham"] {
            let payload = Payload::new_at("bob", zone, Duration::minutes(1), now).unwrap();
            assert!(payload.valid_at(now).is_ok(), "zone {zone}");
            assert!(
                payload.valid_at(now + Duration::minutes(2)).is_err(),
                "zone {zone}"
            );
        }
    }

    #[test]
    fn test_serde_keeps_zone_name_verbatim() {
        let payload = Payload::new("carol", "America/Argentina/Buenos_Aires", Duration::hours(1))
            .unwrap();
        let json = serde_json::to_string(&payload).unwrap();
        let decoded: Payload = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, payload);
        assert_eq!(decoded.time_zone.as_bytes(), b"America/Argentina/Buenos_Aires");
    }
}
