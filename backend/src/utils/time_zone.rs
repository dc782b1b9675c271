//! Time-zone aware clock helpers used for token expiry comparison.
//!
//! Timestamps are stored as UTC epoch seconds; these helpers project them into
//! a named IANA zone so that expiry can be checked in the zone the client
//! declared when the token was issued.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::warn;

/// Errors raised while resolving a zone or projecting an instant into it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeZoneError {
    #[error("unknown time zone: {0}")]
    UnknownZone(String),

    #[error("timestamp out of range: {0}")]
    OutOfRange(i64),
}

/// Loads an IANA zone by name.
pub fn load_time_zone(name: &str) -> Result<Tz, TimeZoneError> {
    name.parse::<Tz>()
        .map_err(|_| TimeZoneError::UnknownZone(name.to_string()))
}

/// Converts an epoch-second instant into civil time within `time_zone`.
pub fn epoch_to_time_zone(epoch: i64, time_zone: &str) -> Result<DateTime<Tz>, TimeZoneError> {
    let zone = load_time_zone(time_zone)?;
    let instant =
        DateTime::<Utc>::from_timestamp(epoch, 0).ok_or(TimeZoneError::OutOfRange(epoch))?;
    Ok(instant.with_timezone(&zone))
}

/// Picks the zone for a request from the optional `TimeZone` header value.
///
/// Absent, empty or unknown values fall back to `default`.
pub fn resolve_time_zone(header: Option<&str>, default: Tz) -> Tz {
    let Some(raw) = header.map(str::trim).filter(|value| !value.is_empty()) else {
        return default;
    };

    match load_time_zone(raw) {
        Ok(zone) => zone,
        Err(e) => {
            warn!("Ignoring time zone header: {}; using {}", e, default.name());
            default
        }
    }
}
