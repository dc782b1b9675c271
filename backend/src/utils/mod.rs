//! Token and time-zone utilities.
//!
//! Session payloads, the signed token maker and the IANA time-zone helpers
//! used to stamp and interpret them.

pub mod jwt;
pub mod payload;
pub mod time_zone;
