//! Shared pieces of the HTTP API.
//!
//! Route groups live next to their domain (see [`crate::auth::routes`]); this
//! module holds the response envelope and error mapping they all use.

pub mod common;
