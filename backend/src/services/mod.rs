//! Module for request coordination services.
//!
//! Holds the machinery that runs account-store operations on behalf of a
//! request without letting a slow store hold the request hostage.

pub mod dispatch;
