//! Authentication module for account registration, login and session tokens.
//!
//! This module provides the public interface for authentication-related
//! functionality: request handlers, the bearer-token middleware, password
//! hashing and the service that ties the account store to the token maker.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
