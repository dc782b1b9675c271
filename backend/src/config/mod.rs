//! Central module for application-wide configuration settings.
//!
//! This module handles loading configuration parameters such as the database
//! URL and pool limits, the token signing secret and lifetimes, the fallback
//! time zone and the server port.

use anyhow::{Context, Result, bail, ensure};
use chrono::Duration;
use chrono_tz::Tz;
use std::env;
use std::str::FromStr;

use crate::utils::jwt::MIN_SECRET_KEY_SIZE;
use crate::utils::time_zone::load_time_zone;

// Mirrors the cost bounds bcrypt enforces internally (private in the crate).
pub(crate) const BCRYPT_MIN_COST: u32 = 4;
pub(crate) const BCRYPT_MAX_COST: u32 = 31;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
    pub token_symmetric_key: String,
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,
    pub default_time_zone: Tz,
    pub bcrypt_cost: u32,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        let min_connections: u32 = parse_or(&lookup, "DB_MIN_CONNECTIONS", 0)?;
        ensure!(
            min_connections <= max_connections,
            "DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS"
        );

        let acquire_timeout_seconds = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECONDS", 3)?;
        let idle_timeout_seconds = parse_or(&lookup, "DB_IDLE_TIMEOUT_SECONDS", 600)?;
        let max_lifetime_seconds = parse_or(&lookup, "DB_MAX_LIFETIME_SECONDS", 3600)?;

        let token_symmetric_key =
            lookup("TOKEN_SYMMETRIC_KEY").context("TOKEN_SYMMETRIC_KEY not set")?;
        if token_symmetric_key.len() < MIN_SECRET_KEY_SIZE {
            bail!(
                "TOKEN_SYMMETRIC_KEY must be at least {} characters",
                MIN_SECRET_KEY_SIZE
            );
        }

        let access_token_duration =
            positive_seconds(&lookup, "ACCESS_TOKEN_DURATION_SECONDS", 15 * 60)?;
        let refresh_token_duration =
            positive_seconds(&lookup, "REFRESH_TOKEN_DURATION_SECONDS", 24 * 60 * 60)?;

        let zone_name = lookup("DEFAULT_TIME_ZONE").unwrap_or_else(|| "UTC".to_string());
        let default_time_zone = load_time_zone(zone_name.trim())
            .with_context(|| format!("DEFAULT_TIME_ZONE '{}' is not a valid zone", zone_name))?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        ensure!(
            (BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&bcrypt_cost),
            "BCRYPT_COST must be between {} and {}",
            BCRYPT_MIN_COST,
            BCRYPT_MAX_COST
        );

        let server_port = parse_or(&lookup, "SERVER_PORT", 3030)?;

        Ok(Config {
            database_url,
            max_connections,
            min_connections,
            acquire_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
            token_symmetric_key,
            access_token_duration,
            refresh_token_duration,
            default_time_zone,
            bcrypt_cost,
            server_port,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn positive_seconds<F>(lookup: &F, key: &str, default: i64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let seconds: i64 = parse_or(lookup, key, default)?;
    ensure!(seconds > 0, "{} must be greater than zero", key);
    Ok(Duration::seconds(seconds))
}
