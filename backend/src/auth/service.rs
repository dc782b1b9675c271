//! Core business logic for the authentication system.
//!
//! [`AuthService`] coordinates a single register or login request: it hands
//! the account store operation to a separate task, races it against
//! [`STORE_TIMEOUT`], checks credentials and issues the access/refresh token
//! pair.

use std::sync::Arc;

use chrono::Duration;
use chrono_tz::Tz;
use tracing::{debug, info};
use validator::Validate;

use crate::api::common::validation_errors_to_field_errors;
use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::database::models::{AccountRecord, NewAccount};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::AccountStore;
use crate::services::dispatch::{STORE_TIMEOUT, dispatch_with_timeout};
use crate::utils::jwt::TokenMaker;
use crate::utils::time_zone::resolve_time_zone;

/// Token lifetimes and request defaults used by [`AuthService`].
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,
    pub default_time_zone: Tz,
    pub bcrypt_cost: u32,
}

impl From<&Config> for AuthSettings {
    fn from(config: &Config) -> Self {
        Self {
            access_token_duration: config.access_token_duration,
            refresh_token_duration: config.refresh_token_duration,
            default_time_zone: config.default_time_zone,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

/// Authentication service for handling registration, login and token issuance
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    token_maker: Arc<dyn TokenMaker>,
    settings: AuthSettings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        store: Arc<dyn AccountStore>,
        token_maker: Arc<dyn TokenMaker>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            store,
            token_maker,
            settings,
        }
    }

    /// Create an account and issue its first token pair.
    ///
    /// # Errors
    /// - `Validation` for malformed input
    /// - `AlreadyExists` when the username or email is taken
    /// - `Timeout` when the store does not answer within [`STORE_TIMEOUT`]
    pub async fn register(
        &self,
        request: RegisterRequest,
        time_zone: Option<&str>,
    ) -> ServiceResult<AuthResponse> {
        validate_request(&request)?;
        let zone = resolve_time_zone(time_zone, self.settings.default_time_zone);

        let hashed_password = hash_password(request.password, self.settings.bcrypt_cost).await?;
        let account = NewAccount::new(request.username, request.email, hashed_password);

        let store = Arc::clone(&self.store);
        let account =
            dispatch_with_timeout(STORE_TIMEOUT, async move { store.create_account(account).await })
                .await?;

        info!("Account registered: {}", account.username);
        self.issue_tokens(&account, zone)
    }

    /// Authenticate an account and issue a token pair.
    ///
    /// # Errors
    /// - `Validation` for malformed input
    /// - `NotFound` when the username is unknown
    /// - `Unauthorized` when the password does not match
    /// - `Timeout` when the store does not answer within [`STORE_TIMEOUT`]
    pub async fn login(
        &self,
        request: LoginRequest,
        time_zone: Option<&str>,
    ) -> ServiceResult<AuthResponse> {
        validate_request(&request)?;
        let zone = resolve_time_zone(time_zone, self.settings.default_time_zone);

        let store = Arc::clone(&self.store);
        let username = request.username;
        let account = dispatch_with_timeout(STORE_TIMEOUT, async move {
            store.get_account_by_username(&username).await
        })
        .await?;

        verify_password(request.password, account.hashed_password.clone())
            .await
            .inspect_err(|_| debug!("Rejected credentials for {}", account.username))?;

        info!("Account logged in: {}", account.username);
        self.issue_tokens(&account, zone)
    }

    /// Issues the short-lived access token and the longer-lived refresh token.
    fn issue_tokens(&self, account: &AccountRecord, zone: Tz) -> ServiceResult<AuthResponse> {
        let (access_token, access_payload) = self.token_maker.create_token(
            &account.username,
            zone.name(),
            self.settings.access_token_duration,
        )?;

        let (refresh_token, refresh_payload) = self.token_maker.create_token(
            &account.username,
            zone.name(),
            self.settings.refresh_token_duration,
        )?;

        Ok(AuthResponse {
            access_token,
            access_token_expires_at: access_payload.expired_at,
            refresh_token,
            refresh_token_expires_at: refresh_payload.expired_at,
            user: UserResponse::from(account),
        })
    }
}

fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
    request.validate().map_err(|errors| {
        let messages: Vec<String> = validation_errors_to_field_errors(&errors)
            .into_iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        ServiceError::validation(messages.join(", "))
    })
}
