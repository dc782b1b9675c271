//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer token on the request and makes its [`Payload`]
//! available to handlers through request extensions.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::common::{ApiError, error_response};
use crate::utils::jwt::{TokenError, TokenMaker};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Bearer token authentication middleware.
///
/// Expired tokens and otherwise invalid tokens are both rejected with 401 but
/// carry different error types so clients can tell "log in again" apart from
/// "this token is broken".
pub async fn require_access_token(
    State(token_maker): State<Arc<dyn TokenMaker>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verified = match bearer_token(request.headers()) {
        Some(token) => token_maker.verify_token(token),
        None => {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "authorization header is missing",
            ));
        }
    };

    match verified {
        Ok(payload) => {
            request.extensions_mut().insert(payload);
            Ok(next.run(request).await)
        }
        Err(TokenError::ExpiredToken) => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "token_expired",
            TokenError::ExpiredToken.to_string(),
        )),
        Err(e) => {
            debug!("Bearer token rejected: {}", e);
            Err(error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                TokenError::InvalidToken.to_string(),
            ))
        }
    }
}
