//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse incoming register/login requests, read the client's
//! `TimeZone` header and delegate to [`AuthService`].

use std::sync::Arc;

use axum::{
    extract::{Extension, Json, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};

use crate::api::common::{ApiError, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::errors::ServiceError;
use crate::utils::payload::Payload;

/// Request header carrying the client's IANA time zone.
pub const TIME_ZONE_HEADER: &str = "TimeZone";

fn time_zone_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TIME_ZONE_HEADER)
        .and_then(|value| value.to_str().ok())
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    service_error_to_http(ServiceError::validation(rejection.body_text()))
}

/// Handle account registration request
#[axum::debug_handler]
pub async fn register(
    Extension(auth_service): Extension<Arc<AuthService>>,
    headers: HeaderMap,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<AuthResponse>), ApiError> {
    let Json(request) = payload.map_err(bad_body)?;

    match auth_service
        .register(request, time_zone_header(&headers))
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(auth_service): Extension<Arc<AuthService>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<AuthResponse>), ApiError> {
    let Json(request) = payload.map_err(bad_body)?;

    match auth_service.login(request, time_zone_header(&headers)).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Describe the session carried by the presented access token
#[axum::debug_handler]
pub async fn session(Extension(payload): Extension<Payload>) -> ResponseJson<SessionResponse> {
    ResponseJson(SessionResponse::from(payload))
}
