//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle account registration, login and session inspection.
//! They are designed to be nested under `/api/auth` in the main Axum router,
//! which must also provide an `Extension<Arc<AuthService>>` layer.

use std::sync::Arc;

use crate::auth::handlers::*;
use crate::auth::middleware::require_access_token;
use crate::utils::jwt::TokenMaker;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router(token_maker: Arc<dyn TokenMaker>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/session",
            get(session).layer(middleware::from_fn_with_state(
                token_maker,
                require_access_token,
            )),
        )
}
