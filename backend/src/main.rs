//! Main entry point for the authgate backend.
//!
//! This file initializes the Axum web server, sets up the database connection,
//! and registers the authentication routes and middleware.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use std::sync::Arc;

use crate::api::common::ApiResponse;
use crate::auth::service::{AuthService, AuthSettings};
use crate::repositories::account_repository::AccountRepository;
use crate::utils::jwt::{JwtMaker, TokenMaker};
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let token_maker: Arc<dyn TokenMaker> = Arc::new(JwtMaker::new(&config.token_symmetric_key)?);

    let db = Database::new(&config).await?;
    db.migrate().await?;

    let store = Arc::new(AccountRepository::new(db.pool().clone()));
    let auth_service = Arc::new(AuthService::new(
        store,
        token_maker.clone(),
        AuthSettings::from(&config),
    ));

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router(token_maker))
        .layer(Extension(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting authgate server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

async fn root_handler() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        json!({
            "service": "authgate",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the authgate API",
    ))
}
