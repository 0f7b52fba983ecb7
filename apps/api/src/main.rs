//! Warden API composition root.

#![forbid(unsafe_code)]

mod access_context;
mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use tracing::info;
use warden_core::AppError;
use warden_infrastructure::PostgresAccessRepository;

use crate::api_config::{ApiCommand, ApiConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let pool = api_services::connect_and_migrate(&config.database_url).await?;

    if config.command == ApiCommand::Migrate {
        info!("migrate command finished");
        return Ok(());
    }

    let repository = Arc::new(PostgresAccessRepository::new(pool.clone()));
    let app_state = api_services::build_app_state(
        repository,
        config.bootstrap_token.clone(),
        config.admin_guard.clone(),
    );

    if config.command == ApiCommand::Seed {
        dev_seed::run(&app_state.access_admin_service).await?;
        info!("seed command finished");
        return Ok(());
    }

    let session_layer =
        api_services::build_postgres_session_layer(pool, config.cookie_secure).await?;
    let app = api_router::build_router(app_state, session_layer);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "warden-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
