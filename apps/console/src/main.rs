//! EVEP admin console composition root.

#![forbid(unsafe_code)]

mod api_router;
mod console_config;
mod console_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use evep_core::AppError;
use tracing::info;

use crate::console_config::{ConsoleConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let app_state = console_services::build_app_state(&config).await?;
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, backend = config.platform_backend.label(), "evep-console listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("console server error: {error}")))
}
