//! Labs API Server Entry Point
//!
//! Loads configuration, connects the cache database and starts the Axum
//! HTTP server.

use std::sync::Arc;

use labs_api::telemetry::{init_tracing, TelemetryConfig};
use labs_api::{create_router, ApiConfig, ApiError, ApiResult, AppState, ProviderConfig, Providers};
use labs_core::LabsError;
use labs_storage::{PostgresConfig, PostgresRecordStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    init_tracing(&TelemetryConfig::default())?;

    let api_config = ApiConfig::from_env().map_err(startup_error)?;
    let provider_config = ProviderConfig::from_env().map_err(startup_error)?;
    tracing::debug!(?api_config, ?provider_config, "Loaded configuration");

    let db_config = PostgresConfig::from_env();
    let store = PostgresRecordStore::connect(&db_config)
        .await
        .map_err(startup_error)?;
    tracing::info!(pool_size = db_config.max_size, "Connected to cache database");

    let providers = Providers::from_config(&provider_config);
    let state = AppState::new(Arc::new(store), &api_config, providers)
        .await
        .map_err(startup_error)?;

    let app = create_router(state, &api_config);

    let addr = api_config.bind_addr().map_err(startup_error)?;
    tracing::info!(%addr, "Starting Labs API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Log a startup failure in full and turn it into the process error.
fn startup_error(err: impl Into<LabsError>) -> ApiError {
    let err = err.into();
    tracing::error!(error = %err, "Startup failed");
    ApiError::internal_error(err.to_string())
}
