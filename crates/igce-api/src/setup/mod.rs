//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use igce_core::{Config, TracingStatsLogger};
use igce_db::{DatabaseRepository, PermissionRepository, UploadRepository};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    validation::prepare_upload_folders(&config)
        .await
        .context("Failed to prepare upload folders")?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(DatabaseRepository::new(pool.clone())),
        Arc::new(PermissionRepository::new(pool.clone())),
        Arc::new(UploadRepository::new(pool)),
        Arc::new(TracingStatsLogger::new("igce")),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
