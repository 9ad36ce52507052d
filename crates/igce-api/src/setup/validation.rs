//! Start-up checks that go beyond parsing the configuration

use anyhow::{Context, Result};
use igce_core::Config;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    tracing::info!(
        environment = config.environment(),
        error_details = !config.is_production(),
        "Environment resolved"
    );

    if config.upload.recent_uploads_limit <= 0 {
        return Err(anyhow::anyhow!("RECENT_UPLOADS_LIMIT must be greater than 0"));
    }

    if config.upload_chunk_size() > config.max_upload_size_bytes() {
        tracing::warn!(
            chunk_size = config.upload_chunk_size(),
            max_upload_size_bytes = config.max_upload_size_bytes(),
            "UPLOAD_CHUNK_SIZE exceeds the upload size limit"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}

/// Create the upload folder and its temporary subfolder
pub async fn prepare_upload_folders(config: &Config) -> Result<()> {
    let temp_folder = config.upload.temp_folder();
    tokio::fs::create_dir_all(&temp_folder)
        .await
        .with_context(|| format!("Cannot create {}", temp_folder.display()))?;
    tracing::info!(
        upload_folder = %config.upload.upload_folder.display(),
        "Upload folders ready"
    );
    Ok(())
}
