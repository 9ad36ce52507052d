//! Application state shared by every handler

use crate::services::ingest::IngestService;
use igce_core::{Config, DatabaseCatalog, SecurityManager, StatsLogger, UploadStore};
use std::sync::Arc;

/// Immutable per-process state; handlers receive it as `State<Arc<AppState>>`
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn DatabaseCatalog>,
    pub security: Arc<dyn SecurityManager>,
    pub uploads: Arc<dyn UploadStore>,
    pub ingest: IngestService,
    pub stats: Arc<dyn StatsLogger>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn DatabaseCatalog>,
        security: Arc<dyn SecurityManager>,
        uploads: Arc<dyn UploadStore>,
        stats: Arc<dyn StatsLogger>,
    ) -> Self {
        let ingest = IngestService::new(
            config.upload.upload_folder.clone(),
            uploads.clone(),
            stats.clone(),
        );
        Self {
            config,
            catalog,
            security,
            uploads,
            ingest,
            stats,
        }
    }
}
