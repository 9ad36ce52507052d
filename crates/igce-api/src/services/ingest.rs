//! Hand-off of validated uploads to storage

use igce_core::forms::{UploadForm, ValidatedUpload};
use igce_core::models::{NewUploadRecord, UploadRecord, UserContext};
use igce_core::{AppError, StatsLogger, UploadStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Moves accepted files into the upload folder and records them
#[derive(Clone)]
pub struct IngestService {
    upload_folder: PathBuf,
    store: Arc<dyn UploadStore>,
    stats: Arc<dyn StatsLogger>,
}

impl IngestService {
    pub fn new(
        upload_folder: PathBuf,
        store: Arc<dyn UploadStore>,
        stats: Arc<dyn StatsLogger>,
    ) -> Self {
        Self {
            upload_folder,
            store,
            stats,
        }
    }

    /// Persist the file under `<upload_folder>/<kind>/<id>.<ext>` and record it.
    ///
    /// If recording fails the stored file is removed again.
    #[tracing::instrument(skip(self, user, upload), fields(kind = %F::KIND, user_id = %user.user_id, database_id = upload.database.id))]
    pub async fn ingest<F: UploadForm>(
        &self,
        user: &UserContext,
        upload: ValidatedUpload<F>,
    ) -> Result<UploadRecord, AppError> {
        let started = Instant::now();
        let ValidatedUpload {
            form,
            database,
            schema,
            file,
        } = upload;

        let metadata = form.metadata()?;
        let id = Uuid::new_v4();
        let extension = file.extension().unwrap_or_else(|| "csv".to_string());
        let dir = self.upload_folder.join(F::KIND.as_str());
        tokio::fs::create_dir_all(&dir).await?;

        let original_filename = file.original_filename.clone();
        let size_bytes = i64::try_from(file.size_bytes)
            .map_err(|_| AppError::PayloadTooLarge("File is too large".to_string()))?;
        let dest = dir.join(format!("{}.{}", id, extension));
        let stored = file.persist(&dest)?;

        let record = NewUploadRecord {
            id,
            kind: F::KIND,
            user_id: user.user_id,
            database_id: database.id,
            schema_name: schema,
            original_filename,
            stored_path: stored.to_string_lossy().into_owned(),
            size_bytes,
            metadata,
        };

        match self.store.record_upload(record).await {
            Ok(record) => {
                tracing::info!(
                    upload_id = %record.id,
                    filename = %record.original_filename,
                    database = %database.database_name,
                    size_bytes = record.size_bytes,
                    "Upload stored"
                );
                self.stats
                    .timing(&format!("{}.ingest", F::KIND), started.elapsed());
                Ok(record)
            }
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&stored).await {
                    tracing::warn!(
                        error = %remove_err,
                        path = %stored.display(),
                        "Failed to remove stored file after record failure"
                    );
                }
                Err(e)
            }
        }
    }
}
