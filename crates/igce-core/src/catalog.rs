//! Collaborator interfaces for the catalog and upload store
//!
//! The API crate receives implementations through its state; `igce-db` provides the
//! Postgres-backed ones.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Database, NewUploadRecord, UploadKind, UploadRecord};

/// Read access to registered databases
#[async_trait]
pub trait DatabaseCatalog: Send + Sync {
    /// Databases with `allow_csv_upload` set, ordered by name
    async fn csv_enabled_databases(&self) -> Result<Vec<Database>, AppError>;

    async fn get_database(&self, id: i32) -> Result<Option<Database>, AppError>;
}

/// Persistence for accepted uploads
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn record_upload(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError>;

    /// Most recent uploads of `kind` by `user_id`, newest first
    async fn recent_uploads(
        &self,
        kind: UploadKind,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<UploadRecord>, AppError>;
}
