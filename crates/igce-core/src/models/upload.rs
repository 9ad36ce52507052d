use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use uuid::Uuid;

/// Which upload slice produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "upload_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    Igce,
    PricingHistory,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Igce => "igce",
            UploadKind::PricingHistory => "pricing_history",
        }
    }
}

impl Display for UploadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Database and optional schema a submission targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    pub database_id: i32,
    pub schema: Option<String>,
}

/// A file part received on a form submission.
///
/// The bytes live in a temporary file owned by this value; dropping it deletes the file
/// unless it was persisted first.
#[derive(Debug)]
pub struct UploadedFile {
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    temp_path: TempPath,
}

impl UploadedFile {
    pub fn new(
        original_filename: String,
        content_type: String,
        size_bytes: u64,
        temp_path: TempPath,
    ) -> Self {
        Self {
            original_filename,
            content_type,
            size_bytes,
            temp_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Lowercased extension of the client-supplied filename
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Move the bytes to `dest`, keeping them past the end of the request.
    pub fn persist(self, dest: &Path) -> io::Result<PathBuf> {
        self.temp_path.persist(dest).map_err(|e| e.error)?;
        Ok(dest.to_path_buf())
    }
}

/// Stored record of an accepted upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct UploadRecord {
    pub id: Uuid,
    pub kind: UploadKind,
    pub user_id: Uuid,
    pub database_id: i32,
    pub schema_name: Option<String>,
    pub original_filename: String,
    pub stored_path: String,
    pub size_bytes: i64,
    pub metadata: serde_json::Value,
    pub uploaded_at: DateTime<Utc>,
}

/// Values needed to create an `UploadRecord`
#[derive(Debug, Clone)]
pub struct NewUploadRecord {
    pub id: Uuid,
    pub kind: UploadKind,
    pub user_id: Uuid,
    pub database_id: i32,
    pub schema_name: Option<String>,
    pub original_filename: String,
    pub stored_path: String,
    pub size_bytes: i64,
    pub metadata: serde_json::Value,
}
