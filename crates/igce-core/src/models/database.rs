use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// A database registered in the catalog that uploads may target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Database {
    pub id: i32,
    pub database_name: String,
    pub allow_csv_upload: bool,
    /// Empty means no schema-level grant is configured
    pub schemas_allowed_for_csv_upload: Vec<String>,
}

impl Database {
    /// Schemas permitted for CSV upload into this database
    pub fn schema_access_for_csv_upload(&self) -> &[String] {
        &self.schemas_allowed_for_csv_upload
    }
}
