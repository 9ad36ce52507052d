//! IGCE Core Library
//!
//! Configuration, error types, domain models, upload forms and permission predicates shared
//! by the database and HTTP crates.

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod stats;

// Re-export commonly used types
pub use access::{
    csv_allowed_dbs, igce_schema_upload_allowed, is_schema_allowed,
    pricing_history_schema_upload_allowed, SchemaPolicy, SecurityManager,
};
pub use catalog::{DatabaseCatalog, UploadStore};
pub use config::{BaseConfig, Config, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use forms::{FieldKind, FieldSpec, FormErrors, IgceUploadForm, PricingHistoryUploadForm, UploadForm};
pub use stats::{StatsLogger, TracingStatsLogger};
