//! Domain models

pub mod database;
pub mod upload;
pub mod user;

pub use database::Database;
pub use upload::{NewUploadRecord, UploadKind, UploadRecord, UploadTarget, UploadedFile};
pub use user::UserContext;
