//! Postgres-backed collaborators for the upload views

pub mod db;

pub use db::{DatabaseRepository, PermissionRepository, UploadRepository};
