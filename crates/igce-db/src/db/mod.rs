//! Database repositories
//!
//! Each repository wraps the shared pool and implements one of the collaborator traits from
//! `igce-core`: the catalog of upload targets, the permission model and the upload log.

pub mod catalog;
pub mod permission;
pub mod upload;

pub use catalog::DatabaseRepository;
pub use permission::PermissionRepository;
pub use upload::UploadRepository;
