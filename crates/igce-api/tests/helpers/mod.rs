//! Test helpers: build AppState and router over in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p igce-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::{TestResponse, TestServer};
use chrono::{Duration, Utc};
use igce_api::auth::models::JwtClaims;
use igce_api::setup::routes;
use igce_api::state::AppState;
use igce_core::models::{Database, NewUploadRecord, UploadKind, UploadRecord, UserContext};
use igce_core::{
    AppError, BaseConfig, Config, DatabaseCatalog, SecurityManager, TracingStatsLogger,
    UploadConfig, UploadStore,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Catalog contents used by every test:
/// * 1 `examples`: accepts uploads, no schema allow-list
/// * 2 `warehouse`: accepts uploads into `finance` and `ops`
/// * 3 `archive`: uploads disabled
pub fn databases() -> Vec<Database> {
    vec![
        Database {
            id: 1,
            database_name: "examples".to_string(),
            allow_csv_upload: true,
            schemas_allowed_for_csv_upload: Vec::new(),
        },
        Database {
            id: 2,
            database_name: "warehouse".to_string(),
            allow_csv_upload: true,
            schemas_allowed_for_csv_upload: vec!["finance".to_string(), "ops".to_string()],
        },
        Database {
            id: 3,
            database_name: "archive".to_string(),
            allow_csv_upload: false,
            schemas_allowed_for_csv_upload: Vec::new(),
        },
    ]
}

pub struct MemoryCatalog(pub Vec<Database>);

#[async_trait]
impl DatabaseCatalog for MemoryCatalog {
    async fn csv_enabled_databases(&self) -> Result<Vec<Database>, AppError> {
        Ok(self.0.iter().filter(|d| d.allow_csv_upload).cloned().collect())
    }

    async fn get_database(&self, id: i32) -> Result<Option<Database>, AppError> {
        Ok(self.0.iter().find(|d| d.id == id).cloned())
    }
}

/// Admins have blanket access; everyone else reaches the `finance` schema only
pub struct RoleSecurity;

#[async_trait]
impl SecurityManager for RoleSecurity {
    async fn can_access_database(
        &self,
        user: &UserContext,
        _database: &Database,
    ) -> Result<bool, AppError> {
        Ok(user.is_admin())
    }

    async fn schemas_accessible_by_user(
        &self,
        user: &UserContext,
        _database: &Database,
        schemas: &[String],
    ) -> Result<Vec<String>, AppError> {
        Ok(schemas
            .iter()
            .filter(|s| user.is_admin() || *s == "finance")
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryUploadStore {
    pub records: Mutex<Vec<UploadRecord>>,
    /// Fail every insert with a certificate error
    pub certificate_failure: AtomicBool,
}

impl MemoryUploadStore {
    pub fn records(&self) -> Vec<UploadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn record_upload(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        if self.certificate_failure.load(Ordering::SeqCst) {
            return Err(AppError::Certificate(
                "certificate verify failed: self signed certificate".to_string(),
            ));
        }
        let stored = UploadRecord {
            id: record.id,
            kind: record.kind,
            user_id: record.user_id,
            database_id: record.database_id,
            schema_name: record.schema_name,
            original_filename: record.original_filename,
            stored_path: record.stored_path,
            size_bytes: record.size_bytes,
            metadata: record.metadata,
            uploaded_at: Utc::now(),
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn recent_uploads(
        &self,
        kind: UploadKind,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let mut records: Vec<UploadRecord> = self
            .records()
            .into_iter()
            .filter(|r| r.kind == kind && r.user_id == user_id)
            .collect();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }
}

pub fn test_config(upload_folder: &Path) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            database_url: "postgresql://localhost/igce_test".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            http_concurrency_limit: 64,
        },
        upload: UploadConfig {
            chunk_size: 7,
            upload_folder: upload_folder.to_path_buf(),
            ..UploadConfig::default()
        },
    }
}

pub fn analyst() -> UserContext {
    UserContext {
        user_id: Uuid::new_v4(),
        username: "analyst".to_string(),
        roles: vec!["gamma".to_string()],
    }
}

pub fn admin() -> UserContext {
    UserContext {
        user_id: Uuid::new_v4(),
        username: "admin".to_string(),
        roles: vec!["admin".to_string()],
    }
}

pub fn token_for(user: &UserContext) -> String {
    JwtClaims::new(user, Duration::hours(1))
        .encode(TEST_JWT_SECRET)
        .expect("Failed to sign test token")
}

/// Test application: server, collaborators, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryUploadStore>,
    pub user: UserContext,
    pub token: String,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Files left in the temporary upload folder
    pub fn temp_files(&self) -> Vec<PathBuf> {
        list_files(&self.upload_dir.path().join("tmp"))
    }

    /// Files stored for `kind`
    pub fn stored_files(&self, kind: UploadKind) -> Vec<PathBuf> {
        list_files(&self.upload_dir.path().join(kind.as_str()))
    }
}

/// `Set-Cookie` header of a response with percent-escapes decoded
pub fn set_cookie_text(response: &TestResponse) -> String {
    let raw = response.header("set-cookie");
    let raw = raw.to_str().expect("Set-Cookie is not ASCII");
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_as(analyst())
}

pub fn setup_test_app_as(user: UserContext) -> TestApp {
    setup_test_app_with(user, |_| {})
}

/// Build the app after adjusting the test configuration
pub fn setup_test_app_with(user: UserContext, configure: impl FnOnce(&mut Config)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    std::fs::create_dir_all(upload_dir.path().join("tmp")).expect("Failed to create tmp dir");
    let mut config = test_config(upload_dir.path());
    configure(&mut config);
    let store = Arc::new(MemoryUploadStore::default());

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(MemoryCatalog(databases())),
        Arc::new(RoleSecurity),
        store.clone(),
        Arc::new(TracingStatsLogger::new("test")),
    ));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    let token = token_for(&user);
    TestApp {
        server,
        store,
        user,
        token,
        upload_dir,
    }
}
