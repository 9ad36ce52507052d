//! Configuration module
//!
//! Process configuration is read once from the environment (and `.env`) into an explicit
//! `Config` value. Nothing reads ambient settings after start-up; components receive the
//! pieces they need through application state.

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 8088;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_CHUNK_SIZE: usize = 4096;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const RECENT_UPLOADS_LIMIT: i64 = 20;
const MIN_JWT_SECRET_LEN: usize = 32;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Server, database and auth settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    /// Requests served concurrently before callers queue
    pub http_concurrency_limit: usize,
}

/// Settings consumed by the upload views
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Bytes read from the request stream per write
    pub chunk_size: usize,
    /// Accepted files are moved here; in-flight files live in `<upload_folder>/tmp`
    pub upload_folder: PathBuf,
    pub max_upload_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub recent_uploads_limit: i64,
}

impl UploadConfig {
    pub fn temp_folder(&self) -> PathBuf {
        self.upload_folder.join("tmp")
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.chunk_size == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CHUNK_SIZE must be greater than 0"));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: UPLOAD_CHUNK_SIZE,
            upload_folder: PathBuf::from("./uploads"),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            allowed_extensions: vec!["csv".to_string()],
            recent_uploads_limit: RECENT_UPLOADS_LIMIT,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload: UploadConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
        };

        let upload = UploadConfig {
            chunk_size: env::var("UPLOAD_CHUNK_SIZE")
                .unwrap_or_else(|_| UPLOAD_CHUNK_SIZE.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("UPLOAD_CHUNK_SIZE must be a valid number"))?,
            upload_folder: env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_UPLOAD_SIZE_MB)
                * 1024
                * 1024,
            allowed_extensions: parse_list(
                &env::var("ALLOWED_EXTENSIONS").unwrap_or_else(|_| "csv".to_string()),
            ),
            recent_uploads_limit: env::var("RECENT_UPLOADS_LIMIT")
                .unwrap_or_else(|_| RECENT_UPLOADS_LIMIT.to_string())
                .parse()
                .unwrap_or(RECENT_UPLOADS_LIMIT),
        };

        let config = Config { base, upload };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if !self.base.database_url.starts_with("postgres://")
            && !self.base.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        self.upload.validate()
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn upload_chunk_size(&self) -> usize {
        self.upload.chunk_size
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.upload.max_upload_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.upload.allowed_extensions
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
