//! Configuration module
//!
//! Reads the server, auth, database, storage and processing settings from the
//! environment (after loading `.env` if present).

use std::env;
use std::path::PathBuf;

use crate::storage_types::{StorageBackend, ThumbnailNaming, ThumbnailStorage, VideoKeyLayout};

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 5;
const JWT_EXPIRY_HOURS: i64 = 24;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const DATABASE_URL: &str = "sqlite://tubely.db?mode=rwc";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

#[derive(Clone, Debug)]
pub struct TubelyConfig {
    pub server_port: u16,
    /// In-flight request cap for the whole server, at least 1
    pub http_concurrency_limit: usize,
    pub environment: String,
    pub public_base_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub database_url: String,
    pub db_max_connections: u32,
    pub assets_root: PathBuf,
    pub thumbnail_storage: ThumbnailStorage,
    pub thumbnail_naming: ThumbnailNaming,
    /// Empty means any parseable media type with a known extension is accepted
    pub thumbnail_allowed_content_types: Vec<String>,
    pub max_thumbnail_size_bytes: usize,
    pub video_storage: StorageBackend,
    pub video_key_layout: VideoKeyLayout,
    pub max_video_size_bytes: usize,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub ffprobe_path: String,
    pub upload_temp_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<TubelyConfig>);

impl Config {
    fn inner(&self) -> &TubelyConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = TubelyConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn public_base_url(&self) -> &str {
        self.inner().public_base_url.trim_end_matches('/')
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().jwt_expiry_hours
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.inner().assets_root
    }

    pub fn thumbnail_storage(&self) -> ThumbnailStorage {
        self.inner().thumbnail_storage
    }

    pub fn thumbnail_naming(&self) -> ThumbnailNaming {
        self.inner().thumbnail_naming
    }

    pub fn thumbnail_allowed_content_types(&self) -> &[String] {
        &self.inner().thumbnail_allowed_content_types
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.inner().max_thumbnail_size_bytes
    }

    pub fn video_storage(&self) -> StorageBackend {
        self.inner().video_storage
    }

    pub fn video_key_layout(&self) -> VideoKeyLayout {
        self.inner().video_key_layout
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }

    /// Directory for in-flight video uploads; falls back to the system temp dir.
    pub fn upload_temp_dir(&self) -> PathBuf {
        self.inner()
            .upload_temp_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }
}

/// Unset or unparseable values fall back to the default; zero is raised to one.
fn parse_concurrency_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(HTTP_CONCURRENCY_LIMIT)
        .max(1)
}

/// Split a comma-separated list, dropping blanks. An empty string yields an empty list.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl TubelyConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));

        let max_thumbnail_size_mb = env::var("MAX_THUMBNAIL_SIZE_MB")
            .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_THUMBNAIL_SIZE_MB);

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let thumbnail_allowed_content_types = parse_list(
            &env::var("THUMBNAIL_ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| "image/jpeg,image/png".to_string()),
        );

        let thumbnail_storage: ThumbnailStorage = env::var("THUMBNAIL_STORAGE")
            .unwrap_or_else(|_| "local".to_string())
            .parse()?;
        let thumbnail_naming: ThumbnailNaming = env::var("THUMBNAIL_NAMING")
            .unwrap_or_else(|_| "random".to_string())
            .parse()?;
        let video_storage: StorageBackend = env::var("VIDEO_STORAGE")
            .unwrap_or_else(|_| "s3".to_string())
            .parse()?;
        let video_key_layout: VideoKeyLayout = env::var("VIDEO_KEY_LAYOUT")
            .unwrap_or_else(|_| "aspect".to_string())
            .parse()?;

        Ok(TubelyConfig {
            server_port,
            http_concurrency_limit: parse_concurrency_limit(
                env::var("HTTP_CONCURRENCY_LIMIT").ok().as_deref(),
            ),
            environment,
            public_base_url,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DATABASE_URL.to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            assets_root: env::var("ASSETS_ROOT")
                .unwrap_or_else(|_| "./assets".to_string())
                .into(),
            thumbnail_storage,
            thumbnail_naming,
            thumbnail_allowed_content_types,
            max_thumbnail_size_bytes: max_thumbnail_size_mb * 1024 * 1024,
            video_storage,
            video_key_layout,
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR").ok().map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid SQLite connection string"
            ));
        }

        let uses_s3 = self.video_storage == StorageBackend::S3
            || self.thumbnail_storage == ThumbnailStorage::S3;
        if uses_s3 {
            if self.s3_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when using S3 storage backend"
                ));
            }
            if self.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                ));
            }
        }

        if self.video_storage == StorageBackend::Memory {
            return Err(anyhow::anyhow!("VIDEO_STORAGE must be 's3' or 'local'"));
        }

        Ok(())
    }
}
