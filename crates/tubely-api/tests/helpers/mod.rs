#![allow(dead_code)]

//! Test helpers: build AppState and router for integration tests.
//!
//! Every app gets its own in-memory SQLite database, assets root and
//! upload temp dir, so tests run in parallel without sharing state.

pub mod auth;
pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::services::ThumbnailSink;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::{
    Config, StorageBackend, ThumbnailNaming, ThumbnailStorage, TubelyConfig, Video,
    VideoKeyLayout,
};
use tubely_db::VideoRepository;
use tubely_processing::{MediaProbe, ProbeError, VideoDimensions};
use tubely_storage::{create_storage, MemoryStorage, Storage};
use uuid::Uuid;

pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const VIDEO_BASE_URL: &str = "http://videos.test";

/// Probe that reports fixed dimensions (or fails) and counts its calls.
pub struct FixedProbe {
    dimensions: Option<VideoDimensions>,
    calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Some(VideoDimensions::new(width, height)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            dimensions: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProbe for FixedProbe {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "probe called without a spooled file");
        self.dimensions.ok_or(ProbeError::NoVideoStream)
    }
}

pub struct TestOptions {
    pub thumbnail_storage: ThumbnailStorage,
    pub thumbnail_naming: ThumbnailNaming,
    pub video_key_layout: VideoKeyLayout,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
    pub probe: FixedProbe,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            thumbnail_storage: ThumbnailStorage::Local,
            thumbnail_naming: ThumbnailNaming::Random,
            video_key_layout: VideoKeyLayout::Aspect,
            max_thumbnail_size_bytes: 10 * 1024 * 1024,
            max_video_size_bytes: 64 * 1024 * 1024,
            probe: FixedProbe::new(1920, 1080),
        }
    }
}

/// Test application: server plus the resources tests inspect.
pub struct TestApp {
    pub server: TestServer,
    pub videos: VideoRepository,
    pub video_storage: Arc<MemoryStorage>,
    pub probe: Arc<FixedProbe>,
    pub assets_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a draft video owned by `user_id`.
    pub async fn create_video(&self, user_id: Uuid) -> Video {
        let video = Video::draft(user_id, "Boots".to_string(), "A test clip".to_string());
        self.videos
            .create_video(&video)
            .await
            .expect("Failed to create video")
    }

    pub async fn fetch_video(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("Failed to fetch video")
            .expect("Video missing")
    }

    /// Number of files left in the upload temp dir.
    pub fn temp_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .count()
    }
}

pub fn create_test_config(assets_root: &Path, upload_dir: &Path, options: &TestOptions) -> Config {
    Config(Box::new(TubelyConfig {
        server_port: 8091,
        http_concurrency_limit: 64,
        environment: "test".to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 24,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        assets_root: assets_root.to_path_buf(),
        thumbnail_storage: options.thumbnail_storage,
        thumbnail_naming: options.thumbnail_naming,
        thumbnail_allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        max_thumbnail_size_bytes: options.max_thumbnail_size_bytes,
        video_storage: StorageBackend::Memory,
        video_key_layout: options.video_key_layout,
        max_video_size_bytes: options.max_video_size_bytes,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        ffprobe_path: "ffprobe".to_string(),
        upload_temp_dir: Some(upload_dir.to_path_buf()),
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create assets dir");
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let config = create_test_config(assets_dir.path(), upload_dir.path(), &options);

    let pool = tubely_db::connect(config.database_url(), config.db_max_connections())
        .await
        .expect("Failed to open test database");
    let videos = VideoRepository::new(pool);

    let thumbnails = match config.thumbnail_storage().backend() {
        None => ThumbnailSink::Inline,
        Some(backend) => ThumbnailSink::Stored(
            create_storage(backend, &config)
                .await
                .expect("Failed to create thumbnail storage"),
        ),
    };

    let video_storage = Arc::new(MemoryStorage::new(VIDEO_BASE_URL.to_string()));
    let probe = Arc::new(options.probe);

    let state = Arc::new(AppState {
        config: config.clone(),
        videos: videos.clone(),
        thumbnails,
        video_storage: video_storage.clone() as Arc<dyn Storage>,
        probe: probe.clone() as Arc<dyn MediaProbe>,
    });

    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        video_storage,
        probe,
        assets_dir,
        upload_dir,
    }
}
