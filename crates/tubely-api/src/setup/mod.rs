//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_processing::FfprobeProbe;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment());

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let videos = database::setup_database(&config).await?;
    let (thumbnails, video_storage) = storage::setup_storage(&config).await?;
    let probe = Arc::new(FfprobeProbe::new(config.ffprobe_path().to_string()));

    let state = Arc::new(AppState {
        config: config.clone(),
        videos,
        thumbnails,
        video_storage,
        probe,
    });

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
