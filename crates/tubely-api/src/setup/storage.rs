//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, Storage};

use crate::services::ThumbnailSink;

/// Build the thumbnail sink and the video storage backend from configuration.
pub async fn setup_storage(config: &Config) -> Result<(ThumbnailSink, Arc<dyn Storage>)> {
    tracing::info!("Initializing storage...");

    let thumbnails = match config.thumbnail_storage().backend() {
        None => ThumbnailSink::Inline,
        Some(backend) => ThumbnailSink::Stored(
            create_storage(backend, config)
                .await
                .context("Failed to initialize thumbnail storage")?,
        ),
    };

    let video_storage = create_storage(config.video_storage(), config)
        .await
        .context("Failed to initialize video storage")?;

    tracing::info!(
        thumbnail_storage = ?thumbnails.strategy(),
        video_storage = ?video_storage.backend_type(),
        "Storage initialized successfully"
    );

    Ok((thumbnails, video_storage))
}
