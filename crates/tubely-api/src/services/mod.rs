//! Upload services used by the handlers.

pub mod thumbnail;
pub mod video;

pub use thumbnail::ThumbnailSink;
pub use video::{SpooledUpload, VideoUploadService};

use std::sync::Arc;
use tubely_core::{AppError, Video};
use tubely_db::VideoRepository;
use tubely_storage::Storage;
use uuid::Uuid;

/// Load a video and check that `user_id` owns it.
pub async fn fetch_owned_video(
    videos: &VideoRepository,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::debug!(video_id = %video_id, user_id = %user_id, "Upload refused for non-owner");
        return Err(AppError::Unauthorized(
            "Not authorized to update this video".to_string(),
        ));
    }

    Ok(video)
}

/// Pass `result` through. On error no record points at the object under
/// `key`, so it is deleted in the background.
pub fn discard_orphan_on_error<T>(
    result: Result<T, AppError>,
    storage: &Arc<dyn Storage>,
    key: &str,
) -> Result<T, AppError> {
    if result.is_err() {
        let storage = storage.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            if let Err(err) = storage.delete(&key).await {
                tracing::debug!(
                    error = %err,
                    key = %key,
                    "Cleanup of orphaned object failed"
                );
            }
        });
    }
    result
}
