//! Video upload pipeline: spool → probe → key → store → persist.

use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;

use axum::extract::multipart::{Field, Multipart};
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tubely_core::{AppError, Video, VideoKeyLayout};
use tubely_db::VideoRepository;
use tubely_processing::{video_object_key, AspectRatio, MediaTypePolicy};
use tubely_storage::Storage;
use uuid::Uuid;

use crate::constants::{TEMP_FILE_PREFIX, VIDEO_CONTENT_TYPE, VIDEO_FIELD};
use crate::error::HttpAppError;
use crate::services::discard_orphan_on_error;
use crate::state::AppState;
use crate::utils::upload::{missing_field, multipart_error};

/// An uploaded part written to a temporary file.
///
/// The file is deleted when this value is dropped, whichever way the
/// request ends.
pub struct SpooledUpload {
    file: File,
    size: u64,
    temp: NamedTempFile,
}

impl SpooledUpload {
    pub async fn from_field(mut field: Field<'_>, dir: &Path) -> Result<Self, AppError> {
        let temp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(".mp4")
            .tempfile_in(dir)?;
        let mut file = File::from_std(temp.reopen()?);

        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(Self { file, size, temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reader positioned at the start of the spooled bytes.
    pub async fn rewound(&mut self) -> std::io::Result<File> {
        self.file.seek(SeekFrom::Start(0)).await?;
        self.file.try_clone().await
    }
}

pub struct VideoUploadService {
    state: Arc<AppState>,
}

impl VideoUploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Store the `video` part for an already authorized record and persist its URL.
    pub async fn upload(&self, video: Video, mut multipart: Multipart) -> Result<Video, HttpAppError> {
        let mut spooled = self.spool_video_field(&mut multipart).await?;

        tracing::info!(
            video_id = %video.id,
            size_bytes = spooled.size(),
            "Video spooled to temporary file"
        );

        let aspect = match self.state.config.video_key_layout() {
            VideoKeyLayout::Aspect => Some(self.classify(spooled.path()).await?),
            VideoKeyLayout::Flat => None,
        };
        let key = video_object_key(self.state.config.video_key_layout(), aspect);

        let reader = spooled.rewound().await.map_err(AppError::from)?;
        let url = self
            .state
            .video_storage
            .upload_stream(
                &key,
                VIDEO_CONTENT_TYPE,
                Some(spooled.size()),
                Box::pin(reader),
            )
            .await?;

        tracing::info!(video_id = %video.id, key = %key, "Video stored");

        let updated = record_video_url(
            &self.state.videos,
            &self.state.video_storage,
            video.id,
            &key,
            &url,
        )
        .await?;
        Ok(updated)
    }

    /// Find the `video` part, require `video/mp4`, and spool it to disk.
    async fn spool_video_field(&self, multipart: &mut Multipart) -> Result<SpooledUpload, HttpAppError> {
        let policy = MediaTypePolicy::exactly(VIDEO_CONTENT_TYPE);
        let dir = self.state.config.upload_temp_dir();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(VIDEO_FIELD) {
                continue;
            }
            policy.check(field.content_type())?;
            return Ok(SpooledUpload::from_field(field, &dir).await?);
        }

        Err(missing_field(VIDEO_FIELD).into())
    }

    async fn classify(&self, path: &Path) -> Result<AspectRatio, HttpAppError> {
        let dimensions = self.state.probe.probe(path).await?;
        let aspect = dimensions.aspect_ratio();
        tracing::debug!(
            width = dimensions.width,
            height = dimensions.height,
            aspect_ratio = %aspect,
            "Classified video"
        );
        Ok(aspect)
    }
}

/// Store `url` on the record; if that fails the object under `key` is
/// deleted in the background.
pub async fn record_video_url(
    videos: &VideoRepository,
    storage: &Arc<dyn Storage>,
    video_id: Uuid,
    key: &str,
    url: &str,
) -> Result<Video, AppError> {
    let result = videos.set_video_url(video_id, url).await;
    discard_orphan_on_error(result, storage, key)
}
