//! Thumbnail persistence.
//!
//! A thumbnail either becomes an inline `data:` URL stored on the record, or
//! is written to a [`Storage`] backend whose public URL is stored instead.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tubely_core::{AppError, ThumbnailNaming, ThumbnailStorage, Video};
use tubely_db::VideoRepository;
use tubely_processing::{thumbnail_file_name, thumbnail_object_key, ValidatedMediaType};
use tubely_storage::{Storage, StorageBackend, StorageResult};
use uuid::Uuid;

use crate::services::discard_orphan_on_error;

/// Where a thumbnail ended up.
#[derive(Debug, Clone)]
pub struct StoredThumbnail {
    pub url: String,
    /// Storage key, absent for inline thumbnails.
    pub key: Option<String>,
}

#[derive(Clone)]
pub enum ThumbnailSink {
    Inline,
    Stored(Arc<dyn Storage>),
}

impl ThumbnailSink {
    pub fn strategy(&self) -> ThumbnailStorage {
        match self {
            ThumbnailSink::Inline => ThumbnailStorage::Inline,
            ThumbnailSink::Stored(storage) => match storage.backend_type() {
                StorageBackend::Local => ThumbnailStorage::Local,
                StorageBackend::Memory => ThumbnailStorage::Memory,
                StorageBackend::S3 => ThumbnailStorage::S3,
            },
        }
    }

    /// Backing store when it keeps bytes in process memory.
    pub fn memory_storage(&self) -> Option<&Arc<dyn Storage>> {
        match self {
            ThumbnailSink::Stored(storage) if storage.backend_type() == StorageBackend::Memory => {
                Some(storage)
            }
            _ => None,
        }
    }

    /// Persist the bytes and return the URL to record on the video.
    pub async fn store(
        &self,
        video_id: Uuid,
        naming: ThumbnailNaming,
        media_type: &ValidatedMediaType,
        data: Vec<u8>,
    ) -> StorageResult<StoredThumbnail> {
        match self {
            ThumbnailSink::Inline => Ok(StoredThumbnail {
                url: data_url(&media_type.essence, &data),
                key: None,
            }),
            ThumbnailSink::Stored(storage) => {
                let key = thumbnail_storage_key(
                    storage.backend_type(),
                    naming,
                    video_id,
                    media_type.extension,
                );
                tracing::debug!(video_id = %video_id, key = %key, "Storing thumbnail");
                let url = storage
                    .upload_with_key(&key, data, &media_type.essence)
                    .await?;
                Ok(StoredThumbnail { url, key: Some(key) })
            }
        }
    }

    /// Point the record at `stored`; if that fails the stored bytes are
    /// deleted in the background.
    pub async fn record(
        &self,
        videos: &VideoRepository,
        video_id: Uuid,
        stored: &StoredThumbnail,
    ) -> Result<Video, AppError> {
        let result = videos.set_thumbnail_url(video_id, &stored.url).await;
        match (self, stored.key.as_deref()) {
            (ThumbnailSink::Stored(storage), Some(key)) => {
                discard_orphan_on_error(result, storage, key)
            }
            _ => result,
        }
    }
}

/// `data:<media type>;base64,<payload>`
pub fn data_url(media_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(data))
}

/// Memory thumbnails are addressed by video id so they can be served back;
/// object stores get a `thumbnails/` prefix.
pub fn thumbnail_storage_key(
    backend: StorageBackend,
    naming: ThumbnailNaming,
    video_id: Uuid,
    extension: &str,
) -> String {
    match backend {
        StorageBackend::Memory => video_id.to_string(),
        StorageBackend::Local => thumbnail_file_name(naming, video_id, extension),
        StorageBackend::S3 => thumbnail_object_key(&thumbnail_file_name(naming, video_id, extension)),
    }
}
