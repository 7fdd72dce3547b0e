//! Application state shared by every handler.

use crate::services::ThumbnailSink;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::MediaProbe;
use tubely_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: VideoRepository,
    /// Where thumbnail bytes end up (inline data URL or a storage backend)
    pub thumbnails: ThumbnailSink,
    pub video_storage: Arc<dyn Storage>,
    pub probe: Arc<dyn MediaProbe>,
}
