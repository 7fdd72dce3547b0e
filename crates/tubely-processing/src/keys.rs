//! Storage key generation for uploaded assets.
//!
//! Random names are 32 bytes from the thread RNG, URL-safe base64 without
//! padding (43 characters).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tubely_core::{ThumbnailNaming, VideoKeyLayout};
use uuid::Uuid;

use crate::aspect::AspectRatio;

const THUMBNAIL_PREFIX: &str = "thumbnails";
const VIDEO_EXTENSION: &str = "mp4";

pub fn random_file_stem() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Filename for a stored thumbnail, e.g. `<random>.png` or `<video_id>.jpg`.
pub fn thumbnail_file_name(naming: ThumbnailNaming, video_id: Uuid, extension: &str) -> String {
    let stem = match naming {
        ThumbnailNaming::Random => random_file_stem(),
        ThumbnailNaming::VideoId => video_id.to_string(),
    };
    format!("{}.{}", stem, extension)
}

/// Object-store key for a thumbnail file name.
pub fn thumbnail_object_key(file_name: &str) -> String {
    format!("{}/{}", THUMBNAIL_PREFIX, file_name)
}

/// Object key for an uploaded video. `aspect` is only consulted for the
/// aspect layout; a missing classification there falls back to `other`.
pub fn video_object_key(layout: VideoKeyLayout, aspect: Option<AspectRatio>) -> String {
    let file_name = format!("{}.{}", random_file_stem(), VIDEO_EXTENSION);
    match layout {
        VideoKeyLayout::Aspect => {
            let prefix = aspect.unwrap_or(AspectRatio::Other).key_prefix();
            format!("{}/{}", prefix, file_name)
        }
        VideoKeyLayout::Flat => file_name,
    }
}
