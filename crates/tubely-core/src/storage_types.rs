use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Defined in core because configuration selects between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Where uploaded thumbnails end up.
///
/// `Inline` never touches a backend: the bytes are encoded into a data URL
/// stored on the video record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStorage {
    Local,
    Inline,
    Memory,
    S3,
}

impl ThumbnailStorage {
    /// Backend holding the bytes, if any.
    pub fn backend(&self) -> Option<StorageBackend> {
        match self {
            ThumbnailStorage::Local => Some(StorageBackend::Local),
            ThumbnailStorage::Memory => Some(StorageBackend::Memory),
            ThumbnailStorage::S3 => Some(StorageBackend::S3),
            ThumbnailStorage::Inline => None,
        }
    }
}

impl FromStr for ThumbnailStorage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ThumbnailStorage::Local),
            "inline" => Ok(ThumbnailStorage::Inline),
            "memory" => Ok(ThumbnailStorage::Memory),
            "s3" => Ok(ThumbnailStorage::S3),
            _ => Err(anyhow::anyhow!("Invalid thumbnail storage: {}", s)),
        }
    }
}

/// How stored thumbnail filenames are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailNaming {
    /// 32 random bytes, URL-safe base64 without padding
    Random,
    /// The owning video's UUID
    VideoId,
}

impl FromStr for ThumbnailNaming {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(ThumbnailNaming::Random),
            "video_id" | "videoid" => Ok(ThumbnailNaming::VideoId),
            _ => Err(anyhow::anyhow!("Invalid thumbnail naming: {}", s)),
        }
    }
}

/// Object key layout for uploaded videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKeyLayout {
    /// `<landscape|portrait|other>/<random>.mp4`, requires probing
    Aspect,
    /// `<random>.mp4`
    Flat,
}

impl FromStr for VideoKeyLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aspect" => Ok(VideoKeyLayout::Aspect),
            "flat" => Ok(VideoKeyLayout::Flat),
            _ => Err(anyhow::anyhow!("Invalid video key layout: {}", s)),
        }
    }
}
