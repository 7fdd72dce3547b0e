//! API constants

/// Multipart field carrying a thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying a video file
pub const VIDEO_FIELD: &str = "video";

/// The only media type accepted for video uploads
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

pub const TEMP_FILE_PREFIX: &str = "tubely-upload-";
