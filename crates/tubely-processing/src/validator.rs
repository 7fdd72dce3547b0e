use mime::Mime;

/// Reasons an uploaded part is refused before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum UploadPolicyError {
    #[error("Missing Content-Type on uploaded file")]
    MissingContentType,

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Unsupported media type: {media_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        media_type: String,
        allowed: Vec<String>,
    },

    #[error("No file extension known for media type: {0}")]
    UnknownExtension(String),
}

/// Media type accepted by a [`MediaTypePolicy`], parameters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMediaType {
    pub essence: String,
    pub extension: &'static str,
}

/// File extension (without dot) for the media types uploads may carry.
pub fn extension_for(media_type: &str) -> Option<&'static str> {
    match media_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "video/mp4" => Some("mp4"),
        _ => None,
    }
}

/// Strict media type check for an uploaded part's `Content-Type`.
#[derive(Debug, Clone)]
pub struct MediaTypePolicy {
    allowed: Vec<String>,
}

impl MediaTypePolicy {
    /// An empty allowlist accepts any media type with a known extension.
    pub fn new(allowed: Vec<String>) -> Self {
        Self {
            allowed: allowed.into_iter().map(|ct| ct.to_lowercase()).collect(),
        }
    }

    /// Policy accepting exactly one media type.
    pub fn exactly(media_type: &str) -> Self {
        Self::new(vec![media_type.to_string()])
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn check(&self, content_type: Option<&str>) -> Result<ValidatedMediaType, UploadPolicyError> {
        let raw = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .ok_or(UploadPolicyError::MissingContentType)?;

        let parsed: Mime = raw
            .parse()
            .map_err(|_| UploadPolicyError::InvalidMediaType(raw.to_string()))?;
        let essence = parsed.essence_str().to_lowercase();

        if !self.allowed.is_empty() && !self.allowed.iter().any(|ct| ct == &essence) {
            return Err(UploadPolicyError::UnsupportedMediaType {
                media_type: essence,
                allowed: self.allowed.clone(),
            });
        }

        let extension = extension_for(&essence)
            .ok_or_else(|| UploadPolicyError::UnknownExtension(essence.clone()))?;

        Ok(ValidatedMediaType { essence, extension })
    }
}
