//! Tubely Media Processing Library
//!
//! Media type policy for uploaded parts, storage key generation, and video
//! dimension probing with aspect ratio classification.

pub mod aspect;
pub mod keys;
pub mod probe;
pub mod validator;

// Re-export commonly used types
pub use aspect::{AspectRatio, VideoDimensions};
pub use keys::{random_file_stem, thumbnail_file_name, thumbnail_object_key, video_object_key};
pub use probe::{FfprobeProbe, MediaProbe, ProbeError};
pub use validator::{extension_for, MediaTypePolicy, UploadPolicyError, ValidatedMediaType};
