//! Tubely Core Library
//!
//! This crate provides the domain model, error taxonomy and configuration
//! shared by the storage, processing, database and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, TubelyConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::Video;
pub use storage_types::{StorageBackend, ThumbnailNaming, ThumbnailStorage, VideoKeyLayout};
