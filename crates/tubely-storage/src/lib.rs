//! Tubely Storage Library
//!
//! Storage abstraction for uploaded thumbnails and videos, with local
//! filesystem, in-memory and S3 (via `object_store`) backends.
//!
//! # Storage key format
//!
//! Keys are relative, slash-separated paths such as `thumbnails/<name>.png`
//! or `landscape/<name>.mp4`. Keys must not be empty, contain `..` or start
//! with `/`; every backend checks this through the `keys` module.

pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod memory;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
pub use tubely_core::StorageBackend;
