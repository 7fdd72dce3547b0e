use crate::{LocalStorage, MemoryStorage, S3Storage, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Route the in-memory backend's objects are served from.
pub const MEMORY_THUMBNAIL_ROUTE: &str = "/api/thumbnails";

/// Route the local assets root is served from.
pub const ASSETS_ROUTE: &str = "/assets";

/// Create a storage backend of the given type from configuration
pub async fn create_storage(
    backend: StorageBackend,
    config: &Config,
) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_url = format!("{}{}", config.public_base_url(), ASSETS_ROUTE);
            let storage = LocalStorage::new(config.assets_root().clone(), base_url).await?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Memory => {
            let base_url = format!("{}{}", config.public_base_url(), MEMORY_THUMBNAIL_ROUTE);
            Ok(Arc::new(MemoryStorage::new(base_url)))
        }
    }
}
