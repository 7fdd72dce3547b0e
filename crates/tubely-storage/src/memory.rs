use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;

/// In-process storage. Bytes live only as long as the process; writes to
/// the same key replace the previous object.
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
    base_url: String,
}

impl MemoryStorage {
    /// `base_url` is the route the objects are served back from
    /// (e.g., "http://localhost:8091/api/thumbnails").
    pub fn new(base_url: String) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            base_url,
        }
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    async fn insert(&self, storage_key: &str, data: Bytes, content_type: &str) {
        let size = data.len();
        let object = StoredObject {
            data,
            content_type: Some(content_type.to_string()),
        };
        self.objects
            .write()
            .await
            .insert(storage_key.to_string(), object);

        tracing::debug!(
            key = %storage_key,
            size_bytes = size,
            "Memory storage upload successful"
        );
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        self.insert(storage_key, Bytes::from(data), content_type)
            .await;
        Ok(self.public_url(storage_key))
    }

    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let mut buffer = Vec::with_capacity(content_length.unwrap_or(0) as usize);
        reader.read_to_end(&mut buffer).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
        })?;

        self.insert(storage_key, Bytes::from(buffer), content_type)
            .await;
        Ok(self.public_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<StoredObject> {
        self.objects
            .read()
            .await
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.objects.write().await.remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects.read().await.contains_key(storage_key))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_memory_round_trip_keeps_content_type() {
        let storage = MemoryStorage::new("http://localhost:8091/api/thumbnails".to_string());

        let url = storage
            .upload_with_key("video-1", b"jpeg".to_vec(), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8091/api/thumbnails/video-1");

        let object = storage.download("video-1").await.unwrap();
        assert_eq!(object.data.as_ref(), b"jpeg");
        assert_eq!(object.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_memory_last_writer_wins() {
        let storage = MemoryStorage::new("http://localhost/t".to_string());
        storage
            .upload_with_key("k", b"first".to_vec(), "image/png")
            .await
            .unwrap();
        storage
            .upload_with_key("k", b"second".to_vec(), "image/jpeg")
            .await
            .unwrap();

        assert_eq!(storage.len().await, 1);
        let object = storage.download("k").await.unwrap();
        assert_eq!(object.data.as_ref(), b"second");
    }

    #[tokio::test]
    async fn test_memory_concurrent_disjoint_keys() {
        let storage = Arc::new(MemoryStorage::new("http://localhost/t".to_string()));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .upload_with_key(&format!("key-{}", i), vec![i as u8], "image/png")
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(storage.len().await, 16);
        assert_eq!(storage.download("key-7").await.unwrap().data.as_ref(), &[7u8]);
    }

    #[tokio::test]
    async fn test_memory_missing_key() {
        let storage = MemoryStorage::new("http://localhost/t".to_string());
        assert!(matches!(
            storage.download("absent").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!storage.exists("absent").await.unwrap());
        assert!(storage.delete("absent").await.is_ok());
    }
}
