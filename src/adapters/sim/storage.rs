//! In-memory blob store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{PortError, VerifyResult};
use crate::domain::ports::BlobStore;

/// Bucket → key → bytes, behind a lock. Keys list in lexical order
/// because each bucket is a `BTreeMap`.
#[derive(Default)]
pub struct MemoryBlobStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object_count(&self, bucket: &str, prefix: &str) -> usize {
        self.buckets
            .read()
            .await
            .get(bucket)
            .map(|b| b.keys().filter(|k| k.starts_with(prefix)).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> VerifyResult<()> {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> VerifyResult<Vec<u8>> {
        self.buckets
            .read()
            .await
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| PortError::Storage(format!("no such object: {bucket}/{key}")).into())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> VerifyResult<Vec<String>> {
        Ok(self
            .buckets
            .read()
            .await
            .get(bucket)
            .map(|b| {
                b.keys()
                    .filter(|k| k.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, bucket: &str, key: &str) -> VerifyResult<()> {
        if let Some(b) = self.buckets.write().await.get_mut(bucket) {
            b.remove(key);
        }
        Ok(())
    }
}
