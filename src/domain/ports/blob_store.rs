//! Blob storage port - interface to the shared object store.
//!
//! Each member's observation is written to its own key, so the prefix
//! is single-writer-per-key and needs no locking; reads happen only
//! after a write barrier plus settle delay.

use async_trait::async_trait;

use crate::domain::errors::VerifyResult;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> VerifyResult<()>;

    async fn get(&self, bucket: &str, key: &str) -> VerifyResult<Vec<u8>>;

    /// All keys under the prefix, in lexical order.
    async fn list(&self, bucket: &str, prefix: &str) -> VerifyResult<Vec<String>>;

    /// Delete-if-exists; deleting an absent key is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> VerifyResult<()>;
}
