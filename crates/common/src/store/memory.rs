use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use sha2::{Digest, Sha256};

use super::{ContentRef, ContentStore, FetchedContent, StoreError};

/// In-memory content-addressed store.
///
/// References are the hex sha-256 digest of the stored bytes, so identical
/// payloads pin to identical references. Used by tests and local
/// development; clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    blobs: HashMap<String, (Bytes, String)>,
    offline: bool,
    pin_calls: u64,
    fetch_calls: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable store; all operations fail with
    /// [`StoreError::Transport`] until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.inner.write().expect("store lock poisoned").offline = offline;
    }

    /// Number of pin (write) calls made against this store.
    pub fn pin_calls(&self) -> u64 {
        self.inner.read().expect("store lock poisoned").pin_calls
    }

    /// Number of fetch/probe (read) calls made against this store.
    pub fn fetch_calls(&self) -> u64 {
        self.inner.read().expect("store lock poisoned").fetch_calls
    }

    /// Overwrite the bytes stored at a reference, keeping the reference
    /// itself. Lets tests serve corrupt content for a previously pinned
    /// document.
    pub fn corrupt(&self, reference: &ContentRef, bytes: impl Into<Bytes>) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if let Some(entry) = inner.blobs.get_mut(reference.as_str()) {
            entry.0 = bytes.into();
        }
    }

    fn digest(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    fn put(&self, bytes: Bytes, content_type: &str) -> Result<ContentRef, StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.pin_calls += 1;
        if inner.offline {
            return Err(StoreError::Transport("memory store is offline".into()));
        }
        let reference = Self::digest(&bytes);
        inner
            .blobs
            .insert(reference.clone(), (bytes, content_type.to_string()));
        Ok(ContentRef::new(reference))
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn pin_bytes(
        &self,
        _name: &str,
        declared_mime: &Mime,
        bytes: Bytes,
    ) -> Result<ContentRef, StoreError> {
        self.put(bytes, declared_mime.as_ref())
    }

    async fn pin_json(&self, value: serde_json::Value) -> Result<ContentRef, StoreError> {
        let bytes = serde_json::to_vec(&value).map_err(|e| StoreError::Parse {
            reference: ContentRef::new(""),
            reason: e.to_string(),
        })?;
        self.put(Bytes::from(bytes), mime::APPLICATION_JSON.as_ref())
    }

    async fn fetch(&self, reference: &ContentRef) -> Result<FetchedContent, StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.fetch_calls += 1;
        if inner.offline {
            return Err(StoreError::Transport("memory store is offline".into()));
        }
        let (bytes, content_type) = inner
            .blobs
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(reference.clone()))?;
        let content_type =
            Mime::from_str(&content_type).unwrap_or(mime::APPLICATION_OCTET_STREAM);
        Ok(FetchedContent {
            bytes,
            content_type,
        })
    }

    async fn head_content_type(&self, reference: &ContentRef) -> Result<Mime, StoreError> {
        Ok(self.fetch(reference).await?.content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pin_is_content_addressed() {
        let store = MemoryStore::new();
        let a = store
            .pin_bytes("a.txt", &mime::TEXT_PLAIN, Bytes::from_static(b"same"))
            .await
            .unwrap();
        let b = store
            .pin_bytes("b.txt", &mime::TEXT_PLAIN, Bytes::from_static(b"same"))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_fetch_reports_stored_content_type() {
        let store = MemoryStore::new();
        let reference = store
            .pin_json(serde_json::json!({"hello": "world"}))
            .await
            .unwrap();
        let content = store.fetch(&reference).await.unwrap();
        assert_eq!(content.content_type, mime::APPLICATION_JSON);
    }

    #[tokio::test]
    async fn test_missing_content_is_not_found() {
        let store = MemoryStore::new();
        let err = store.fetch(&ContentRef::from("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_offline_store_fails_with_transport() {
        let store = MemoryStore::new();
        let reference = store.pin_json(serde_json::json!({})).await.unwrap();
        store.set_offline(true);
        let err = store.fetch(&reference).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[tokio::test]
    async fn test_resolve_json_distinguishes_corrupt_content() {
        let store = MemoryStore::new();
        let reference = store
            .pin_json(serde_json::json!({"ok": true}))
            .await
            .unwrap();
        store.corrupt(&reference, Bytes::from_static(b"not json {"));
        let err = store.resolve_json(&reference).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
