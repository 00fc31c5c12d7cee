//! In-process record store for local development and tests
//!
//! Behaves like the blob store without any network: objects live in a
//! sorted map and references use `memory://<key>` URLs.

use async_trait::async_trait;
use rsvp_common::{Error, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::storage::{ObjectRef, RecordStore};

const URL_SCHEME: &str = "memory://";

/// Record store held in memory
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,

    /// When set, every operation fails as if the backend were down
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Drop an object, as an out-of-band deletion would
    pub async fn remove(&self, key: &str) -> bool {
        self.objects.write().await.remove(key).is_some()
    }

    fn is_unavailable(&self) -> bool {
        self.unavailable.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn write(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        if self.is_unavailable() {
            return Err(Error::StoreWrite("memory store unavailable".to_string()));
        }

        debug!("Memory store: write({})", key);
        self.objects.write().await.insert(key.to_string(), payload);
        Ok(())
    }

    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<ObjectRef>> {
        if self.is_unavailable() {
            return Err(Error::StoreList("memory store unavailable".to_string()));
        }

        let objects = self.objects.read().await;
        let refs: Vec<ObjectRef> = objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(limit)
            .map(|(key, _)| ObjectRef {
                key: key.clone(),
                url: format!("{}{}", URL_SCHEME, key),
            })
            .collect();

        debug!("Memory store: list({}) -> {} objects", prefix, refs.len());
        Ok(refs)
    }

    async fn read(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        if self.is_unavailable() {
            return Err(Error::StoreRead("memory store unavailable".to_string()));
        }

        let key = object.url.strip_prefix(URL_SCHEME).unwrap_or(&object.key);

        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| Error::StoreRead(format!("object not found: {}", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_list_read() {
        let store = MemoryStore::new();
        store.write("rsvp-1-a", b"{}".to_vec()).await.unwrap();
        store.write("rsvp-2-b", b"[]".to_vec()).await.unwrap();
        store.write("other-1", b"x".to_vec()).await.unwrap();

        let refs = store.list("rsvp-", 100).await.unwrap();
        let keys: Vec<_> = refs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["rsvp-1-a", "rsvp-2-b"]);
        assert_eq!(refs[0].url, "memory://rsvp-1-a");

        assert_eq!(store.read(&refs[1]).await.unwrap(), b"[]".to_vec());
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .write(&format!("rsvp-{}", i), b"{}".to_vec())
                .await
                .unwrap();
        }

        assert_eq!(store.list("rsvp-", 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_read_missing_object() {
        let store = MemoryStore::new();
        store.write("rsvp-1", b"{}".to_vec()).await.unwrap();
        let refs = store.list("rsvp-", 10).await.unwrap();

        assert!(store.remove("rsvp-1").await);
        let err = store.read(&refs[0]).await.unwrap_err();
        assert!(matches!(err, Error::StoreRead(_)));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.write("rsvp-1", Vec::new()).await,
            Err(Error::StoreWrite(_))
        ));
        assert!(matches!(
            store.list("rsvp-", 10).await,
            Err(Error::StoreList(_))
        ));

        store.set_unavailable(false);
        assert!(store.list("rsvp-", 10).await.unwrap().is_empty());
    }
}
