//! Record store abstraction over the external blob store

use async_trait::async_trait;
use rsvp_common::Result;
use serde::{Deserialize, Serialize};

/// Reference to a stored object, as returned by a prefix listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Object key (pathname in the store)
    pub key: String,

    /// URL the object content can be fetched from
    pub url: String,
}

/// Key/blob store used to persist RSVP records.
///
/// Errors are reported as `Error::StoreWrite`, `Error::StoreList` and
/// `Error::StoreRead` respectively.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store `payload` under `key`
    async fn write(&self, key: &str, payload: Vec<u8>) -> Result<()>;

    /// List up to `limit` objects whose key starts with `prefix`, in no particular order
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<ObjectRef>>;

    /// Fetch the raw content of an object
    async fn read(&self, object: &ObjectRef) -> Result<Vec<u8>>;
}
