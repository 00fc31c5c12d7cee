//! HTTP client for the blob store
//!
//! Speaks the Vercel Blob REST conventions: `PUT {api}/{pathname}` to upload,
//! `GET {api}?prefix=&limit=` to list, and a plain `GET` on the object URL
//! to download.

use anyhow::Context;
use async_trait::async_trait;
use rsvp_common::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::storage::{ObjectRef, RecordStore};

const API_VERSION: &str = "7";

/// Blob store reachable over HTTP
pub struct HttpBlobStore {
    api_url: String,
    token: String,
    client: reqwest::Client,
}

/// Listing response from the blob API
#[derive(Debug, Deserialize)]
struct ListBlobsResponse {
    blobs: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
struct BlobEntry {
    pathname: String,
    url: String,
}

impl HttpBlobStore {
    /// Create a new client. Every request is bounded by `timeout`.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl RecordStore for HttpBlobStore {
    async fn write(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        let url = format!("{}/{}", self.api_url, key);

        debug!("Uploading blob: {}", url);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .header("x-content-type", "application/json")
            .header("x-add-random-suffix", "0")
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::StoreWrite(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::StoreWrite(format!(
                "upload of {} returned {}",
                key,
                response.status()
            )));
        }

        Ok(())
    }

    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<ObjectRef>> {
        debug!("Listing blobs with prefix {} (limit {})", prefix, limit);

        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .query(&[("prefix", prefix.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| Error::StoreList(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::StoreList(format!(
                "listing returned {}",
                response.status()
            )));
        }

        let listing: ListBlobsResponse = response
            .json()
            .await
            .map_err(|e| Error::StoreList(format!("invalid listing response: {}", e)))?;

        // Not every compatible server honours `prefix` and `limit`
        Ok(listing
            .blobs
            .into_iter()
            .filter(|blob| blob.pathname.starts_with(prefix))
            .take(limit)
            .map(|blob| ObjectRef {
                key: blob.pathname,
                url: blob.url,
            })
            .collect())
    }

    async fn read(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        debug!("Fetching blob: {}", object.url);

        let response = self
            .client
            .get(&object.url)
            .send()
            .await
            .map_err(|e| Error::StoreRead(format!("{}: {}", object.key, e)))?;

        if !response.status().is_success() {
            return Err(Error::StoreRead(format!(
                "{} returned {}",
                object.key,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::StoreRead(format!("{}: {}", object.key, e)))?;

        Ok(bytes.to_vec())
    }
}
