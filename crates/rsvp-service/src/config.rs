//! Configuration management for the RSVP service
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::service::{DEFAULT_LIST_LIMIT, DEFAULT_READ_CONCURRENCY};

/// Which record store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote blob store over HTTP
    Http,
    /// In-process store, contents are lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(StoreBackend::Http),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown STORE_BACKEND: {} (expected http or memory)", other),
        }
    }
}

/// Invitation copy shown on the guest form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub question: String,
    pub name: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub contact: String,
    pub signature: String,
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            title: "RSVP".to_string(),
            question: "Kom je op ons feestje?".to_string(),
            name: "Feestje".to_string(),
            location: String::new(),
            date: String::new(),
            time: String::new(),
            contact: String::new(),
            signature: String::new(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub host: String,

    /// API server port
    pub port: u16,

    /// Record store backend
    pub store_backend: StoreBackend,

    /// Base URL of the blob store API
    pub blob_api_url: String,

    /// Read/write token for the blob store (required for the HTTP backend)
    pub blob_token: Option<String>,

    /// Timeout applied to every blob store request
    pub store_timeout: Duration,

    /// Maximum number of records returned by a listing
    pub list_limit: usize,

    /// Record reads in flight while listing
    pub read_concurrency: usize,

    /// Include internal error details in API error bodies
    pub expose_error_details: bool,

    /// Invitation copy
    pub event: EventDetails,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let defaults = EventDetails::default();

        let config = Config {
            host: var("RSVP_HOST", "0.0.0.0"),

            port: var("RSVP_PORT", "3000")
                .parse()
                .context("Invalid RSVP_PORT")?,

            store_backend: var("STORE_BACKEND", "http").parse()?,

            blob_api_url: var("BLOB_API_URL", "https://blob.vercel-storage.com"),

            blob_token: lookup("BLOB_READ_WRITE_TOKEN").filter(|token| !token.is_empty()),

            store_timeout: Duration::from_secs(
                var("STORE_TIMEOUT_SECS", "10")
                    .parse()
                    .context("Invalid STORE_TIMEOUT_SECS")?,
            ),

            list_limit: var("RSVP_LIST_LIMIT", &DEFAULT_LIST_LIMIT.to_string())
                .parse()
                .context("Invalid RSVP_LIST_LIMIT")?,

            read_concurrency: var("RSVP_READ_CONCURRENCY", &DEFAULT_READ_CONCURRENCY.to_string())
                .parse()
                .context("Invalid RSVP_READ_CONCURRENCY")?,

            expose_error_details: var("EXPOSE_ERROR_DETAILS", "false")
                .parse()
                .context("Invalid EXPOSE_ERROR_DETAILS (expected true/false)")?,

            event: EventDetails {
                title: var("EVENT_TITLE", &defaults.title),
                question: var("EVENT_QUESTION", &defaults.question),
                name: var("EVENT_NAME", &defaults.name),
                location: var("EVENT_LOCATION", &defaults.location),
                date: var("EVENT_DATE", &defaults.date),
                time: var("EVENT_TIME", &defaults.time),
                contact: var("EVENT_CONTACT", &defaults.contact),
                signature: var("EVENT_SIGNATURE", &defaults.signature),
            },
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("RSVP_PORT must be greater than 0");
        }

        if self.store_timeout.is_zero() {
            anyhow::bail!("STORE_TIMEOUT_SECS must be greater than 0");
        }

        if self.list_limit == 0 {
            anyhow::bail!("RSVP_LIST_LIMIT must be greater than 0");
        }

        if self.read_concurrency == 0 {
            anyhow::bail!("RSVP_READ_CONCURRENCY must be greater than 0");
        }

        if self.store_backend == StoreBackend::Http && self.blob_token.is_none() {
            anyhow::bail!("BLOB_READ_WRITE_TOKEN is required when STORE_BACKEND=http");
        }

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
