//! RSVP Service
//!
//! Collects event RSVPs from a public form and lists them for the host.
//!
//! ## Architecture
//!
//! Every submission is written as its own JSON object in an external blob
//! store under an `rsvp-` key. There is no index object: listing is a prefix
//! scan followed by one read per object.
//!
//! - `storage`: the `RecordStore` abstraction
//! - `blob_client`: HTTP blob store implementation
//! - `memory_store`: in-process implementation for development and tests
//! - `service`: submission and collection pipeline
//! - `handlers`: JSON API
//! - `pages`: guest form and admin dashboard
//! - `config`: configuration management
//!
//! ## Endpoints
//!
//! - `POST /rsvp` - Submit an RSVP
//! - `GET /admin/rsvps` - List all RSVPs, newest first
//! - `GET /admin/stats` - Yes/no counts
//! - `GET /` and `POST /` - Guest form
//! - `GET /admin` - Admin dashboard
//! - `GET /health` - Health check

pub mod blob_client;
pub mod config;
pub mod handlers;
pub mod memory_store;
pub mod pages;
pub mod service;
pub mod storage;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use blob_client::HttpBlobStore;
pub use config::{Config, EventDetails, StoreBackend};
pub use handlers::AppState;
pub use memory_store::MemoryStore;
pub use service::RsvpService;
pub use storage::{ObjectRef, RecordStore};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        // JSON API
        .route(
            "/rsvp",
            get(handlers::rsvp_status_handler).post(handlers::submit_rsvp_handler),
        )
        .route("/admin/rsvps", get(handlers::list_rsvps_handler))
        .route("/admin/stats", get(handlers::stats_handler))
        // Pages
        .route(
            "/",
            get(pages::form_page_handler).post(pages::form_submit_handler),
        )
        .route("/admin", get(pages::admin_page_handler))
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Build the record store selected by the configuration
pub fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Http => {
            let token = config
                .blob_token
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("BLOB_READ_WRITE_TOKEN is not set"))?;
            Ok(Arc::new(HttpBlobStore::new(
                &config.blob_api_url,
                token,
                config.store_timeout,
            )?))
        }
    }
}
