//! RSVP Service
//!
//! Guest form, JSON API and admin dashboard on top of a blob store

use anyhow::{Context, Result};
use rsvp_service::{build_store, create_router, AppState, Config, RsvpService, StoreBackend};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rsvp_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RSVP Service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    match config.store_backend {
        StoreBackend::Http => info!("Blob store: {}", config.blob_api_url),
        StoreBackend::Memory => warn!("Using in-memory store, RSVPs are lost on restart"),
    }
    info!(
        "Listing cap: {}, read concurrency: {}",
        config.list_limit, config.read_concurrency
    );

    // Initialize storage
    let store = build_store(&config).context("Failed to initialize record store")?;

    // Create application state
    let service = RsvpService::new(store)
        .with_list_limit(config.list_limit)
        .with_read_concurrency(config.read_concurrency);
    let state = AppState::new(service)
        .with_event(config.event.clone())
        .with_error_details(config.expose_error_details);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("RSVP Service running on http://{}", addr);
    info!("Guest form: http://{}/", addr);
    info!("Admin dashboard: http://{}/admin", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
