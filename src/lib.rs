use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod auth;
pub mod config;
pub mod error;
pub mod fcm;
pub mod firestore;
pub mod message;
pub mod metrics;
pub mod notification_service;
pub mod utils;

use auth::AccessTokenProvider;
use config::Config;
use fcm::FcmClient;
use firestore::FirestoreProfileStore;
use notification_service::{DispatchSettings, NotificationDispatcher};

/// Dispatcher wired to the production collaborators
pub type ProductionDispatcher = NotificationDispatcher<FirestoreProfileStore, FcmClient>;

/// Connect timeout for outbound Google API calls; request deadlines are
/// left to the server side.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the Firestore/FCM-backed dispatcher from configuration
pub fn build_dispatcher(config: &Config) -> Result<ProductionDispatcher> {
    let http_client = reqwest::Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;

    let tokens = AccessTokenProvider::from_config(&config.fcm, http_client.clone())
        .context("Failed to initialize Google API credentials")?;

    let profiles =
        FirestoreProfileStore::new(config.firestore.clone(), http_client.clone(), tokens.clone());
    let transport = FcmClient::new(&config.fcm, http_client, tokens);

    Ok(NotificationDispatcher::new(
        profiles,
        transport,
        DispatchSettings::from_config(config),
    ))
}

pub async fn run() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("=== Chat Push Dispatcher Starting ===");
    tracing::info!(
        fcm_project = %config.fcm.project_id,
        firestore_project = %config.firestore.project_id,
        "Configuration loaded"
    );

    let dispatcher = Arc::new(build_dispatcher(&config)?);
    let app = notification_service::handlers::router(dispatcher);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received. Shutting down...");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
