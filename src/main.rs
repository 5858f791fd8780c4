// SPDX-License-Identifier: MIT

//! Readstack API Server
//!
//! Backend for a personal book-tracking application: registration,
//! login, and per-user book records with cover image uploads.

use readstack::{config::Config, db::FirestoreDb, services::CoverStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Readstack API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.firestore_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Cover storage; the directory is also served statically
    let covers = CoverStore::new(&config.uploads_dir);
    tokio::fs::create_dir_all(covers.root())
        .await
        .expect("Failed to create uploads directory");
    tracing::info!(path = %covers.root().display(), "Cover storage ready");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        covers,
    });

    // Build router
    let app = readstack::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("readstack=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
