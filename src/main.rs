// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::setup::build_platform;
use crate::infrastructure::config::load_providers_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_sensor, health_check, list_sensors};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration and wire accounts, sensors and pollers.
    // Any setup error aborts here, before anything is scheduled.
    let providers_config = load_providers_config()?;
    let platform = build_platform(&providers_config)?;

    // Schedule one refresh loop per account, for the process lifetime
    for poller in platform.pollers {
        tokio::spawn(poller.run());
    }

    // Create application state
    let state = Arc::new(AppState {
        sensors: platform.sensors,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/sensors", get(list_sensors))
        .route("/sensors/:name", get(get_sensor))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    tracing::info!("starting utility-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
