//! Development server for device inventory UI development
//!
//! This binary serves the mock device backend with the sample inventory so
//! the UI can be developed without a real backend.
//!
//! Environment variables can be set directly or loaded from a .env file:
//! - IP_ADDRESS: bind address, defaults to 127.0.0.1
//! - PORT: bind port, defaults to 0 (OS-assigned)
//!
//! Usage: cargo run -p dev-server

use anyhow::{Context, Result};
use payloads::{APIClient, ClientConfig};
use test_helpers::{mock, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Silently ignored if there is no .env file
    let _ = dotenvy::dotenv();

    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber);

    let ip = std::env::var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".into());
    let port = match std::env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a port number")?,
        Err(_) => 0,
    };

    info!("🚀 Starting device inventory development server");
    let backend = test_helpers::spawn_backend_on(&ip, port).await;
    mock::seed_inventory(&backend);

    // Probe the backend the way the UI will, as a smoke check
    let api_base = backend.url(mock::API_PREFIX);
    let client = APIClient::new(ClientConfig::new(&api_base, None, None)?);
    let devices = client.get_devices(None).await?;
    backend.clear_requests();

    info!("🎯 Development server ready!");
    info!("   API: {api_base}");
    info!("   UI:  cd ui && API_BASE_URL={api_base} trunk serve");
    info!("");
    for device in &devices {
        info!("   {} {} ({})", device.id, device.name, device.status);
    }
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
