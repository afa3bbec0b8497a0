use std::sync::Arc;

use anyhow::Context;
use city_weather_api::{app, config::AppConfig, services::city_store::SqliteCityStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting app...");

    let config = AppConfig::from_env()?;

    // The cities table is imported ahead of time; this process only reads it.
    let store = SqliteCityStore::open(&config.db_path)
        .with_context(|| format!("Failed to open city database {}", config.db_path.display()))?;

    let app = app::gen_app(&config, Arc::new(store));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running -> http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
