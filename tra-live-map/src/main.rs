use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tra_live_map::config::AppConfig;
use tra_live_map::pipeline::Pipeline;
use tra_live_map::refresh::{LatestMap, spawn_refresh_loop};
use tra_live_map::tdx::{CredentialManager, HttpTokenExchange, TdxClient};
use tra_live_map::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tra_live_map=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Create TDX client
    let exchange =
        HttpTokenExchange::new(config.auth.clone()).expect("Failed to create token client");
    let credentials = Arc::new(
        CredentialManager::new(exchange, config.credentials.clone()).with_safety_margin(
            chrono::Duration::seconds(config.token_safety_margin_secs),
        ),
    );
    let client =
        TdxClient::new(config.tdx.clone(), credentials).expect("Failed to create TDX client");

    let pipeline = Arc::new(
        Pipeline::new(client, config.map.clone()).with_name_locales(config.name_locales.clone()),
    );

    // Serve a placeholder until the first cycle completes
    let latest = LatestMap::pending(&config.map);
    spawn_refresh_loop(pipeline, latest.clone(), config.refresh_interval);

    let refresh_ms = u64::try_from(config.refresh_interval.as_millis()).unwrap_or(u64::MAX);
    let state = AppState::new(latest, config.map.title.as_str(), refresh_ms);
    let app = create_router(state);

    tracing::info!(addr = %config.listen_addr, "server listening");
    tracing::info!("  GET /        - Live map page");
    tracing::info!("  GET /map     - Latest map document");
    tracing::info!("  GET /status  - Last refresh summary");
    tracing::info!("  GET /health  - Health check");

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
