use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scan_map_service::{
    config::Config,
    handlers::{router, AppState},
    services::ApiClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scan_map_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting scan map service");
    info!("Trade-tracking API: {}", config.api_base_url);
    if config.map_token().is_none() {
        warn!("MAP_ACCESS_TOKEN is not set or blank; map endpoints will return empty maps");
    }

    let api = ApiClient::new(&config.api_base_url, &config.user_agent)?;
    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let app = router(AppState::new(config, api));

    info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("Shutting down...");
    Ok(())
}
