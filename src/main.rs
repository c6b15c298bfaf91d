use std::env;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atscheck::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atscheck=debug,tower_http=debug,axum::rejection=trace".into());
    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting ATS resume checker");
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Gemini model: {}", config.gemini_model);

    // Determine port from environment (platform compatibility)
    let port = env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(config.server_port);
    let addr = format!("{}:{}", config.server_host, port);

    let state = AppState::from_config(config)?;
    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
