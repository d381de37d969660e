use anyhow::Result;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_screening::analysis::Analyzer;
use cv_screening::config::Config;
use cv_screening::routes::build_router;
use cv_screening::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("cv_screening={0},cv_screening_api={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV screening API v{}", env!("CARGO_PKG_VERSION"));

    // Default pipeline: built-in vocabulary, PDF + plain-text decoding
    let analyzer = Analyzer::default();
    info!(
        "Analyzer ready (batch concurrency: {}, upload limit: {} bytes)",
        config.batch_concurrency, config.max_upload_bytes
    );

    let state = AppState::new(config.clone(), analyzer);

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
