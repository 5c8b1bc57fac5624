use ecoroute::{AppState, config::AppConfig, create_router};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecoroute=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    let mode = if state.search.is_live() { "live" } else { "demo" };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = create_router(state).layer(cors);

    tracing::info!("starting backend on http://{} ({mode} mode)", config.bind_addr);
    tracing::info!("API endpoints:");
    tracing::info!("  POST /api/routes - Rank candidate routes by CO₂");
    tracing::info!("  GET /api/geocode?q= - Resolve an address");
    tracing::info!("  GET /api/health - Service status");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
