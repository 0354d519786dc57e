//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::net::TcpListener;

use blog_api::config::AppConfig;
use blog_api::state::AppState;
use blog_api::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blog API Server on {}:{}", config.host, config.port);

    let state = AppState::from_config(&config).await?;
    if config.seed_posts > 0 {
        blog_infra::seed::seed_many(state.posts.as_ref(), config.seed_posts).await?;
    }

    let listener = TcpListener::bind((config.host.as_str(), config.port))?;
    blog_api::server::run(listener, state)?.await?;

    tracing::info!("Server stopped");
    Ok(())
}
