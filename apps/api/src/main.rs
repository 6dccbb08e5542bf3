mod config;
mod errors;
mod llm_client;
mod models;
mod normalize;
mod render;
mod routes;
mod state;
mod tailoring;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{OllamaClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::extractor::PdfTextExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job packager v{}", env!("CARGO_PKG_VERSION"));

    // Initialize text generator client
    let generator = Arc::new(OllamaClient::new(
        &config.generator_url,
        &config.generator_model,
        Duration::from_secs(config.generator_timeout_secs),
    )?);
    info!(
        "Text generator client initialized ({} at {})",
        generator.model(),
        generator.endpoint()
    );

    let state = AppState::new(config.clone(), generator.clone(), Arc::new(PdfTextExtractor));

    state.store.ensure_layout().await?;
    info!("Storage root ready at {}", state.store.root().display());

    // Tailoring still works without the generator, with placeholder cover letters.
    match generator.status().await {
        Ok(_) => info!("Text generator is reachable"),
        Err(e) => warn!(
            "Text generator not reachable at {}: {e}. Cover letters will be placeholders until it is started.",
            generator.endpoint()
        ),
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
