//! rxscan-api - Main entry point
//!
//! Loads configuration, probes the NER endpoints, connects the OCR client
//! and serves the extraction API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rxscan_api::config::{ApiSettings, CliArgs, DEFAULT_LOG_FILTER};
use rxscan_api::extraction::{ExtractionEngine, ModelRegistry};
use rxscan_api::ocr::OcrAdapter;
use rxscan_api::{build_router, AppState};
use rxscan_common::config::TomlConfig;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // The config file may raise the default log filter, so read it first
    let toml_config = TomlConfig::load(args.config.as_deref());
    let default_filter = toml_config
        .as_ref()
        .ok()
        .and_then(|c| c.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting rxscan-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml_config = toml_config.context("Failed to load configuration")?;
    let settings = ApiSettings::resolve(&args, &toml_config);

    let models = ModelRegistry::initialize(&settings.ner).await;
    let ocr = OcrAdapter::from_settings(&settings.ocr).await;

    info!(
        "NER model: {}",
        if models.general_ready() { "initialized" } else { "not loaded" }
    );
    info!(
        "Medical NER: {}",
        if models.medical_ready() { "initialized" } else { "not loaded" }
    );
    if !ocr.is_configured() {
        warn!("AWS Textract: not configured");
    }

    let engine = ExtractionEngine::new(Arc::new(models));
    let state = AppState::new(engine, ocr, settings.max_upload_bytes);
    let app = build_router(state);

    let addr = settings.bind_addr();
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
