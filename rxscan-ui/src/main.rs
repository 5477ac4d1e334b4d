//! rxscan-ui - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use rxscan_common::config::TomlConfig;
use rxscan_ui::backend::BackendClient;
use rxscan_ui::config::{CliArgs, UiSettings, DEFAULT_LOG_FILTER};
use rxscan_ui::notify::Notifier;
use rxscan_ui::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

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
        "Starting rxscan-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml_config = toml_config.context("Failed to load configuration")?;
    let settings = UiSettings::resolve(&args, &toml_config);

    info!("Backend API URL: {}", settings.backend_url);
    let backend = BackendClient::new(settings.backend_url.clone(), settings.backend_timeout)
        .context("Failed to build backend client")?;
    let notifier = Notifier::from_settings(&settings.smtp);

    let state = AppState::new(backend, notifier, settings.max_upload_bytes);
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
