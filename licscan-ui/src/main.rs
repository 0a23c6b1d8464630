//! licscan-ui - Web UI for dependency-license analysis
//!
//! Serves the login, registration, and analysis pages on localhost and
//! relays requests to the authentication and analysis services.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use licscan_common::config::{
    default_config_path, ensure_directory_exists, load_toml_config, CompiledDefaults, TomlConfig,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use licscan_ui::client::{HttpBackend, ServiceEndpoints};
use licscan_ui::config::{Args, UiConfig};
use licscan_ui::session::{FileTokenStorage, SessionStore};
use licscan_ui::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file is read before tracing exists: its log level feeds the filter
    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path("licscan-ui"));
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path).context("Failed to load config file")?,
        None => TomlConfig::default(),
    };
    let config = UiConfig::resolve(&args, &toml_config, &CompiledDefaults::for_current_platform());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting licscan-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config directory on this platform, using defaults"),
    }
    info!("Authentication service: {}", config.auth_url);
    info!("Analysis service: {}", config.analysis_url);

    ensure_directory_exists(&config.data_folder).context("Failed to create data folder")?;
    info!("Data folder: {}", config.data_folder.display());

    let storage = Arc::new(FileTokenStorage::new(&config.data_folder));
    let session = SessionStore::init(storage).context("Failed to load session token")?;

    let endpoints = ServiceEndpoints::new(config.auth_url.clone(), config.analysis_url.clone());
    let backend = HttpBackend::new(endpoints, session.clone())
        .context("Failed to initialize HTTP client")?;

    let state = AppState::new(session, Arc::new(backend));
    let app = build_router(state);

    // Local single-user service: loopback only
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("licscan-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
