use crate::config::{load_config, Config, ConfigError};
use crate::web::{start_server, MetricsSink, ProcessCounters};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Load the config at `path`, or the built-in defaults when no file was found.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Run the HTTP log processor until a shutdown signal arrives.
pub async fn run(config: Config, config_path: Option<&Path>) -> Result<(), RunError> {
    match config_path {
        Some(path) => info!(config_path = %path.display(), "Loaded configuration"),
        None => warn!("No config file found, using built-in defaults"),
    }

    let counters: Arc<dyn MetricsSink> = Arc::new(ProcessCounters::new());

    start_server(&config, Arc::clone(&counters), shutdown_signal()).await?;

    let totals = counters.snapshot();
    info!(
        total_requests = totals.total_requests,
        total_logs = totals.total_logs,
        total_errors = totals.total_errors,
        "Log processor stopped"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received, draining connections");
}
