//! Counterparty Registry Binary
//!
//! Starts the registry HTTP API over the in-memory ledger gateway.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin counterparty-registry
//! ```
//!
//! # Environment Variables
//!
//! - `REGISTRY_CONFIG`: path to the YAML config (default: config.yaml, optional)
//! - `RUST_LOG`: log filter, overrides `observability.logging.level`

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use counterparty_registry::application::ports::LedgerGatewayPort;
use counterparty_registry::config::{Config, load_config_or_default, resolve_config_path};
use counterparty_registry::infrastructure::config::InMemoryContainer;
use counterparty_registry::infrastructure::http::create_router;
use counterparty_registry::observability::{MetricsConfig, init_metrics};
use counterparty_registry::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config_or_default(None).with_context(|| {
        format!(
            "failed to load configuration from {}",
            resolve_config_path(None)
        )
    })?;
    init_tracing(&config.observability.logging)?;

    tracing::info!("Starting Counterparty Registry");
    log_config(&config);

    start_metrics(&config)?;

    let container = InMemoryContainer::from_config(&config);
    check_gateway(&container, &config).await?;

    let shutdown_token = CancellationToken::new();
    let mut http_handle = start_http_server(&config, &container, shutdown_token.clone()).await?;

    tracing::info!("Counterparty registry ready");

    let stopped_early = tokio::select! {
        () = shutdown_signal() => false,
        _ = &mut http_handle => true,
    };

    if stopped_early {
        tracing::warn!("HTTP server stopped unexpectedly");
    } else {
        shutdown_token.cancel();
        tracing::info!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "Graceful shutdown started"
        );
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut http_handle)
            .await
            .is_err()
        {
            tracing::warn!("HTTP server did not stop within the shutdown timeout");
            http_handle.abort();
        }
    }

    tracing::info!("Counterparty registry stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        bind_address = %config.server.bind_address,
        http_port = config.server.http_port,
        gateway = %config.gateway.endpoint,
        confirmation_latency_ms = config.gateway.confirmation_latency_ms,
        expected_loss_basis = ?config.risk.expected_loss_basis(),
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );
}

/// Install the Prometheus exporter when enabled.
fn start_metrics(config: &Config) -> anyhow::Result<()> {
    if !config.observability.metrics.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .observability
        .metrics
        .listen_addr
        .parse()
        .context("invalid metrics listen address")?;
    init_metrics(&MetricsConfig::with_addr(addr))?;
    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

/// Probe the ledger once at startup.
async fn check_gateway(container: &InMemoryContainer, config: &Config) -> anyhow::Result<()> {
    match container.gateway().check_connectivity().await {
        Ok(status) if status.connected => {
            tracing::info!(endpoint = %status.endpoint, "Ledger gateway connected");
            Ok(())
        }
        Ok(status) => {
            unreachable_gateway(config, &format!("{} reports disconnected", status.endpoint))
        }
        Err(e) => unreachable_gateway(config, &e.to_string()),
    }
}

fn unreachable_gateway(config: &Config, reason: &str) -> anyhow::Result<()> {
    if config.gateway.require_connectivity {
        anyhow::bail!("ledger gateway is not reachable: {reason}");
    }
    tracing::warn!(reason, "Ledger gateway is not reachable, continuing");
    Ok(())
}

/// Start the HTTP server with graceful shutdown support.
async fn start_http_server(
    config: &Config,
    container: &InMemoryContainer,
    shutdown: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    let app = create_router(container.app_state(env!("CARGO_PKG_VERSION")));
    let http_addr = config.server.socket_addr()?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/commands");
    tracing::info!("  POST /api/v1/commands");
    tracing::info!("  POST /api/v1/counterparties");
    tracing::info!("  GET  /api/v1/counterparties/{{identity}}");
    tracing::info!("  PUT  /api/v1/counterparties/{{identity}}/exposure");
    tracing::info!("  GET  /api/v1/counterparties/{{identity}}/risk");
    tracing::info!("  GET  /api/v1/counterparties/{{identity}}/risk/{{metric}}");

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;
    let http_server =
        axum::serve(listener, app).with_graceful_shutdown(shutdown.cancelled_owned());

    let handle = tokio::spawn(async move {
        if let Err(e) = http_server.await {
            tracing::error!("HTTP server error: {e}");
        }
    });

    Ok(handle)
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
