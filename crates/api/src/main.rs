use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phm_api::background;
use phm_api::config::{MonitorConfig, TickMode};
use phm_api::controller::FleetController;
use phm_api::router::build_app_router;
use phm_api::source::{FileSource, SimulatedSource, SnapshotSource};
use phm_api::state::AppState;
use phm_events::EventBus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phm_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = MonitorConfig::from_env().context("Invalid monitor configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        snapshot = %config.snapshot_path.display(),
        tick_mode = config.tick_mode.as_str(),
        interval_secs = config.tick_interval_secs,
        "Loaded monitor configuration"
    );

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Fleet controller and initial load ---
    let controller = FleetController::new(
        config.status_thresholds,
        config.alert_thresholds,
        Arc::clone(&event_bus),
    )
    .into_shared();

    let mut file_source = FileSource::new(&config.snapshot_path, config.status_thresholds);
    {
        let mut guard = controller.lock().await;
        match guard.load(&mut file_source, Utc::now()).await {
            Ok(state) => tracing::info!(
                machines = state.machines.len(),
                rejected = state.rejected.len(),
                "Initial fleet snapshot loaded"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "Initial fleet snapshot unavailable, serving an empty fleet"
            ),
        }
    }

    // --- Ticker ---
    let tick_source: Box<dyn SnapshotSource> = match config.tick_mode {
        TickMode::Simulate => Box::new(SimulatedSource::from_seed(
            config.sim_seed,
            config.status_thresholds,
        )),
        TickMode::Reload => Box::new(file_source),
    };

    let ticker_cancel = CancellationToken::new();
    let ticker_handle = tokio::spawn(background::ticker::run(
        Arc::clone(&controller),
        tick_source,
        config.tick_interval(),
        ticker_cancel.clone(),
    ));

    // --- App state and router ---
    let state = AppState {
        controller,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let ip = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    ticker_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), ticker_handle).await;
    tracing::info!("Fleet ticker stopped");

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
