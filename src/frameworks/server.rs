// Framework bootstrap for the relay server runtime.

use crate::frameworks::config;
use crate::interface_adapters::net::ws_handler;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{HubSettings, SessionHub, expiry_sweeper};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

/// One-time process setup: env vars, log output, panic hook. Must run
/// before anything binds or spawns.
fn init_runtime() {
    // A missing .env file is not an error; deployments set vars directly.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // LOG_FORMAT=json selects machine-readable output for log shippers.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().with_current_span(true).init(),
        _ => builder.compact().init(),
    }

    // Panics land in the log stream, with a backtrace when enabled.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    let app = Router::new().route("/ws", get(ws_handler)).with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    let hub = Arc::new(SessionHub::new(HubSettings {
        default_room: config::DEFAULT_ROOM_ID.to_string(),
        spawn_area: config::SPAWN_AREA,
        default_direction: config::DEFAULT_DIRECTION,
        disconnect_ttl: config::DISCONNECT_TTL,
    }));

    // Background housekeeping: evict stale disconnect cache entries. It
    // shares the hub lock only for the duration of each sweep, so it
    // never stalls message handling.
    tokio::spawn(expiry_sweeper(hub.clone(), config::SWEEP_INTERVAL));

    Arc::new(AppState { hub })
}
