//! WasenderAPI webhook gateway.
//!
//! Loads `WASENDERAPI_*` settings, mounts the webhook route next to a
//! health check, and logs every dispatched event from a broadcast
//! subscriber. Hosts that need more than logging subscribe to the same
//! [`BroadcastDispatcher`].

use axum::{http::StatusCode, routing::get, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wasender_api::{webhook_router, BroadcastDispatcher, WasenderConfig, WasenderError, WebhookEvent};

pub const ENV_GATEWAY_ADDR: &str = "WASENDER_GATEWAY_ADDR";
pub const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] WasenderError),
    #[error("invalid listen address {addr:?}: {reason}")]
    Addr { addr: String, reason: String },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the gateway reads at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    pub wasender: WasenderConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(ENV_GATEWAY_ADDR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GATEWAY_ADDR.to_string());
        let addr = raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| GatewayError::Addr {
                addr: raw.clone(),
                reason: e.to_string(),
            })?;
        let wasender = WasenderConfig::from_env_with(&lookup)?;
        Ok(Self { addr, wasender })
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins; otherwise `info`. Records
/// from the `log` facade are bridged in.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("logging already initialised: {}", e);
    }
}

// ─── Router ──────────────────────────────────────────────────────────

pub const HEALTH_ROUTE: &str = "/health";

/// Health check plus the webhook route. Fails on an invalid webhook route
/// or one that collides with the health check.
pub fn build_app(
    config: &WasenderConfig,
    dispatcher: Arc<BroadcastDispatcher>,
) -> Result<Router, GatewayError> {
    if config.webhook_route == HEALTH_ROUTE {
        return Err(WasenderError::config(format!(
            "webhook route {:?} is reserved for the health check",
            HEALTH_ROUTE
        ))
        .into());
    }
    Ok(Router::new()
        .route(HEALTH_ROUTE, get(health_check))
        .merge(webhook_router(config, dispatcher)?))
}

async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "wasender-gateway",
        })),
    )
}

// ─── Event logging ───────────────────────────────────────────────────

/// Log each event until the dispatcher is dropped.
pub fn spawn_event_logger(mut rx: broadcast::Receiver<WebhookEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => info!(event = event.discriminator(), generic = event.is_generic(), "webhook event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event logger fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

// ─── Entry point ─────────────────────────────────────────────────────

pub async fn run() -> Result<(), GatewayError> {
    init_logging();

    let config = GatewayConfig::from_env()?;
    if config.wasender.webhook_secret.as_deref().map_or(true, str::is_empty) {
        warn!("WASENDERAPI_WEBHOOK_SECRET is not set; every webhook will be rejected");
    }

    let dispatcher = Arc::new(BroadcastDispatcher::default());
    let _logger = spawn_event_logger(dispatcher.subscribe());
    let app = build_app(&config.wasender, dispatcher)?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        route = %config.wasender.webhook_route,
        "wasender gateway listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("wasender gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
