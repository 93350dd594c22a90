//! Incoming webhook handling.
//!
//! Handles:
//! - Shared-secret check on the configured signature header
//! - Payload parsing and `event` discriminator lookup
//! - Dispatch to the host's [`EventDispatcher`]
//! - The axum route that wires the above to `POST <webhook_route>`
//!
//! The signature header is compared to the secret with plain string
//! equality. WasenderAPI sends the secret itself, not an HMAC of the body.

use crate::wasender::config::WasenderConfig;
use crate::wasender::error::WasenderResult;
use crate::wasender::events::{EventDispatcher, WebhookEvent};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use log::{debug, warn};
use std::sync::Arc;

/// Why a webhook request was refused. Both map to HTTP 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookRejection {
    InvalidSignature,
    InvalidPayload,
}

impl WebhookRejection {
    pub fn body(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "Invalid signature",
            Self::InvalidPayload => "Invalid payload",
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.body()).into_response()
    }
}

/// Webhook processor.
pub struct WebhookHandler {
    secret: Option<String>,
    signature_header: String,
    dispatcher: Arc<dyn EventDispatcher>,
}

impl WebhookHandler {
    pub fn new(
        secret: Option<String>,
        signature_header: impl Into<String>,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Self {
        Self {
            secret,
            signature_header: signature_header.into(),
            dispatcher,
        }
    }

    pub fn from_config(config: &WasenderConfig, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self::new(
            config.webhook_secret.clone(),
            config.webhook_signature_header.clone(),
            dispatcher,
        )
    }

    // ─── Signature validation ────────────────────────────────────────

    /// Missing header, missing secret, or any difference fails.
    pub fn verify_signature(&self, headers: &HeaderMap) -> Result<(), WebhookRejection> {
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                warn!("Webhook rejected: no webhook secret configured");
                WebhookRejection::InvalidSignature
            })?;

        let signature = headers
            .get(self.signature_header.as_str())
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                warn!("Webhook rejected: missing {} header", self.signature_header);
                WebhookRejection::InvalidSignature
            })?;

        if signature != secret {
            warn!("Webhook rejected: signature mismatch");
            return Err(WebhookRejection::InvalidSignature);
        }
        Ok(())
    }

    // ─── Payload parsing ─────────────────────────────────────────────

    /// Parse the body and resolve its event. The body must be a JSON
    /// object with a string `event` member.
    pub fn parse_event(raw_body: &[u8]) -> Result<WebhookEvent, WebhookRejection> {
        let payload: serde_json::Value = serde_json::from_slice(raw_body).map_err(|e| {
            warn!("Webhook rejected: body is not JSON ({})", e);
            WebhookRejection::InvalidPayload
        })?;

        let event = match payload.get("event").and_then(|e| e.as_str()) {
            Some(e) => e.to_string(),
            None => {
                warn!("Webhook rejected: payload has no `event` string");
                return Err(WebhookRejection::InvalidPayload);
            }
        };

        Ok(WebhookEvent::from_discriminator(&event, payload))
    }

    /// Validate, parse and dispatch one webhook request.
    pub async fn handle(&self, headers: &HeaderMap, raw_body: &[u8]) -> Result<(), WebhookRejection> {
        self.verify_signature(headers)?;
        let event = Self::parse_event(raw_body)?;
        debug!("Webhook accepted: {}", event.discriminator());
        self.dispatcher.dispatch(event).await;
        Ok(())
    }
}

// ─── Route ───────────────────────────────────────────────────────────

/// Router serving `POST {config.webhook_route}`. Mount or merge it into
/// the host application's router. The config is validated first, so a
/// route without a leading `/` is a `Config` error.
pub fn webhook_router(
    config: &WasenderConfig,
    dispatcher: Arc<dyn EventDispatcher>,
) -> WasenderResult<Router> {
    config.validate()?;
    let handler = Arc::new(WebhookHandler::from_config(config, dispatcher));
    Ok(Router::new()
        .route(&config.webhook_route, post(receive_webhook))
        .with_state(handler))
}

async fn receive_webhook(
    State(handler): State<Arc<WebhookHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match handler.handle(&headers, &body).await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(rejection) => rejection.into_response(),
    }
}
