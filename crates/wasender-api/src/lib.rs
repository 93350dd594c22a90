//! # wasender-api: WasenderAPI client and webhook receiver
//!
//! Async client for the WasenderAPI REST endpoints and an axum route that
//! turns inbound webhooks into typed events.
//!
//! ## Capabilities
//!
//! - **Messaging** – text, image, video, document, audio, sticker, contact
//!   card and location messages via `/send-message`, with an opt-in
//!   per-call retry on HTTP 429.
//! - **Contacts** – list, info, profile picture, block / unblock.
//! - **Groups** – list, metadata, participants (list / add / remove),
//!   settings.
//! - **Sessions** – create, list, inspect, update, delete, connect (QR),
//!   disconnect, regenerate API key, status. Requires a personal access
//!   token.
//! - **Webhooks** – shared-secret header check, `event` discriminator
//!   lookup over sixteen known events plus a generic fallback, dispatch to
//!   an [`EventDispatcher`].

pub mod wasender;

pub use wasender::api_client::{TokenKind, WasenderClient};
pub use wasender::config::WasenderConfig;
pub use wasender::error::{WasenderError, WasenderResult};
pub use wasender::events::{BroadcastDispatcher, EventDispatcher, FnDispatcher, WebhookEvent};
pub use wasender::retry::RetryConfig;
pub use wasender::types::*;
pub use wasender::webhooks::{webhook_router, WebhookHandler, WebhookRejection};
