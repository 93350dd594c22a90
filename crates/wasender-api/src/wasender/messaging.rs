//! Send messages through `/send-message`.
//!
//! Each `send_*` method takes the structured message or its tuple form
//! (`("123", "hi")`), and an optional [`SendOptions`] with extra payload
//! fields and the per-call [`RetryConfig`](crate::wasender::retry::RetryConfig).

use crate::wasender::api_client::WasenderClient;
use crate::wasender::error::WasenderResult;
use crate::wasender::types::*;
use log::debug;

pub const SEND_MESSAGE_PATH: &str = "/send-message";

impl WasenderClient {
    /// Send any message kind. All `send_*` helpers end up here.
    pub async fn send_message(
        &self,
        message: impl Into<OutboundMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        let message = message.into();
        let options = options.into().unwrap_or_default();
        let payload = message.to_payload(&options.extra)?;

        debug!("Sending {} message to {}", message.kind(), message.recipient());
        self.post_with_retry(SEND_MESSAGE_PATH, &payload, options.retry)
            .await
    }

    // ─── Text ────────────────────────────────────────────────────────

    pub async fn send_text(
        &self,
        message: impl Into<TextMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    // ─── Media ───────────────────────────────────────────────────────

    /// Image by URL; tuple form `(to, url)` or `(to, url, Some(caption))`.
    pub async fn send_image(
        &self,
        message: impl Into<ImageMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    pub async fn send_video(
        &self,
        message: impl Into<VideoMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    pub async fn send_document(
        &self,
        message: impl Into<DocumentMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    pub async fn send_audio(
        &self,
        message: impl Into<AudioMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    pub async fn send_sticker(
        &self,
        message: impl Into<StickerMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    // ─── Contact / location ──────────────────────────────────────────

    /// Contact card; tuple form `(to, name, phone)`.
    pub async fn send_contact(
        &self,
        message: impl Into<ContactMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }

    /// Location pin; tuple form `(to, lat, lng)` or
    /// `(to, lat, lng, Some(name), Some(address))`.
    pub async fn send_location(
        &self,
        message: impl Into<LocationMessage>,
        options: impl Into<Option<SendOptions>>,
    ) -> WasenderResult<serde_json::Value> {
        self.send_message(message.into(), options).await
    }
}
