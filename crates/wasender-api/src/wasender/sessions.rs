//! WhatsApp session management.
//!
//! Every endpoint here is authorised with the personal access token. A
//! client configured without one fails these calls with
//! [`WasenderError::Config`](crate::wasender::error::WasenderError::Config)
//! before any request is sent. None of them retry.

use crate::wasender::api_client::{TokenKind, WasenderClient};
use crate::wasender::error::WasenderResult;
use serde::Serialize;

const PAT: TokenKind = TokenKind::PersonalAccessToken;

impl WasenderClient {
    pub async fn get_all_whatsapp_sessions(&self) -> WasenderResult<serde_json::Value> {
        self.get("/whatsapp-sessions", PAT).await
    }

    /// Create a session. `payload` is sent as-is (name, phone number,
    /// webhook settings, …).
    pub async fn create_whatsapp_session<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> WasenderResult<serde_json::Value> {
        self.post("/whatsapp-sessions", Some(payload), PAT).await
    }

    pub async fn get_whatsapp_session_details(
        &self,
        session_id: u64,
    ) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/whatsapp-sessions/{}", session_id), PAT)
            .await
    }

    pub async fn update_whatsapp_session<T: Serialize + ?Sized>(
        &self,
        session_id: u64,
        payload: &T,
    ) -> WasenderResult<serde_json::Value> {
        self.put(&format!("/whatsapp-sessions/{}", session_id), payload, PAT)
            .await
    }

    pub async fn delete_whatsapp_session(&self, session_id: u64) -> WasenderResult<serde_json::Value> {
        self.delete(&format!("/whatsapp-sessions/{}", session_id), PAT)
            .await
    }

    /// Start pairing. With `qr_as_image` the QR code comes back as an
    /// image instead of a raw string.
    pub async fn connect_whatsapp_session(
        &self,
        session_id: u64,
        qr_as_image: bool,
    ) -> WasenderResult<serde_json::Value> {
        let query = if qr_as_image { "?qrAsImage=true" } else { "" };
        self.post::<()>(
            &format!("/whatsapp-sessions/{}/connect{}", session_id, query),
            None,
            PAT,
        )
        .await
    }

    pub async fn get_whatsapp_session_qr_code(
        &self,
        session_id: u64,
    ) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/whatsapp-sessions/{}/qr-code", session_id), PAT)
            .await
    }

    pub async fn disconnect_whatsapp_session(
        &self,
        session_id: u64,
    ) -> WasenderResult<serde_json::Value> {
        self.post::<()>(
            &format!("/whatsapp-sessions/{}/disconnect", session_id),
            None,
            PAT,
        )
        .await
    }

    /// Issue a new API key for the session. The old key stops working.
    pub async fn regenerate_api_key(&self, session_id: u64) -> WasenderResult<serde_json::Value> {
        self.post::<()>(
            &format!("/whatsapp-sessions/{}/regenerate-api-key", session_id),
            None,
            PAT,
        )
        .await
    }

    pub async fn get_session_status(&self, session_id: &str) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/sessions/{}/status", session_id), PAT)
            .await
    }
}
