//! Contact lookup and blocking.

use crate::wasender::api_client::{TokenKind, WasenderClient};
use crate::wasender::error::WasenderResult;

impl WasenderClient {
    /// List all contacts of the session.
    pub async fn get_contacts(&self) -> WasenderResult<serde_json::Value> {
        self.get("/contacts", TokenKind::ApiKey).await
    }

    pub async fn get_contact_info(&self, phone: &str) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/contacts/{}", phone), TokenKind::ApiKey)
            .await
    }

    pub async fn get_contact_profile_picture(
        &self,
        phone: &str,
    ) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/contacts/{}/profile-picture", phone), TokenKind::ApiKey)
            .await
    }

    pub async fn block_contact(&self, phone: &str) -> WasenderResult<serde_json::Value> {
        self.post::<()>(&format!("/contacts/{}/block", phone), None, TokenKind::ApiKey)
            .await
    }

    pub async fn unblock_contact(&self, phone: &str) -> WasenderResult<serde_json::Value> {
        self.post::<()>(&format!("/contacts/{}/unblock", phone), None, TokenKind::ApiKey)
            .await
    }
}
