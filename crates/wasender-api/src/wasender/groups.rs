//! WhatsApp group management: metadata, participants and settings.

use crate::wasender::api_client::{TokenKind, WasenderClient};
use crate::wasender::error::WasenderResult;
use serde::Serialize;
use serde_json::json;

impl WasenderClient {
    pub async fn get_groups(&self) -> WasenderResult<serde_json::Value> {
        self.get("/groups", TokenKind::ApiKey).await
    }

    /// Metadata (subject, owner, …) of the group identified by `jid`.
    pub async fn get_group_metadata(&self, jid: &str) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/groups/{}/metadata", jid), TokenKind::ApiKey)
            .await
    }

    pub async fn get_group_participants(&self, jid: &str) -> WasenderResult<serde_json::Value> {
        self.get(&format!("/groups/{}/participants", jid), TokenKind::ApiKey)
            .await
    }

    /// Add participants (phone numbers or JIDs) to a group.
    pub async fn add_group_participants<S: AsRef<str>>(
        &self,
        jid: &str,
        participants: &[S],
    ) -> WasenderResult<serde_json::Value> {
        let body = participants_body(participants);
        self.post(
            &format!("/groups/{}/participants/add", jid),
            Some(&body),
            TokenKind::ApiKey,
        )
        .await
    }

    pub async fn remove_group_participants<S: AsRef<str>>(
        &self,
        jid: &str,
        participants: &[S],
    ) -> WasenderResult<serde_json::Value> {
        let body = participants_body(participants);
        self.post(
            &format!("/groups/{}/participants/remove", jid),
            Some(&body),
            TokenKind::ApiKey,
        )
        .await
    }

    /// Update group settings. `settings` is sent as the request body.
    pub async fn update_group_settings<T: Serialize + ?Sized>(
        &self,
        jid: &str,
        settings: &T,
    ) -> WasenderResult<serde_json::Value> {
        self.put(&format!("/groups/{}/settings", jid), settings, TokenKind::ApiKey)
            .await
    }
}

fn participants_body<S: AsRef<str>>(participants: &[S]) -> serde_json::Value {
    let list: Vec<&str> = participants.iter().map(AsRef::as_ref).collect();
    json!({ "participants": list })
}
