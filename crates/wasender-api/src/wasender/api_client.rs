//! HTTP client for the WasenderAPI REST endpoints.
//!
//! Provides the low-level request helpers shared by the messaging,
//! contacts, groups and sessions modules, plus the rate-limit retry
//! loop used by message sends.

use crate::wasender::config::WasenderConfig;
use crate::wasender::error::{WasenderError, WasenderResult};
use crate::wasender::retry::RetryConfig;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;

pub const SDK_USER_AGENT: &str = "wasenderapi-rust-sdk";

/// Which credential an endpoint is authorised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Session API key (messaging, contacts, groups).
    ApiKey,
    /// Account personal access token (session management).
    PersonalAccessToken,
}

/// Client for the WasenderAPI. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct WasenderClient {
    http: reqwest::Client,
    config: WasenderConfig,
}

impl WasenderClient {
    /// Create a new client from configuration.
    pub fn new(config: WasenderConfig) -> WasenderResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec as u64))
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| WasenderError::network(format!("HTTP client init failed: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Build from the `WASENDERAPI_*` environment variables.
    pub fn from_env() -> WasenderResult<Self> {
        Self::new(WasenderConfig::from_env()?)
    }

    pub fn config(&self) -> &WasenderConfig {
        &self.config
    }

    // ─── URL / auth helpers ──────────────────────────────────────────

    /// `{base_url}{path}`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.normalized_base_url(), path)
    }

    fn token(&self, kind: TokenKind) -> WasenderResult<&str> {
        match kind {
            TokenKind::ApiKey => Ok(&self.config.api_key),
            TokenKind::PersonalAccessToken => self.config.personal_access_token().ok_or_else(|| {
                WasenderError::config("this endpoint requires a personal access token")
            }),
        }
    }

    fn headers(&self, token: &str) -> WasenderResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| WasenderError::config("token contains characters not allowed in a header"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    // ─── HTTP primitives ─────────────────────────────────────────────

    pub(crate) async fn get(&self, path: &str, auth: TokenKind) -> WasenderResult<serde_json::Value> {
        self.request::<()>(Method::GET, path, None, auth).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        auth: TokenKind,
    ) -> WasenderResult<serde_json::Value> {
        self.request(Method::POST, path, body, auth).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: TokenKind,
    ) -> WasenderResult<serde_json::Value> {
        self.request(Method::PUT, path, Some(body), auth).await
    }

    pub(crate) async fn delete(&self, path: &str, auth: TokenKind) -> WasenderResult<serde_json::Value> {
        self.request::<()>(Method::DELETE, path, None, auth).await
    }

    /// Single request, no retry. Token checks happen before anything is
    /// sent.
    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: TokenKind,
    ) -> WasenderResult<serde_json::Value> {
        let token = self.token(auth)?;
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut req = self
            .http
            .request(method, &url)
            .headers(self.headers(token)?);
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        if !(200..300).contains(&status) {
            return Err(WasenderError::from_api_response(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(serde_json::json!({"success": true}));
        }
        Ok(serde_json::from_str(&text)?)
    }

    // ─── Retrying POST (message sends) ───────────────────────────────

    /// POST with the 429 retry policy. An absent `retry` means no retries.
    ///
    /// The wait between attempts is a `tokio` sleep on the calling task, not
    /// a blocking one. Dropping the returned future cancels a pending retry.
    pub(crate) async fn post_with_retry<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        retry: Option<RetryConfig>,
    ) -> WasenderResult<serde_json::Value> {
        let retry = retry.unwrap_or_default();
        let mut attempt = 0u32;

        while attempt < retry.max_attempts() {
            attempt += 1;
            debug!("POST {} (attempt {})", path, attempt);

            match self.post(path, Some(body), TokenKind::ApiKey).await {
                Ok(value) => return Ok(value),
                Err(err) => match retry.next_delay(attempt, &err) {
                    Some(delay) => {
                        warn!(
                            "Rate limited on {} (attempt {}), retrying in {}s",
                            path,
                            attempt,
                            delay.as_secs()
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(err),
                },
            }
        }

        Err(WasenderError::MaxRetriesExceeded)
    }
}
