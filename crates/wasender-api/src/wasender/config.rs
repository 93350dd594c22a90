//! Client and webhook configuration.
//!
//! Values come from explicit construction, any serde source, or the
//! `WASENDERAPI_*` environment variables. Nothing is read after the
//! config has been handed to a client or webhook handler.

use crate::wasender::error::{WasenderError, WasenderResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://www.wasenderapi.com/api";
pub const DEFAULT_WEBHOOK_ROUTE: &str = "/wasender/webhook";
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-webhook-signature";

pub const ENV_API_KEY: &str = "WASENDERAPI_API_KEY";
pub const ENV_PERSONAL_ACCESS_TOKEN: &str = "WASENDERAPI_PERSONAL_ACCESS_TOKEN";
pub const ENV_BASE_URL: &str = "WASENDERAPI_BASE_URL";
pub const ENV_WEBHOOK_SECRET: &str = "WASENDERAPI_WEBHOOK_SECRET";
pub const ENV_WEBHOOK_ROUTE: &str = "WASENDERAPI_WEBHOOK_ROUTE";
pub const ENV_SIGNATURE_HEADER: &str = "WASENDERAPI_WEBHOOK_SIGNATURE_HEADER";
pub const ENV_TIMEOUT_SEC: &str = "WASENDERAPI_TIMEOUT_SEC";

/// Credentials, endpoint and webhook settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasenderConfig {
    /// Session API key, used for messaging, contacts and groups.
    #[serde(default)]
    pub api_key: String,
    /// Account-level token, required by the session-management endpoints.
    #[serde(default)]
    pub personal_access_token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Shared secret expected in the webhook signature header.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default = "default_webhook_route")]
    pub webhook_route: String,
    #[serde(default = "default_signature_header")]
    pub webhook_signature_header: String,
    /// Timeout in seconds for API calls.
    #[serde(default = "default_timeout")]
    pub timeout_sec: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_webhook_route() -> String {
    DEFAULT_WEBHOOK_ROUTE.to_string()
}
fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_string()
}
fn default_timeout() -> u32 {
    30
}

impl Default for WasenderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            personal_access_token: None,
            base_url: default_base_url(),
            webhook_secret: None,
            webhook_route: default_webhook_route(),
            webhook_signature_header: default_signature_header(),
            timeout_sec: default_timeout(),
        }
    }
}

// Tokens and the webhook secret stay out of debug output.
impl std::fmt::Debug for WasenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasenderConfig")
            .field("api_key", &redact(Some(&self.api_key)))
            .field(
                "personal_access_token",
                &redact(self.personal_access_token.as_deref()),
            )
            .field("base_url", &self.base_url)
            .field("webhook_secret", &redact(self.webhook_secret.as_deref()))
            .field("webhook_route", &self.webhook_route)
            .field("webhook_signature_header", &self.webhook_signature_header)
            .field("timeout_sec", &self.timeout_sec)
            .finish()
    }
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "<redacted>",
        _ => "<unset>",
    }
}

impl WasenderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_personal_access_token(mut self, token: impl Into<String>) -> Self {
        self.personal_access_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    pub fn with_webhook_route(mut self, route: impl Into<String>) -> Self {
        self.webhook_route = route.into();
        self
    }

    pub fn with_signature_header(mut self, header: impl Into<String>) -> Self {
        self.webhook_signature_header = header.into();
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> WasenderResult<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset or empty variables
    /// keep their defaults.
    pub fn from_env_with<F>(lookup: F) -> WasenderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get(ENV_API_KEY) {
            config.api_key = v;
        }
        config.personal_access_token = get(ENV_PERSONAL_ACCESS_TOKEN);
        if let Some(v) = get(ENV_BASE_URL) {
            config.base_url = v;
        }
        config.webhook_secret = get(ENV_WEBHOOK_SECRET);
        if let Some(v) = get(ENV_WEBHOOK_ROUTE) {
            config.webhook_route = v;
        }
        if let Some(v) = get(ENV_SIGNATURE_HEADER) {
            config.webhook_signature_header = v;
        }
        if let Some(v) = get(ENV_TIMEOUT_SEC) {
            config.timeout_sec = v.trim().parse().map_err(|_| {
                WasenderError::config(format!("{} must be a whole number, got {:?}", ENV_TIMEOUT_SEC, v))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the parts that would otherwise fail at request time.
    pub fn validate(&self) -> WasenderResult<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| WasenderError::config(format!("invalid base URL {:?}: {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WasenderError::config(format!(
                "base URL must be http(s), got {:?}",
                self.base_url
            )));
        }
        if !self.webhook_route.starts_with('/') {
            return Err(WasenderError::config(format!(
                "webhook route must start with '/', got {:?}",
                self.webhook_route
            )));
        }
        if self.webhook_signature_header.trim().is_empty() {
            return Err(WasenderError::config("webhook signature header name is empty"));
        }
        if self.timeout_sec == 0 {
            return Err(WasenderError::config("timeout_sec must be at least 1"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The personal access token, if one is set and non-empty.
    pub fn personal_access_token(&self) -> Option<&str> {
        self.personal_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}
