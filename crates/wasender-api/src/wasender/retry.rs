//! Rate-limit retry policy for message sends.
//!
//! Only `/send-message` goes through this policy. Read and management
//! endpoints never retry.

use crate::wasender::error::{WasenderError, RATE_LIMITED_STATUS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wait used when a 429 response carries no usable `retry_after`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Per-call retry settings. Disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub max_retries: u32,
}

impl RetryConfig {
    pub fn new(enabled: bool, max_retries: u32) -> Self {
        Self {
            enabled,
            max_retries,
        }
    }

    /// Enabled with the given number of retries.
    pub fn retries(max_retries: u32) -> Self {
        Self::new(true, max_retries)
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Upper bound on the number of requests one call can make.
    pub fn max_attempts(&self) -> u32 {
        if self.enabled {
            self.max_retries.saturating_add(1)
        } else {
            1
        }
    }

    /// Decide what to do after `attempt` (1-based) failed with `err`.
    ///
    /// Returns the wait before the next attempt, or `None` when the error
    /// must be propagated.
    pub fn next_delay(&self, attempt: u32, err: &WasenderError) -> Option<Duration> {
        if !self.enabled || attempt > self.max_retries {
            return None;
        }
        match err {
            WasenderError::Api { status, body, .. } if *status == RATE_LIMITED_STATUS => {
                Some(retry_after(body.as_ref()))
            }
            _ => None,
        }
    }
}

/// Read `retry_after` (seconds) from a 429 body. Fractions are truncated.
pub fn retry_after(body: Option<&serde_json::Value>) -> Duration {
    let value = match body.and_then(|b| b.get("retry_after")) {
        Some(v) => v,
        None => return DEFAULT_RETRY_AFTER,
    };

    let secs = match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_secs)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_secs))
        }
        _ => None,
    };

    secs.map(Duration::from_secs).unwrap_or(DEFAULT_RETRY_AFTER)
}

fn whole_secs(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 {
        Some(v.trunc() as u64)
    } else {
        None
    }
}
