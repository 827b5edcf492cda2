use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Listing page size; a shorter page is the last one
pub const PAGE_SIZE: usize = 100;

const DEFAULT_USER_AGENT: &str = concat!("actions-dashboard/", env!("CARGO_PKG_VERSION"));

/// Timeout and retry bounds for a single badge resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Per-attempt timeout
    pub timeout_ms: u64,
    /// Additional attempts after the first one fails
    pub retries: u32,
    /// Fixed pause between attempts
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 8000,
            retries: 3,
            delay_ms: 500,
        }
    }
}

impl RetryPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    /// Optional static token sent with listing requests
    pub token: Option<String>,
    pub page_size: usize,
    pub user_agent: String,
    pub http_proxy: String,
    pub https_proxy: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            page_size: PAGE_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_proxy: String::new(),
            https_proxy: String::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
