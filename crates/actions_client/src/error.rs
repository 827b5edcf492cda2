use thiserror::Error;

use crate::retry::RetryError;

/// Workflow listing failures. Any of them aborts the render pass.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed HTTP request to {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode workflow listing from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Badge resolution failures. These never leave the resolver: the affected
/// workflow is shown as unknown.
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("Badge fetch failed: {0}")]
    Fetch(RetryError<reqwest::Error>),

    #[error("Badge SVG could not be parsed: {0}")]
    Parse(String),

    #[error("Badge SVG has no text elements")]
    NoText,
}
