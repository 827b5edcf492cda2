use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy};

use crate::config::ClientConfig;
use crate::error::ClientError;

pub const GITHUB_JSON: &str = "application/vnd.github+json";

/// Builds the shared HTTP client. Listing requests and badge fetches both go
/// through it, so proxy settings apply to either.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut builder = Client::builder().default_headers(default_headers(config)?);
    if !config.http_proxy.is_empty() {
        let proxy = Proxy::http(&config.http_proxy)
            .map_err(|e| ClientError::Config(format!("invalid http proxy: {e}")))?;
        builder = builder.proxy(proxy);
    }
    if !config.https_proxy.is_empty() {
        let proxy = Proxy::https(&config.https_proxy)
            .map_err(|e| ClientError::Config(format!("invalid https proxy: {e}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| ClientError::Config(format!("invalid user agent: {e}")))?;
    headers.insert(USER_AGENT, agent);
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Ok(headers)
}

/// `Authorization` value for a static token, marked sensitive so it stays
/// out of debug output
pub(crate) fn bearer(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ClientError::Config("token contains invalid header characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
