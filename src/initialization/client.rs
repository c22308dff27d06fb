//! HTTP client initialization.
//!
//! Two clients are built per analysis: a desktop-UA client shared by the
//! SEO, security, and performance checkers, and a mobile-UA client for the
//! mobile checker. Both follow redirects and use the rustls TLS backend.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, HTTP_REQUEST_TIMEOUT_SECS};
use crate::error_handling::InitializationError;

/// Initializes the desktop-UA HTTP client.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    build_client(&config.user_agent)
}

/// Initializes the mobile-UA HTTP client used by the mobile checker.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_mobile_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    build_client(&config.mobile_user_agent)
}

fn build_client(user_agent: &str) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .use_rustls_tls()
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .user_agent(user_agent.to_string())
        .build()?;
    Ok(client)
}
