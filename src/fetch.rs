//! Target page fetching.
//!
//! The SEO, mobile, and security checkers all inspect the target page
//! itself. This module fetches it over HTTPS with an HTTP fallback and
//! returns a snapshot of headers, cookies, and a size-capped body.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, SET_COOKIE};

use crate::config::{HTTP_REQUEST_TIMEOUT_SECS, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::CheckError;

/// A fetched page: everything the markup- and header-driven checkers need.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// Whether the page was served over HTTPS.
    pub https: bool,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw `Set-Cookie` header values, one per cookie.
    pub set_cookies: Vec<String>,
    /// Response body, truncated to `MAX_RESPONSE_BODY_SIZE`.
    pub body: String,
}

/// Fetches `https://{domain}`, falling back to `http://{domain}` when the
/// HTTPS attempt fails entirely. The snapshot records which scheme worked;
/// only both schemes failing is an error.
pub async fn fetch_page(client: &reqwest::Client, domain: &str) -> Result<PageSnapshot, CheckError> {
    match fetch_scheme(client, domain, true).await {
        Ok(snapshot) => Ok(snapshot),
        Err(https_err) => {
            debug!("HTTPS fetch failed for {domain} ({https_err}), falling back to HTTP");
            fetch_scheme(client, domain, false).await.map_err(|e| {
                if e.is_timeout() {
                    CheckError::UpstreamTimeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
                } else {
                    CheckError::UpstreamUnreachable(format!(
                        "{domain} unreachable over HTTPS ({https_err}) and HTTP ({e})"
                    ))
                }
            })
        }
    }
}

async fn fetch_scheme(
    client: &reqwest::Client,
    domain: &str,
    https: bool,
) -> Result<PageSnapshot, reqwest::Error> {
    let scheme = if https { "https" } else { "http" };
    let url = format!("{scheme}://{domain}");
    let response = client.get(&url).send().await?;

    let status = response.status();
    let headers = response.headers().clone();
    let set_cookies = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .collect();

    let bytes = response.bytes().await?;
    let capped = &bytes[..bytes.len().min(MAX_RESPONSE_BODY_SIZE)];
    let body = String::from_utf8_lossy(capped).into_owned();

    debug!(
        "Fetched {url}: status {status}, {} header(s), {} byte(s)",
        headers.len(),
        bytes.len()
    );

    Ok(PageSnapshot {
        https,
        headers,
        set_cookies,
        body,
    })
}
