//! Performance checker.
//!
//! Performance is measured by a remote WebPageTest-style backend, which makes
//! it the slowest and most expensive category. A per-domain reuse policy
//! avoids re-running the remote test when a recent enough result exists: the
//! stored test record is consulted first, and a fresh run is only started
//! when the record is missing or older than the reuse window. The record is
//! written before the result poll starts, so a crash mid-poll still leaves a
//! reusable test id behind.

use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{
    Config, PERFORMANCE_CHECK_TIMEOUT, PERF_POLL_INITIAL_DELAY_MS, PERF_POLL_MAX_ATTEMPTS,
    PERF_POLL_MAX_DELAY_SECS,
};
use crate::error_handling::CheckError;
use crate::models::PerformanceData;
use crate::storage::{get_domain_test, upsert_domain_test};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Client for the remote performance measurement backend.
///
/// Endpoints are taken from the configuration so tests can point them at a
/// mock server.
#[derive(Debug, Clone)]
pub struct PerfTestClient {
    client: reqwest::Client,
    run_url: String,
    result_url: String,
    api_key: Option<String>,
}

impl PerfTestClient {
    /// Builds a client from the shared HTTP client and the configured
    /// endpoints.
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            run_url: config.perf_run_url.clone(),
            result_url: config.perf_result_url.clone(),
            api_key: config.perf_api_key.clone(),
        }
    }

    /// Starts a remote measurement for the domain and returns its test id.
    pub async fn start_test(&self, domain: &str) -> Result<String, CheckError> {
        let mut request = self
            .client
            .get(&self.run_url)
            .query(&[("url", format!("https://{domain}")), ("f", "json".to_string())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("k", key.as_str())]);
        }

        let body: Value = request.send().await?.json().await?;
        let test_id = body["data"]["testId"]
            .as_str()
            .ok_or_else(|| {
                CheckError::InvalidUpstreamData("test submission response has no testId".into())
            })?
            .to_string();

        info!("Started performance test {test_id} for {domain}");
        Ok(test_id)
    }

    /// Fetches the raw result document for a test id.
    ///
    /// The backend answers 200 at the HTTP layer even while the test is
    /// pending; the body-level `statusCode` carries the real state.
    pub async fn fetch_result(&self, test_id: &str) -> Result<Value, CheckError> {
        let body: Value = self
            .client
            .get(&self.result_url)
            .query(&[("test", test_id)])
            .send()
            .await?
            .json()
            .await?;
        Ok(body)
    }

    /// Polls until the test completes, backing off exponentially between
    /// attempts.
    ///
    /// A body-level `statusCode >= 400` is a terminal backend failure and is
    /// not retried. Exhausting the attempt budget while the test is still
    /// pending counts as a timeout.
    pub async fn await_completion(&self, test_id: &str) -> Result<Value, CheckError> {
        let mut delays = poll_strategy();
        loop {
            let body = self.fetch_result(test_id).await?;
            let status = body["statusCode"].as_i64().unwrap_or(0);

            if status >= 400 {
                let text = body["statusText"].as_str().unwrap_or("unknown backend error");
                return Err(CheckError::InvalidUpstreamData(format!(
                    "performance test {test_id} failed upstream: {text} ({status})"
                )));
            }
            if body["data"]["median"]["firstView"].is_object() {
                debug!("Performance test {test_id} complete");
                return Ok(body);
            }

            match delays.next() {
                Some(delay) => {
                    debug!("Performance test {test_id} still pending, waiting {delay:?}");
                    tokio::time::sleep(delay).await;
                }
                None => return Err(CheckError::UpstreamTimeout(PERFORMANCE_CHECK_TIMEOUT)),
            }
        }
    }
}

fn poll_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(PERF_POLL_INITIAL_DELAY_MS)
        .max_delay(Duration::from_secs(PERF_POLL_MAX_DELAY_SECS))
        .take(PERF_POLL_MAX_ATTEMPTS)
}

/// True when a stored test record is recent enough to reuse.
fn is_fresh(last_run: i64, now: i64, window_days: i64) -> bool {
    now - last_run < window_days * MILLIS_PER_DAY
}

/// Runs the performance check for a domain, reusing a recent remote test
/// when one exists.
///
/// The test-record table is a cache, not the source of truth: a lookup or
/// upsert failure degrades to a fresh run instead of failing the check.
pub async fn check_performance(
    pool: &sqlx::SqlitePool,
    perf: &PerfTestClient,
    domain: &str,
    reuse_window_days: i64,
) -> Result<PerformanceData, CheckError> {
    let now = Utc::now().timestamp_millis();

    let existing = match get_domain_test(pool, domain).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Test-record lookup failed for {domain}, starting a fresh run: {e}");
            None
        }
    };

    let test_id = match existing {
        Some(record) if is_fresh(record.last_run, now, reuse_window_days) => {
            info!(
                "Reusing performance test {} for {domain} (ran {} day(s) ago)",
                record.test_id,
                (now - record.last_run) / MILLIS_PER_DAY
            );
            record.test_id
        }
        _ => {
            let test_id = perf.start_test(domain).await?;
            // Recorded before polling so an interrupted poll still leaves a
            // reusable test id.
            if let Err(e) = upsert_domain_test(pool, domain, &test_id, now).await {
                warn!("Failed to record performance test {test_id} for {domain}: {e}");
            }
            test_id
        }
    };

    let body = perf.await_completion(&test_id).await?;
    parse_performance_data(&body)
}

/// Extracts the report-facing metrics from a completed result document.
///
/// The score is mandatory; the remaining metrics are best-effort and absent
/// fields stay `None` rather than failing the check.
pub fn parse_performance_data(body: &Value) -> Result<PerformanceData, CheckError> {
    let first_view = &body["data"]["median"]["firstView"];

    let score = first_view["lighthousePerformanceScore"]
        .as_f64()
        .ok_or_else(|| {
            CheckError::InvalidUpstreamData(
                "completed test result has no performance score".into(),
            )
        })?;
    let performance_score = score.round().clamp(0.0, 100.0) as u8;

    let page_size = first_view["bytesIn"]
        .as_f64()
        .map(|bytes| (bytes / (1024.0 * 1024.0) * 100.0).round() / 100.0);

    Ok(PerformanceData {
        performance_score,
        first_contentful_paint: first_view["firstContentfulPaint"].as_f64(),
        time_to_interactive: first_view["fullyLoaded"].as_f64(),
        page_size,
        page_requests: first_view["requestsFull"].as_u64(),
        screenshot: first_view["images"]["screenShot"]
            .as_str()
            .map(|s| s.to_string()),
    })
}
