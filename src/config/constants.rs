//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application: per-checker timeout budgets, poll-loop bounds, the
//! performance-test reuse window, and parsing limits.

use std::time::Duration;

// Per-checker timeout budgets. These differ because the underlying work
// differs in cost, not because of tuning: the performance check may trigger
// a real remote measurement run, the others are a single page fetch.
/// Performance checker budget (may start and poll a remote test run).
pub const PERFORMANCE_CHECK_TIMEOUT: Duration = Duration::from_secs(25);
/// SEO checker budget (one HTML fetch plus parsing).
pub const SEO_CHECK_TIMEOUT: Duration = Duration::from_secs(8);
/// Mobile checker budget (one HTML fetch plus parsing).
pub const MOBILE_CHECK_TIMEOUT: Duration = Duration::from_secs(8);
/// Security checker budget (page fetch plus an independent TLS probe).
pub const SECURITY_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

// Network operation timeouts
/// Per-request HTTP timeout in seconds for page fetches.
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 8;
/// TCP connection timeout in seconds (TLS probe).
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds (TLS probe).
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

// Remote performance test polling
/// Maximum attempts when polling a remote performance test for completion.
pub const PERF_POLL_MAX_ATTEMPTS: usize = 10;
/// Initial delay in milliseconds before the first poll retry.
pub const PERF_POLL_INITIAL_DELAY_MS: u64 = 2000;
/// Maximum delay between poll attempts in seconds.
pub const PERF_POLL_MAX_DELAY_SECS: u64 = 10;

/// Default reuse window for previously run performance tests, in days.
///
/// A test run within this window is fetched by its stored test id instead of
/// starting a new measurement, trading freshness for quota on the
/// rate-limited measurement backend. The "correct" value is a product
/// decision; it is a `Config` field, this is only the default.
pub const DEFAULT_REUSE_WINDOW_DAYS: i64 = 60;

/// Default SQLite database path.
pub const DB_PATH: &str = "./domain_scorecard.db";

/// Default User-Agent string for desktop page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// User-Agent string for the mobile checker's page fetch.
pub const MOBILE_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

// Response and body size limits
/// Maximum response body size in bytes (2MB).
/// Bodies larger than this are truncated to prevent memory exhaustion.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum accepted domain length (RFC 1035 limit).
pub const MAX_DOMAIN_LENGTH: usize = 253;

// Signal thresholds shared by checkers and documented as part of the
// scoring contract.
/// Meta descriptions longer than this are treated as unusable for SEO.
pub const MAX_META_DESCRIPTION_LENGTH: usize = 320;
/// Minimum effective tap-target size in CSS pixels.
pub const MIN_TAP_TARGET_PX: u32 = 48;
/// Minimum readable font size in CSS pixels on mobile.
pub const MIN_FONT_SIZE_PX: u32 = 12;
/// Page weight below which the mobile-speed heuristic passes (bytes).
pub const MOBILE_SPEED_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;
/// Fixed element widths above this break the content-fitting heuristic (px).
pub const MAX_FIXED_WIDTH_PX: u32 = 480;

/// Default WebPageTest-compatible endpoint for starting a measurement run.
pub const DEFAULT_PERF_RUN_URL: &str = "https://www.webpagetest.org/runtest.php";
/// Default WebPageTest-compatible endpoint for fetching a run's result.
pub const DEFAULT_PERF_RESULT_URL: &str = "https://www.webpagetest.org/jsonResult.php";
