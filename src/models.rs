//! Data records shared across checkers, scoring, and storage.
//!
//! Field names serialize in camelCase because these records form the
//! caller-facing report JSON and the persisted column payloads.

use serde::{Deserialize, Serialize};

use crate::error_handling::{CheckError, ErrorKind};

/// Failure marker stored in place of a category's data when its checker
/// failed. Serializes as `{"errorKind": ..., "error": ...}` so callers can
/// render partial results and still tell a failed fetch apart from a page
/// that genuinely has none of the measured features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFailure {
    /// Machine-readable failure classification.
    pub error_kind: ErrorKind,
    /// Display-safe message, never a raw stack trace.
    pub error: String,
}

/// Result of one category checker: either the category's data or a tagged
/// failure. Never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryResult<T> {
    /// The checker completed and produced data.
    Success(T),
    /// The checker failed or timed out; only the marker is kept.
    Failure(CheckFailure),
}

impl<T> CategoryResult<T> {
    /// Converts a checker outcome into a result slot, flattening the error
    /// into a display-safe failure marker.
    pub fn from_check(result: Result<T, CheckError>) -> Self {
        match result {
            Ok(data) => CategoryResult::Success(data),
            Err(e) => CategoryResult::Failure(CheckFailure {
                error_kind: e.kind(),
                error: e.to_string(),
            }),
        }
    }

    /// Returns the success payload, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            CategoryResult::Success(data) => Some(data),
            CategoryResult::Failure(_) => None,
        }
    }

    /// Returns the failure marker, if any.
    pub fn failure(&self) -> Option<&CheckFailure> {
        match self {
            CategoryResult::Success(_) => None,
            CategoryResult::Failure(f) => Some(f),
        }
    }

    /// True when the checker produced data.
    pub fn is_success(&self) -> bool {
        matches!(self, CategoryResult::Success(_))
    }
}

/// Parsed payload of a remote performance measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceData {
    /// Upstream Lighthouse-style performance score, already 0-100.
    pub performance_score: u8,
    /// First contentful paint in milliseconds.
    pub first_contentful_paint: Option<f64>,
    /// Time until the page was fully loaded, in milliseconds.
    pub time_to_interactive: Option<f64>,
    /// Total page weight in MiB, rounded to two decimals.
    pub page_size: Option<f64>,
    /// Number of requests issued while loading the page.
    pub page_requests: Option<u64>,
    /// Screenshot URL, when the measurement backend produced one.
    pub screenshot: Option<String>,
}

/// SEO signals derived from the target page's markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoData {
    /// Robots meta tag does not forbid indexing.
    pub indexable: bool,
    /// A meta description exists and has a sane length.
    pub has_meta_description: bool,
    /// No legacy blocking content technologies (applets, plugins, framesets).
    pub uses_clean_content: bool,
    /// No generic "click here"-style anchor texts.
    pub has_descriptive_links: bool,
    /// Length of the page title in characters.
    pub title_length: usize,
    /// Number of `<h1>` headings.
    pub h1_count: usize,
    /// Number of `<h2>` headings.
    pub h2_count: usize,
    /// The meta description text, when present.
    pub meta_description: Option<String>,
}

/// Mobile-friendliness signals derived from the target page's markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileData {
    /// Viewport meta tag, responsive stylesheet, or media queries present.
    pub responsive: bool,
    /// A viewport meta tag is present.
    pub viewport_meta: bool,
    /// Tap targets look adequately sized.
    pub tap_targets: bool,
    /// Page weight is small enough for acceptable mobile load times.
    pub mobile_speed: bool,
    /// No declared font sizes below the mobile minimum.
    pub font_sizes: bool,
    /// No fixed widths wide enough to force horizontal scrolling.
    pub content_fitting: bool,
    /// Raw page weight in bytes, for reference.
    pub page_weight_bytes: usize,
}

/// Certificate validity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SslStatus {
    /// A certificate was presented and `valid_from <= now <= valid_to`.
    Valid,
    /// The probe failed or the certificate is outside its validity window.
    Invalid,
}

/// Whether strict transport security is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityHeaders {
    /// HSTS header present.
    Enabled,
    /// HSTS header absent.
    Disabled,
}

/// CORS exposure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorsPolicy {
    /// `Access-Control-Allow-Origin: *`
    Public,
    /// Header present with a concrete origin.
    Restricted,
    /// Header absent.
    #[serde(rename = "Not configured")]
    NotConfigured,
}

/// Presence classification for optional security headers (CSP, XSS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyState {
    /// Header present.
    Configured,
    /// Header absent.
    #[serde(rename = "Not configured")]
    NotConfigured,
}

/// Site-wide cookie flag aggregate.
///
/// A flag holds only if every observed cookie carries it; a single cookie
/// lacking a flag marks the whole site as not meeting it. Per-cookie detail
/// is deliberately not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieSecurity {
    /// All cookies carry the `Secure` attribute.
    pub secure: bool,
    /// All cookies carry the `HttpOnly` attribute.
    pub http_only: bool,
    /// All cookies carry a `SameSite` attribute.
    pub same_site: bool,
}

/// Security signals for the target domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityData {
    /// Certificate validity, from the independent TLS probe.
    pub ssl_status: SslStatus,
    /// Whether the site was reachable over HTTPS.
    pub https: bool,
    /// HSTS presence.
    pub security_headers: SecurityHeaders,
    /// Whether a WAF/CDN fingerprint matched.
    pub firewall_detected: bool,
    /// Name of the matched firewall, if any.
    pub firewall_name: Option<String>,
    /// CORS exposure classification.
    pub cors_policy: CorsPolicy,
    /// X-XSS-Protection presence.
    pub xss_protection: PolicyState,
    /// Content-Security-Policy presence.
    pub content_security_policy: PolicyState,
    /// Site-wide cookie flag aggregate.
    pub cookie_security: CookieSecurity,
}

/// The four category scores plus their mean.
///
/// Invariant: `overall == round(mean(performance, seo, mobile, security))`
/// and every field is within 0..=100. A failed category contributes 0, never
/// null; failure degrades the score rather than shrinking the denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    /// Performance category score.
    pub performance: u8,
    /// SEO category score.
    pub seo: u8,
    /// Mobile-friendliness category score.
    pub mobile: u8,
    /// Security category score.
    pub security: u8,
    /// Rounded mean of the four category scores.
    pub overall: u8,
}

/// A previously executed remote performance test that may be reused.
///
/// At most one live record exists per domain (upsert semantics); the core
/// never deletes these, retention is an external concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainTestRecord {
    /// Normalized domain the test was run for.
    pub domain: String,
    /// Remote measurement identifier.
    pub test_id: String,
    /// Epoch milliseconds of the last run.
    pub last_run: i64,
}

/// A persisted analysis report, retrieved by guid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Store-assigned opaque unique identifier.
    pub guid: String,
    /// Normalized domain the analysis ran against.
    pub domain: String,
    /// Report language tag.
    pub language: String,
    /// Computed category and overall scores.
    pub scores: ScoreSet,
    /// Performance data or failure marker.
    pub performance_data: CategoryResult<PerformanceData>,
    /// SEO data or failure marker.
    pub seo_data: CategoryResult<SeoData>,
    /// Mobile data or failure marker.
    pub mobile_data: CategoryResult<MobileData>,
    /// Security data or failure marker.
    pub security_data: CategoryResult<SecurityData>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// A completed analysis awaiting persistence. The store assigns the guid and
/// creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    /// Normalized domain the analysis ran against.
    pub domain: String,
    /// Report language tag.
    pub language: String,
    /// Computed category and overall scores.
    pub scores: ScoreSet,
    /// Performance data or failure marker.
    pub performance_data: CategoryResult<PerformanceData>,
    /// SEO data or failure marker.
    pub seo_data: CategoryResult<SeoData>,
    /// Mobile data or failure marker.
    pub mobile_data: CategoryResult<MobileData>,
    /// Security data or failure marker.
    pub security_data: CategoryResult<SecurityData>,
}
