//! Rule-based scoring engine.
//!
//! Pure functions, no I/O. Each category has a fixed checklist of weighted
//! conditions summing to at most 100. The weights below are the scoring
//! contract: changing them changes the product's semantics, so they live
//! here and nowhere else.
//!
//! A checker failure forces that category's score to 0 — failure is scored
//! as worst case, not as unknown, which keeps the overall score computable
//! without null-handling branches downstream.

use crate::models::{
    CategoryResult, CorsPolicy, MobileData, PerformanceData, ScoreSet, SecurityData,
    SecurityHeaders, SeoData, SslStatus,
};

// SEO checklist weights.
const SEO_INDEXABLE: u32 = 25;
const SEO_META_DESCRIPTION: u32 = 25;
const SEO_CLEAN_CONTENT: u32 = 25;
const SEO_DESCRIPTIVE_LINKS: u32 = 25;

// Mobile checklist weights.
const MOBILE_RESPONSIVE: u32 = 20;
const MOBILE_VIEWPORT_META: u32 = 20;
const MOBILE_TAP_TARGETS: u32 = 20;
const MOBILE_SPEED: u32 = 20;
const MOBILE_FONT_SIZES: u32 = 10;
const MOBILE_CONTENT_FITTING: u32 = 10;

// Security checklist weights.
const SECURITY_SSL_VALID: u32 = 25;
const SECURITY_HTTPS: u32 = 25;
const SECURITY_HEADERS_ENABLED: u32 = 20;
const SECURITY_FIREWALL: u32 = 15;
const SECURITY_CORS_RESTRICTED: u32 = 10;
const SECURITY_COOKIES: u32 = 5;

fn clamp_score(raw: u32) -> u8 {
    raw.min(100) as u8
}

/// Performance score: the upstream score passed through, clamped to [0,100].
pub fn score_performance(result: &CategoryResult<PerformanceData>) -> u8 {
    match result.success() {
        Some(data) => clamp_score(u32::from(data.performance_score)),
        None => 0,
    }
}

/// SEO score from the four boolean signals.
pub fn score_seo(result: &CategoryResult<SeoData>) -> u8 {
    let Some(data) = result.success() else {
        return 0;
    };
    let mut raw = 0;
    if data.indexable {
        raw += SEO_INDEXABLE;
    }
    if data.has_meta_description {
        raw += SEO_META_DESCRIPTION;
    }
    if data.uses_clean_content {
        raw += SEO_CLEAN_CONTENT;
    }
    if data.has_descriptive_links {
        raw += SEO_DESCRIPTIVE_LINKS;
    }
    clamp_score(raw)
}

/// Mobile score from the six boolean signals.
pub fn score_mobile(result: &CategoryResult<MobileData>) -> u8 {
    let Some(data) = result.success() else {
        return 0;
    };
    let mut raw = 0;
    if data.responsive {
        raw += MOBILE_RESPONSIVE;
    }
    if data.viewport_meta {
        raw += MOBILE_VIEWPORT_META;
    }
    if data.tap_targets {
        raw += MOBILE_TAP_TARGETS;
    }
    if data.mobile_speed {
        raw += MOBILE_SPEED;
    }
    if data.font_sizes {
        raw += MOBILE_FONT_SIZES;
    }
    if data.content_fitting {
        raw += MOBILE_CONTENT_FITTING;
    }
    clamp_score(raw)
}

/// Security score from the weighted security checklist.
pub fn score_security(result: &CategoryResult<SecurityData>) -> u8 {
    let Some(data) = result.success() else {
        return 0;
    };
    let mut raw = 0;
    if data.ssl_status == SslStatus::Valid {
        raw += SECURITY_SSL_VALID;
    }
    if data.https {
        raw += SECURITY_HTTPS;
    }
    if data.security_headers == SecurityHeaders::Enabled {
        raw += SECURITY_HEADERS_ENABLED;
    }
    if data.firewall_detected {
        raw += SECURITY_FIREWALL;
    }
    if data.cors_policy == CorsPolicy::Restricted {
        raw += SECURITY_CORS_RESTRICTED;
    }
    if data.cookie_security.secure && data.cookie_security.http_only {
        raw += SECURITY_COOKIES;
    }
    clamp_score(raw)
}

/// Computes all category scores and their rounded mean.
pub fn compute_scores(
    performance: &CategoryResult<PerformanceData>,
    seo: &CategoryResult<SeoData>,
    mobile: &CategoryResult<MobileData>,
    security: &CategoryResult<SecurityData>,
) -> ScoreSet {
    let performance = score_performance(performance);
    let seo = score_seo(seo);
    let mobile = score_mobile(mobile);
    let security = score_security(security);
    ScoreSet {
        performance,
        seo,
        mobile,
        security,
        overall: overall_score(performance, seo, mobile, security),
    }
}

/// Rounded mean of the four category scores.
pub fn overall_score(performance: u8, seo: u8, mobile: u8, security: u8) -> u8 {
    let sum = u32::from(performance) + u32::from(seo) + u32::from(mobile) + u32::from(security);
    ((sum as f64) / 4.0).round() as u8
}
