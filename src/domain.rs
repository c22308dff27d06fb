//! Domain normalization.

use log::warn;

use crate::config::MAX_DOMAIN_LENGTH;

/// Normalizes a user-supplied domain for analysis.
///
/// Strips an `http://`/`https://` prefix, drops any path, query or fragment
/// suffix, removes a trailing slash or dot, and lowercases the rest. Returns
/// `None` for empty, whitespace-only, or overlong input. Idempotent.
///
/// # Examples
///
/// ```
/// use domain_scorecard::normalize_domain;
///
/// assert_eq!(
///     normalize_domain("https://Example.COM/pricing?x=1"),
///     Some("example.com".to_string())
/// );
/// ```
pub fn normalize_domain(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() > MAX_DOMAIN_LENGTH + "https://".len() {
        warn!(
            "Rejecting overlong domain input ({} chars): {}...",
            trimmed.len(),
            &trimmed[..40.min(trimmed.len())]
        );
        return None;
    }

    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    // Everything after the first path/query/fragment separator is dropped.
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme);

    let host = host.trim_end_matches('.').to_ascii_lowercase();

    if host.is_empty() || host.len() > MAX_DOMAIN_LENGTH {
        warn!("Rejecting domain input with no usable host: {trimmed}");
        return None;
    }

    Some(host)
}
