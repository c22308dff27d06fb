//! Category checkers.
//!
//! One module per scorecard category. Each checker returns
//! `Result<CategoryData, CheckError>`; the coordinator converts errors into
//! failure markers so one category can never take down its siblings.

mod mobile;
mod performance;
mod security;
mod seo;

pub use mobile::{check_mobile, parse_mobile};
pub use performance::{check_performance, parse_performance_data, PerfTestClient};
pub use security::check_security;
pub use seo::{check_seo, parse_seo};

use scraper::Selector;

/// Parses a compile-time selector string, degrading to a match-nothing
/// selector instead of panicking if it is ever invalid.
pub(crate) fn parse_selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| {
        log::error!("Failed to parse selector '{selector}': {e}");
        Selector::parse("*:not(*)").expect("fallback selector is valid")
    })
}
