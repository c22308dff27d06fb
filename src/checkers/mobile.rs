//! Mobile-friendliness checker.
//!
//! Fetches the target page with a mobile user agent and applies markup
//! heuristics: viewport configuration, inline tap-target and font sizing,
//! fixed-width layout, and page weight. The heuristics only see declared
//! inline/embedded styles; external stylesheets are out of reach without a
//! rendering engine, so absence of evidence counts in the page's favor.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::checkers::parse_selector;
use crate::config::{
    MAX_FIXED_WIDTH_PX, MIN_FONT_SIZE_PX, MIN_TAP_TARGET_PX, MOBILE_SPEED_MAX_PAGE_BYTES,
};
use crate::error_handling::CheckError;
use crate::fetch::fetch_page;
use crate::models::MobileData;

static VIEWPORT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("meta[name='viewport']"));
static STYLESHEET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("link[rel='stylesheet'][media]"));
static STYLE_BLOCK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("style"));
static STYLED_ELEMENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("[style]"));
static TAP_TARGET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("a[style], button[style], input[style]"));

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid pattern"));
static WIDTH_PX: LazyLock<Regex> = LazyLock::new(|| px_pattern("width"));
static HEIGHT_PX: LazyLock<Regex> = LazyLock::new(|| px_pattern("height"));
static FONT_SIZE_PX: LazyLock<Regex> = LazyLock::new(|| px_pattern("font-size"));
static OVERFLOW_X_SUPPRESSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)overflow-x\s*:\s*(?:hidden|clip)").expect("valid pattern")
});

/// `{property}: <n>px`, anchored so that longer property names (`max-width`
/// when asked for `width`) don't match.
fn px_pattern(property: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)(?:^|[^a-z0-9-]){property}\s*:\s*([0-9]+(?:\.[0-9]+)?)px"
    ))
    .expect("valid pattern")
}

/// Fetches the target page with the mobile user agent and derives its
/// mobile-friendliness signals.
pub async fn check_mobile(
    mobile_client: &reqwest::Client,
    domain: &str,
) -> Result<MobileData, CheckError> {
    let snapshot = fetch_page(mobile_client, domain).await?;
    Ok(parse_mobile(&snapshot.body))
}

/// Derives mobile-friendliness signals from raw page markup.
pub fn parse_mobile(html: &str) -> MobileData {
    let document = Html::parse_document(html);

    let viewport_meta = document.select(&VIEWPORT_SELECTOR).next().is_some();

    let has_screen_stylesheet = document
        .select(&STYLESHEET_SELECTOR)
        .filter_map(|el| el.value().attr("media"))
        .any(|media| media.to_ascii_lowercase().contains("screen"));
    let style_blocks: Vec<String> = document
        .select(&STYLE_BLOCK_SELECTOR)
        .map(|el| el.text().collect::<String>())
        .collect();
    let has_media_queries = style_blocks.iter().any(|css| css.contains("@media"));
    let responsive = viewport_meta || has_screen_stylesheet || has_media_queries;

    let tap_targets = !document.select(&TAP_TARGET_SELECTOR).any(|el| {
        let style = el.value().attr("style").unwrap_or("");
        declared_px(&WIDTH_PX, style)
            .into_iter()
            .chain(declared_px(&HEIGHT_PX, style))
            .any(|px| px < MIN_TAP_TARGET_PX as f64)
    });

    // Inline styles and embedded style blocks are both in scope for the
    // font-size and fixed-width heuristics.
    let inline_styles: Vec<String> = document
        .select(&STYLED_ELEMENT_SELECTOR)
        .filter_map(|el| el.value().attr("style"))
        .map(|s| s.to_string())
        .collect();
    let all_css = || inline_styles.iter().chain(style_blocks.iter());

    let font_sizes = !all_css().any(|css| {
        declared_px(&FONT_SIZE_PX, css)
            .into_iter()
            .any(|px| px < MIN_FONT_SIZE_PX as f64)
    });

    // Fixed widths wider than a phone viewport break fitting, and so does
    // hiding horizontal overflow to paper over one.
    let content_fitting = !all_css().any(|css| {
        declared_px(&WIDTH_PX, css)
            .into_iter()
            .any(|px| px > MAX_FIXED_WIDTH_PX as f64)
            || hides_horizontal_overflow(css)
    });

    let page_weight_bytes = html.len();
    let mobile_speed = page_weight_bytes < MOBILE_SPEED_MAX_PAGE_BYTES;

    MobileData {
        responsive,
        viewport_meta,
        tap_targets,
        mobile_speed,
        font_sizes,
        content_fitting,
        page_weight_bytes,
    }
}

/// Extracts every pixel value the pattern captures, ignoring declarations
/// inside CSS comments.
fn declared_px(pattern: &Regex, css: &str) -> Vec<f64> {
    pattern
        .captures_iter(&strip_comments(css))
        .filter_map(|captures| captures[1].parse::<f64>().ok())
        .collect()
}

/// True when the CSS declares `overflow-x: hidden` (or `clip`), the usual
/// way of masking content that doesn't fit the viewport.
fn hides_horizontal_overflow(css: &str) -> bool {
    OVERFLOW_X_SUPPRESSED.is_match(&strip_comments(css))
}

fn strip_comments(css: &str) -> Cow<'_, str> {
    CSS_COMMENT.replace_all(css, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_px_extracts_values() {
        assert_eq!(declared_px(&WIDTH_PX, "width: 600px; height:40px"), vec![600.0]);
        assert_eq!(declared_px(&HEIGHT_PX, "width: 600px; height:40px"), vec![40.0]);
    }

    #[test]
    fn test_declared_px_skips_longer_property_names() {
        assert!(declared_px(&WIDTH_PX, "max-width: 900px").is_empty());
        assert!(declared_px(&WIDTH_PX, "min-width:900px").is_empty());
        assert!(declared_px(&WIDTH_PX, "border-width: 900px").is_empty());
    }

    #[test]
    fn test_declared_px_ignores_non_px_units() {
        assert!(declared_px(&WIDTH_PX, "width: 100%").is_empty());
        assert!(declared_px(&FONT_SIZE_PX, "font-size: 1.2em").is_empty());
        assert_eq!(declared_px(&FONT_SIZE_PX, "font-size: 10.5px"), vec![10.5]);
    }

    #[test]
    fn test_declared_px_skips_commented_out_declarations() {
        assert!(declared_px(&WIDTH_PX, "/* width: 9999px */ margin: 0").is_empty());
        assert_eq!(
            declared_px(&WIDTH_PX, "/* width: 9999px */ width: 320px"),
            vec![320.0]
        );
    }

    #[test]
    fn test_viewport_meta_makes_page_responsive() {
        let html = r#"<head><meta name="viewport" content="width=device-width"></head>"#;
        let data = parse_mobile(html);
        assert!(data.viewport_meta);
        assert!(data.responsive);
    }

    #[test]
    fn test_media_query_alone_counts_as_responsive() {
        let html = "<head><style>@media (max-width: 600px) { body { margin: 0 } }</style></head>";
        let data = parse_mobile(html);
        assert!(!data.viewport_meta);
        assert!(data.responsive);
    }

    #[test]
    fn test_bare_page_is_not_responsive() {
        let data = parse_mobile("<html><body><p>hi</p></body></html>");
        assert!(!data.responsive);
        // No declared styles means no evidence against the sizing heuristics.
        assert!(data.tap_targets);
        assert!(data.font_sizes);
        assert!(data.content_fitting);
    }

    #[test]
    fn test_small_tap_target_detected() {
        let html = r#"<body><a href="/x" style="width: 20px; height: 20px">x</a></body>"#;
        assert!(!parse_mobile(html).tap_targets);
    }

    #[test]
    fn test_small_font_in_style_block_detected() {
        let html = "<head><style>p { font-size: 9px }</style></head>";
        assert!(!parse_mobile(html).font_sizes);
    }

    #[test]
    fn test_wide_fixed_layout_breaks_content_fitting() {
        let html = r#"<body><div style="width: 1024px">wide</div></body>"#;
        assert!(!parse_mobile(html).content_fitting);
    }

    #[test]
    fn test_narrow_fixed_widths_are_fine() {
        let html = r#"<body><div style="width: 320px">narrow</div></body>"#;
        assert!(parse_mobile(html).content_fitting);
    }

    #[test]
    fn test_commented_out_styles_do_not_flip_heuristics() {
        let html =
            "<head><style>/* width: 9999px */ body { margin: 0 }</style></head>";
        assert!(parse_mobile(html).content_fitting);

        let html =
            "<head><style>/* font-size: 6px; overflow-x: hidden */ p { font-size: 14px }</style></head>";
        let data = parse_mobile(html);
        assert!(data.font_sizes);
        assert!(data.content_fitting);
    }

    #[test]
    fn test_hidden_horizontal_overflow_breaks_content_fitting() {
        let html = "<head><style>body { overflow-x: hidden }</style></head>";
        assert!(!parse_mobile(html).content_fitting);
        assert!(parse_mobile("<head><style>body { overflow-y: hidden }</style></head>").content_fitting);
    }

    #[test]
    fn test_page_weight_recorded() {
        let html = "<html><body>small</body></html>";
        let data = parse_mobile(html);
        assert_eq!(data.page_weight_bytes, html.len());
        assert!(data.mobile_speed);
    }
}
