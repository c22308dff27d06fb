//! SEO checker.
//!
//! Derives indexability and content-quality signals from the target page's
//! markup. Parsing happens in a synchronous helper so the non-`Send` parsed
//! document never lives across an await point.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::checkers::parse_selector;
use crate::config::MAX_META_DESCRIPTION_LENGTH;
use crate::error_handling::CheckError;
use crate::fetch::fetch_page;
use crate::models::SeoData;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("title"));
static ROBOTS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("meta[name='robots']"));
static META_DESCRIPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("meta[name='description']"));
static LEGACY_CONTENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("object, embed, applet, frameset, frame"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("a"));
static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("h1"));
static H2_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("h2"));

/// Anchor texts too generic to tell a crawler (or a user) where a link goes.
const GENERIC_ANCHOR_TEXTS: &[&str] = &["click here", "read more", "here", "link", "more"];

/// Fetches the target page and derives its SEO signals.
pub async fn check_seo(client: &reqwest::Client, domain: &str) -> Result<SeoData, CheckError> {
    let snapshot = fetch_page(client, domain).await?;
    Ok(parse_seo(&snapshot.body))
}

/// Derives SEO signals from raw page markup.
pub fn parse_seo(html: &str) -> SeoData {
    let document = Html::parse_document(html);

    let indexable = document
        .select(&ROBOTS_SELECTOR)
        .filter_map(|el| el.value().attr("content"))
        .all(|content| {
            let directives = content.to_ascii_lowercase();
            !directives.contains("noindex") && !directives.contains("none")
        });

    let meta_description = document
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty());
    let has_meta_description = meta_description
        .as_ref()
        .is_some_and(|d| d.chars().count() <= MAX_META_DESCRIPTION_LENGTH);

    let uses_clean_content = document.select(&LEGACY_CONTENT_SELECTOR).next().is_none();

    let has_descriptive_links = !document.select(&ANCHOR_SELECTOR).any(|anchor| {
        let text = anchor
            .text()
            .collect::<String>()
            .trim()
            .to_ascii_lowercase();
        GENERIC_ANCHOR_TEXTS.contains(&text.as_str())
    });

    let title_length = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().chars().count())
        .unwrap_or(0);

    SeoData {
        indexable,
        has_meta_description,
        uses_clean_content,
        has_descriptive_links,
        title_length,
        h1_count: document.select(&H1_SELECTOR).count(),
        h2_count: document.select(&H2_SELECTOR).count(),
        meta_description,
    }
}
