//! Signature-based WAF/CDN fingerprint detection.
//!
//! Detection is table-driven, not heuristic-chained: a static signature table
//! is consulted in order and the first signature with any match wins. The
//! detector is a pure function of the response headers, with no network I/O.

use reqwest::header::HeaderMap;

/// A known WAF/CDN fingerprint.
///
/// Part of the read-only signature table built at process start and never
/// mutated, so it is safely shared across concurrent checker invocations
/// without locking.
#[derive(Debug)]
pub struct WafSignature {
    /// Product name reported when this signature matches.
    pub name: &'static str,
    /// Substrings matched against lowercased response header *names*.
    pub headers: &'static [&'static str],
    /// Substrings matched against the lowercased `Server` header value.
    pub server: &'static [&'static str],
    /// Substrings matched against the lowercased `Via` header value.
    pub via: &'static [&'static str],
}

/// Known WAF/CDN signatures, in priority order.
///
/// Signatures are mutually near-exclusive in practice, so first match wins.
pub static SIGNATURES: &[WafSignature] = &[
    WafSignature {
        name: "Cloudflare",
        headers: &["cf-ray", "cf-cache-status", "cf-connecting-ip"],
        server: &["cloudflare"],
        via: &[],
    },
    WafSignature {
        name: "Akamai",
        headers: &["x-akamai", "akamai-"],
        server: &["akamaighost"],
        via: &["akamai"],
    },
    WafSignature {
        name: "Amazon CloudFront",
        headers: &["x-amz-cf-id", "x-amz-cf-pop"],
        server: &["cloudfront"],
        via: &["cloudfront"],
    },
    WafSignature {
        name: "Imperva Incapsula",
        headers: &["x-iinfo", "incap-"],
        server: &["incapsula"],
        via: &[],
    },
    WafSignature {
        name: "Sucuri",
        headers: &["x-sucuri-id", "x-sucuri-cache"],
        server: &["sucuri"],
        via: &[],
    },
    WafSignature {
        name: "F5 BIG-IP",
        headers: &["x-wa-info"],
        server: &["big-ip", "bigip"],
        via: &[],
    },
    WafSignature {
        name: "Fastly",
        headers: &["x-fastly-request-id", "fastly-"],
        server: &["fastly"],
        via: &["fastly"],
    },
    WafSignature {
        name: "Azure Front Door",
        headers: &["x-azure-ref", "x-fd-"],
        server: &[],
        via: &["azure"],
    },
    WafSignature {
        name: "Barracuda",
        headers: &["x-barracuda"],
        server: &["barracuda"],
        via: &[],
    },
];

/// Detects a WAF/CDN from response headers.
///
/// Header names are normalized to lower case before matching. A signature
/// matches when any header name contains one of its header substrings, the
/// `Server` value contains one of its server substrings, or the `Via` value
/// contains one of its via substrings. Returns the matched product name, or
/// `None` when nothing in the table matches.
pub fn detect_firewall(headers: &HeaderMap) -> Option<&'static str> {
    let header_names: Vec<String> = headers
        .keys()
        .map(|name| name.as_str().to_ascii_lowercase())
        .collect();
    let server = header_value_lower(headers, "server");
    let via = header_value_lower(headers, "via");

    for signature in SIGNATURES {
        let name_hit = signature
            .headers
            .iter()
            .any(|needle| header_names.iter().any(|name| name.contains(needle)));
        let server_hit = signature
            .server
            .iter()
            .any(|needle| server.as_deref().is_some_and(|v| v.contains(needle)));
        let via_hit = signature
            .via
            .iter()
            .any(|needle| via.as_deref().is_some_and(|v| v.contains(needle)));

        if name_hit || server_hit || via_hit {
            return Some(signature.name);
        }
    }

    None
}

fn header_value_lower(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
}
