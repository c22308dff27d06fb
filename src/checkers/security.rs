//! Security checker.
//!
//! Combines a page fetch (headers, cookies, scheme) with an independent TLS
//! certificate probe and WAF fingerprinting. Partial degradation is the
//! rule: a failed certificate probe reports an invalid SSL status, an HTTP
//! fallback reports `https: false`. Only total unreachability of the domain
//! fails the check.

use log::debug;
use reqwest::header::{
    HeaderMap, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY,
};

use crate::error_handling::CheckError;
use crate::fetch::fetch_page;
use crate::models::{
    CookieSecurity, CorsPolicy, PolicyState, SecurityData, SecurityHeaders, SslStatus,
};
use crate::tls::probe_certificate;
use crate::waf::detect_firewall;

/// Fetches the target page and derives the domain's security signals.
pub async fn check_security(
    client: &reqwest::Client,
    domain: &str,
) -> Result<SecurityData, CheckError> {
    let snapshot = fetch_page(client, domain).await?;

    let ssl_status = match probe_certificate(domain).await {
        Ok(validity) if validity.valid => SslStatus::Valid,
        Ok(_) => SslStatus::Invalid,
        Err(e) => {
            debug!("Certificate probe failed for {domain}: {e}");
            SslStatus::Invalid
        }
    };

    let firewall_name = detect_firewall(&snapshot.headers);

    Ok(SecurityData {
        ssl_status,
        https: snapshot.https,
        security_headers: classify_hsts(&snapshot.headers),
        firewall_detected: firewall_name.is_some(),
        firewall_name: firewall_name.map(|n| n.to_string()),
        cors_policy: classify_cors(&snapshot.headers),
        xss_protection: classify_presence(&snapshot.headers, "x-xss-protection"),
        content_security_policy: classify_presence(
            &snapshot.headers,
            CONTENT_SECURITY_POLICY.as_str(),
        ),
        cookie_security: aggregate_cookies(&snapshot.set_cookies),
    })
}

fn classify_hsts(headers: &HeaderMap) -> SecurityHeaders {
    if headers.contains_key(STRICT_TRANSPORT_SECURITY) {
        SecurityHeaders::Enabled
    } else {
        SecurityHeaders::Disabled
    }
}

fn classify_cors(headers: &HeaderMap) -> CorsPolicy {
    match headers
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
    {
        Some("*") => CorsPolicy::Public,
        Some(_) => CorsPolicy::Restricted,
        None => CorsPolicy::NotConfigured,
    }
}

fn classify_presence(headers: &HeaderMap, name: &str) -> PolicyState {
    if headers.contains_key(name) {
        PolicyState::Configured
    } else {
        PolicyState::NotConfigured
    }
}

/// Folds per-cookie attributes into a site-wide aggregate.
///
/// A flag holds only when every cookie carries it; a site with no cookies
/// reports all flags false rather than vacuously true.
fn aggregate_cookies(set_cookies: &[String]) -> CookieSecurity {
    if set_cookies.is_empty() {
        return CookieSecurity {
            secure: false,
            http_only: false,
            same_site: false,
        };
    }

    let mut aggregate = CookieSecurity {
        secure: true,
        http_only: true,
        same_site: true,
    };
    for cookie in set_cookies {
        aggregate.secure &= has_attribute(cookie, "secure");
        aggregate.http_only &= has_attribute(cookie, "httponly");
        aggregate.same_site &= has_attribute(cookie, "samesite");
    }
    aggregate
}

fn has_attribute(set_cookie: &str, attribute: &str) -> bool {
    // The first segment is the cookie's own name=value pair, not an attribute.
    set_cookie.split(';').skip(1).any(|segment| {
        let name = segment.split('=').next().unwrap_or("").trim();
        name.eq_ignore_ascii_case(attribute)
    })
}
