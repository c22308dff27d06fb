//! Full-pipeline tests: analyze a domain against mock upstreams, check the
//! computed scorecard, and read the persisted report back by guid.

mod helpers;

use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_scorecard::initialization::init_crypto_provider;
use domain_scorecard::{analyze_domain, lookup_report, AnalysisError, Config, ErrorKind};

const WELL_BEHAVED_PAGE: &str = r#"<html><head>
    <title>Acme Widgets - Handmade Widgets</title>
    <meta name="description" content="Handmade widgets, shipped worldwide.">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    </head><body>
    <h1>Acme Widgets</h1>
    <h2>Our range</h2>
    <a href="/widgets">Browse the widget catalogue</a>
    </body></html>"#;

fn test_config(server: &MockServer, db_file: &NamedTempFile) -> Config {
    Config {
        db_path: db_file.path().to_path_buf(),
        ..helpers::perf_config(server)
    }
}

async fn mount_well_behaved_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("strict-transport-security", "max-age=31536000")
                .insert_header("server", "cloudflare")
                .insert_header("access-control-allow-origin", "https://app.example.com")
                .append_header("set-cookie", "sid=abc; Secure; HttpOnly; SameSite=Lax")
                .set_body_string(WELL_BEHAVED_PAGE),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_analysis_produces_a_persisted_scorecard() {
    init_crypto_provider();
    let server = MockServer::start().await;
    helpers::mount_perf_backend(&server, "T-e2e", 92.0).await;
    mount_well_behaved_page(&server).await;

    let db_file = NamedTempFile::new().unwrap();
    let config = test_config(&server, &db_file);
    let domain = helpers::host_of(&server);

    let report = analyze_domain(&config, &domain).await.unwrap();

    assert_eq!(report.domain, domain);
    assert_eq!(report.language, "en");
    assert_eq!(report.scores.performance, 92);
    assert_eq!(report.scores.seo, 100);
    assert_eq!(report.scores.mobile, 100);
    // Plain-HTTP mock: no HTTPS (25) and no valid certificate (25). HSTS
    // (20) + firewall (15) + restricted CORS (10) + cookie flags (5) remain.
    assert_eq!(report.scores.security, 50);
    // round((92 + 100 + 100 + 50) / 4) = round(85.5)
    assert_eq!(report.scores.overall, 86);

    let perf = report.performance_data.success().expect("performance data");
    assert_eq!(perf.page_size, Some(1.5));

    // The report is retrievable by guid, byte-for-byte identical.
    let looked_up = lookup_report(&config, &report.guid).await.unwrap();
    assert_eq!(looked_up, report);
}

#[tokio::test]
async fn test_unreachable_performance_backend_degrades_the_report() {
    init_crypto_provider();
    let server = MockServer::start().await;
    mount_well_behaved_page(&server).await;

    let db_file = NamedTempFile::new().unwrap();
    let config = Config {
        db_path: db_file.path().to_path_buf(),
        perf_run_url: "http://127.0.0.1:1/runtest.php".to_string(),
        perf_result_url: "http://127.0.0.1:1/jsonResult.php".to_string(),
        ..Default::default()
    };

    let report = analyze_domain(&config, &helpers::host_of(&server))
        .await
        .unwrap();

    // The analysis still completes and persists, with performance marked
    // failed and scored zero.
    assert_eq!(report.scores.performance, 0);
    let failure = report.performance_data.failure().expect("failure marker");
    assert_eq!(failure.error_kind, ErrorKind::UpstreamUnreachable);
    assert_eq!(report.scores.seo, 100);
    assert_eq!(
        report.scores.overall,
        ((100u32 + 100 + 50) as f64 / 4.0).round() as u8
    );
}

/// The canonical degraded-analysis scenario: performance 92, perfect SEO,
/// mobile timed out, strong security without a firewall. Mobile scores 0 but
/// keeps its failure marker through persistence.
#[tokio::test]
async fn test_degraded_scorecard_scores_and_persists() {
    use domain_scorecard::models::{
        CategoryResult, CheckFailure, CookieSecurity, CorsPolicy, MobileData, NewReport,
        PerformanceData, PolicyState, SecurityData, SecurityHeaders, SeoData, SslStatus,
    };
    use domain_scorecard::{compute_scores, get_report_by_guid, insert_report};

    let performance = CategoryResult::Success(PerformanceData {
        performance_score: 92,
        first_contentful_paint: Some(812.0),
        time_to_interactive: Some(2345.0),
        page_size: Some(1.5),
        page_requests: Some(37),
        screenshot: None,
    });
    let seo = CategoryResult::Success(SeoData {
        indexable: true,
        has_meta_description: true,
        uses_clean_content: true,
        has_descriptive_links: true,
        title_length: 31,
        h1_count: 1,
        h2_count: 2,
        meta_description: Some("Handmade widgets.".to_string()),
    });
    let mobile: CategoryResult<MobileData> = CategoryResult::Failure(CheckFailure {
        error_kind: ErrorKind::UpstreamTimeout,
        error: "timed out after 8s".to_string(),
    });
    let security = CategoryResult::Success(SecurityData {
        ssl_status: SslStatus::Valid,
        https: true,
        security_headers: SecurityHeaders::Enabled,
        firewall_detected: false,
        firewall_name: None,
        cors_policy: CorsPolicy::Restricted,
        xss_protection: PolicyState::Configured,
        content_security_policy: PolicyState::Configured,
        cookie_security: CookieSecurity {
            secure: true,
            http_only: true,
            same_site: true,
        },
    });

    let scores = compute_scores(&performance, &seo, &mobile, &security);
    assert_eq!(scores.performance, 92);
    assert_eq!(scores.seo, 100);
    assert_eq!(scores.mobile, 0);
    assert_eq!(scores.security, 85);
    assert_eq!(scores.overall, 69);

    let pool = helpers::create_test_pool().await;
    let guid = insert_report(
        &pool,
        &NewReport {
            domain: "example.com".to_string(),
            language: "en".to_string(),
            scores,
            performance_data: performance,
            seo_data: seo,
            mobile_data: mobile,
            security_data: security,
        },
    )
    .await
    .unwrap();

    let report = get_report_by_guid(&pool, &guid).await.unwrap();
    assert_eq!(report.scores, scores);
    // The failed category keeps its marker, not a zeroed success record.
    let failure = report.mobile_data.failure().expect("failure marker");
    assert_eq!(failure.error_kind, ErrorKind::UpstreamTimeout);
}

#[tokio::test]
async fn test_invalid_domain_is_rejected_before_any_work() {
    let db_file = NamedTempFile::new().unwrap();
    let config = Config {
        db_path: db_file.path().to_path_buf(),
        ..Default::default()
    };

    let err = analyze_domain(&config, "   ").await.unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidDomain(_)));
}

#[tokio::test]
async fn test_analysis_normalizes_the_requested_domain() {
    init_crypto_provider();
    let server = MockServer::start().await;
    helpers::mount_perf_backend(&server, "T-norm", 50.0).await;
    mount_well_behaved_page(&server).await;

    let db_file = NamedTempFile::new().unwrap();
    let config = test_config(&server, &db_file);

    // Scheme and path are stripped before analysis and persistence.
    let host = helpers::host_of(&server);
    let report = analyze_domain(&config, &format!("http://{host}/some/page?q=1"))
        .await
        .unwrap();
    assert_eq!(report.domain, host);
}
