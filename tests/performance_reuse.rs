//! Tests for the performance test reuse policy.
//!
//! A recent enough stored test must be reused without starting a new remote
//! run; a stale or missing record must trigger a fresh run whose id is
//! recorded before results are awaited.

mod helpers;

use chrono::Utc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_scorecard::checkers::{check_performance, PerfTestClient};
use domain_scorecard::storage::{get_domain_test, upsert_domain_test};
use domain_scorecard::CheckError;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn perf_client(server: &MockServer) -> PerfTestClient {
    PerfTestClient::new(reqwest::Client::new(), &helpers::perf_config(server))
}

#[tokio::test]
async fn test_recent_test_is_reused_without_a_new_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jsonResult.php"))
        .and(query_param("test", "T-cached"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(helpers::completed_perf_result(88.0)),
        )
        .expect(1)
        .mount(&server)
        .await;
    // The submission endpoint must never be hit when a fresh record exists.
    Mock::given(method("GET"))
        .and(path("/runtest.php"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pool = helpers::create_test_pool().await;
    let ten_days_ago = Utc::now().timestamp_millis() - 10 * DAY_MS;
    upsert_domain_test(&pool, "example.com", "T-cached", ten_days_ago)
        .await
        .unwrap();

    let data = check_performance(&pool, &perf_client(&server), "example.com", 60)
        .await
        .unwrap();
    assert_eq!(data.performance_score, 88);

    // The stored record is untouched by a reused run.
    let record = get_domain_test(&pool, "example.com").await.unwrap().unwrap();
    assert_eq!(record.test_id, "T-cached");
    assert_eq!(record.last_run, ten_days_ago);
}

#[tokio::test]
async fn test_stale_record_triggers_a_new_run_and_record_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtest.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "testId": "T-new" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jsonResult.php"))
        .and(query_param("test", "T-new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(helpers::completed_perf_result(73.0)),
        )
        .mount(&server)
        .await;

    let pool = helpers::create_test_pool().await;
    let ninety_days_ago = Utc::now().timestamp_millis() - 90 * DAY_MS;
    upsert_domain_test(&pool, "example.com", "T-old", ninety_days_ago)
        .await
        .unwrap();

    let data = check_performance(&pool, &perf_client(&server), "example.com", 60)
        .await
        .unwrap();
    assert_eq!(data.performance_score, 73);

    let record = get_domain_test(&pool, "example.com").await.unwrap().unwrap();
    assert_eq!(record.test_id, "T-new");
    assert!(record.last_run > ninety_days_ago);
}

#[tokio::test]
async fn test_first_analysis_starts_and_records_a_run() {
    let server = MockServer::start().await;
    helpers::mount_perf_backend(&server, "T-first", 92.0).await;

    let pool = helpers::create_test_pool().await;
    let data = check_performance(&pool, &perf_client(&server), "example.com", 60)
        .await
        .unwrap();
    assert_eq!(data.performance_score, 92);
    assert_eq!(data.page_requests, Some(37));

    let record = get_domain_test(&pool, "example.com").await.unwrap().unwrap();
    assert_eq!(record.test_id, "T-first");
}

#[tokio::test]
async fn test_pending_result_is_polled_until_complete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtest.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "testId": "T-slow" } })),
        )
        .mount(&server)
        .await;
    // First poll sees a pending test, the next one the completed result.
    Mock::given(method("GET"))
        .and(path("/jsonResult.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusCode": 100,
            "statusText": "Test started"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jsonResult.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(helpers::completed_perf_result(61.0)),
        )
        .mount(&server)
        .await;

    let pool = helpers::create_test_pool().await;
    let data = check_performance(&pool, &perf_client(&server), "example.com", 60)
        .await
        .unwrap();
    assert_eq!(data.performance_score, 61);
}

#[tokio::test]
async fn test_backend_failure_status_fails_the_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtest.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "testId": "T-bad" } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jsonResult.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusCode": 400,
            "statusText": "Test not found"
        })))
        .mount(&server)
        .await;

    let pool = helpers::create_test_pool().await;
    let err = check_performance(&pool, &perf_client(&server), "example.com", 60)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::InvalidUpstreamData(_)));
}

#[tokio::test]
async fn test_submission_without_test_id_fails_the_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtest.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .mount(&server)
        .await;

    let pool = helpers::create_test_pool().await;
    let err = check_performance(&pool, &perf_client(&server), "example.com", 60)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::InvalidUpstreamData(_)));

    // Nothing worth reusing was recorded.
    assert!(get_domain_test(&pool, "example.com").await.unwrap().is_none());
}
