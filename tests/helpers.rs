// Shared test helpers for database setup and mock upstream servers.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use sqlx::SqlitePool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_scorecard::{run_migrations, Config};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// The mock server's address in bare `host:port` form, usable as a domain.
#[allow(dead_code)]
pub fn host_of(server: &MockServer) -> String {
    server
        .uri()
        .trim_start_matches("http://")
        .to_string()
}

/// A config whose performance endpoints point at the mock server.
#[allow(dead_code)]
pub fn perf_config(server: &MockServer) -> Config {
    Config {
        perf_run_url: format!("{}/runtest.php", server.uri()),
        perf_result_url: format!("{}/jsonResult.php", server.uri()),
        ..Default::default()
    }
}

/// A completed performance result document with the given score.
#[allow(dead_code)]
pub fn completed_perf_result(score: f64) -> serde_json::Value {
    serde_json::json!({
        "statusCode": 200,
        "data": {
            "median": {
                "firstView": {
                    "lighthousePerformanceScore": score,
                    "firstContentfulPaint": 812.0,
                    "fullyLoaded": 2345.0,
                    "bytesIn": 1_572_864,
                    "requestsFull": 37,
                    "images": { "screenShot": "https://wpt.example/shot.png" }
                }
            }
        }
    })
}

/// Mounts a complete performance backend: test submission returning
/// `test_id` and an immediately complete result with `score`.
#[allow(dead_code)]
pub async fn mount_perf_backend(server: &MockServer, test_id: &str, score: f64) {
    Mock::given(method("GET"))
        .and(path("/runtest.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "testId": test_id } })),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jsonResult.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completed_perf_result(score)))
        .mount(server)
        .await;
}
