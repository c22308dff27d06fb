//! Concurrent checker fan-out.
//!
//! All four category checkers start together and every one runs to
//! completion or its own timeout; a failing or slow sibling never cancels
//! the others. The coordinator is where checker errors stop being errors:
//! each outcome is converted into either category data or a failure marker,
//! and analysis continues with whatever came back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use sqlx::SqlitePool;

use crate::checkers::{
    check_mobile, check_performance, check_security, check_seo, PerfTestClient,
};
use crate::config::{
    Config, MOBILE_CHECK_TIMEOUT, PERFORMANCE_CHECK_TIMEOUT, SECURITY_CHECK_TIMEOUT,
    SEO_CHECK_TIMEOUT,
};
use crate::error_handling::CheckError;
use crate::models::{CategoryResult, MobileData, PerformanceData, SecurityData, SeoData};

/// Shared resources the checkers draw on during one analysis.
pub struct AnalysisContext {
    /// Database pool, used by the performance reuse policy.
    pub pool: Arc<SqlitePool>,
    /// Desktop-UA HTTP client for the SEO and security checkers.
    pub client: reqwest::Client,
    /// Mobile-UA HTTP client for the mobile checker.
    pub mobile_client: reqwest::Client,
    /// Client for the remote performance backend.
    pub perf: PerfTestClient,
    /// Reuse window for cached performance tests, in days.
    pub reuse_window_days: i64,
}

impl AnalysisContext {
    /// Assembles a context from pre-initialized clients and configuration.
    pub fn new(
        pool: Arc<SqlitePool>,
        client: reqwest::Client,
        mobile_client: reqwest::Client,
        config: &Config,
    ) -> Self {
        let perf = PerfTestClient::new(client.clone(), config);
        Self {
            pool,
            client,
            mobile_client,
            perf,
            reuse_window_days: config.reuse_window_days,
        }
    }
}

/// One result slot per category, each either data or a failure marker.
pub struct CheckOutcomes {
    /// Performance outcome.
    pub performance: CategoryResult<PerformanceData>,
    /// SEO outcome.
    pub seo: CategoryResult<SeoData>,
    /// Mobile outcome.
    pub mobile: CategoryResult<MobileData>,
    /// Security outcome.
    pub security: CategoryResult<SecurityData>,
}

/// Runs all four checkers concurrently against a normalized domain.
///
/// Returns only when every checker has settled. Infallible by design:
/// whatever goes wrong inside a checker is captured in its own slot.
pub async fn run_checks(ctx: &AnalysisContext, domain: &str) -> CheckOutcomes {
    let (performance, seo, mobile, security) = tokio::join!(
        settle(
            "performance",
            PERFORMANCE_CHECK_TIMEOUT,
            check_performance(&ctx.pool, &ctx.perf, domain, ctx.reuse_window_days),
        ),
        settle("seo", SEO_CHECK_TIMEOUT, check_seo(&ctx.client, domain)),
        settle(
            "mobile",
            MOBILE_CHECK_TIMEOUT,
            check_mobile(&ctx.mobile_client, domain),
        ),
        settle(
            "security",
            SECURITY_CHECK_TIMEOUT,
            check_security(&ctx.client, domain),
        ),
    );

    CheckOutcomes {
        performance,
        seo,
        mobile,
        security,
    }
}

/// Drives one checker to completion under its timeout budget and flattens
/// the outcome into a result slot.
async fn settle<T>(
    category: &str,
    budget: Duration,
    check: impl Future<Output = Result<T, CheckError>>,
) -> CategoryResult<T> {
    let outcome = match tokio::time::timeout(budget, check).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{category} check exceeded its {budget:?} budget");
            Err(CheckError::UpstreamTimeout(budget))
        }
    };

    if let Err(e) = &outcome {
        warn!("{category} check failed: {e}");
    } else {
        debug!("{category} check completed");
    }
    CategoryResult::from_check(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;

    #[tokio::test]
    async fn test_settle_passes_through_success() {
        let result = settle("test", Duration::from_secs(1), async { Ok(7u8) }).await;
        assert_eq!(result.success(), Some(&7));
    }

    #[tokio::test]
    async fn test_settle_converts_error_to_failure_marker() {
        let result: CategoryResult<u8> = settle("test", Duration::from_secs(1), async {
            Err(CheckError::UpstreamUnreachable("refused".into()))
        })
        .await;
        assert_eq!(
            result.failure().map(|f| f.error_kind),
            Some(ErrorKind::UpstreamUnreachable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_enforces_the_timeout_budget() {
        let result: CategoryResult<u8> = settle("test", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        })
        .await;
        assert_eq!(
            result.failure().map(|f| f.error_kind),
            Some(ErrorKind::UpstreamTimeout)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sibling_does_not_cancel_fast_one() {
        let (slow, fast) = tokio::join!(
            settle("slow", Duration::from_millis(50), async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(1u8)
            }),
            settle("fast", Duration::from_secs(5), async { Ok(2u8) }),
        );
        assert!(!slow.is_success());
        assert_eq!(fast.success(), Some(&2));
    }
}
