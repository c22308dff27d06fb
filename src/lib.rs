//! domain_scorecard library: domain analysis and scoring
//!
//! This library analyzes a web domain across four categories — performance,
//! SEO, mobile-friendliness, and security — and condenses the findings into
//! a 0-100 scorecard. Checkers run concurrently with individual timeout
//! budgets; a failing category is recorded as a failure marker and scores 0
//! instead of aborting the analysis. Completed reports are persisted to
//! SQLite and retrievable by guid.
//!
//! # Example
//!
//! ```no_run
//! use domain_scorecard::{analyze_domain, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let report = analyze_domain(&config, "example.com").await?;
//! println!("{}: overall {} (report {})",
//!          report.domain, report.scores.overall, report.guid);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod checkers;
pub mod config;
mod coordinator;
mod domain;
mod error_handling;
mod fetch;
pub mod initialization;
pub mod models;
mod scoring;
pub mod storage;
mod tls;
mod waf;

// Re-export public API
pub use analyze::{analyze_domain, lookup_report};
pub use config::{Config, LogFormat, LogLevel};
pub use coordinator::{run_checks, AnalysisContext, CheckOutcomes};
pub use domain::normalize_domain;
pub use error_handling::{AnalysisError, CheckError, ErrorKind, StorageError};
pub use models::{
    CategoryResult, CheckFailure, MobileData, PerformanceData, Report, ScoreSet, SecurityData,
    SeoData,
};
pub use scoring::compute_scores;
pub use storage::{get_report_by_guid, init_db_pool_with_path, insert_report, run_migrations};

// Internal analyze module (contains the main analysis logic)
mod analyze {
    use log::info;

    use crate::config::Config;
    use crate::coordinator::{run_checks, AnalysisContext};
    use crate::domain::normalize_domain;
    use crate::error_handling::AnalysisError;
    use crate::initialization::{init_client, init_mobile_client};
    use crate::models::{NewReport, Report};
    use crate::scoring::compute_scores;
    use crate::storage::{
        get_report_by_guid, init_db_pool_with_path, insert_report, run_migrations,
    };

    /// Runs a full analysis of a domain and persists the resulting report.
    ///
    /// This is the main entry point for the library. The domain is normalized
    /// first ("https://Example.COM/path" becomes "example.com"), then all
    /// four category checkers run concurrently. Checker failures degrade the
    /// report rather than failing it; only an invalid domain, resource
    /// initialization, or persistence can make this return an error.
    ///
    /// The returned report is the persisted row read back by its guid, so a
    /// successful return doubles as a write verification.
    pub async fn analyze_domain(config: &Config, domain: &str) -> Result<Report, AnalysisError> {
        let normalized = normalize_domain(domain)
            .ok_or_else(|| AnalysisError::InvalidDomain(domain.to_string()))?;
        info!("Analyzing {normalized}");

        let pool = init_db_pool_with_path(&config.db_path).await?;
        run_migrations(&pool).await?;

        let client = init_client(config)?;
        let mobile_client = init_mobile_client(config)?;
        let ctx = AnalysisContext::new(pool.clone(), client, mobile_client, config);

        let outcomes = run_checks(&ctx, &normalized).await;
        let scores = compute_scores(
            &outcomes.performance,
            &outcomes.seo,
            &outcomes.mobile,
            &outcomes.security,
        );

        let new_report = NewReport {
            domain: normalized.clone(),
            language: config.language.clone(),
            scores,
            performance_data: outcomes.performance,
            seo_data: outcomes.seo,
            mobile_data: outcomes.mobile,
            security_data: outcomes.security,
        };
        let guid = insert_report(&pool, &new_report).await?;
        let report = get_report_by_guid(&pool, &guid).await?;

        info!(
            "Analysis of {normalized} complete: overall {} (report {guid})",
            report.scores.overall
        );
        Ok(report)
    }

    /// Retrieves a previously stored report by its guid.
    pub async fn lookup_report(config: &Config, guid: &str) -> Result<Report, AnalysisError> {
        let pool = init_db_pool_with_path(&config.db_path).await?;
        run_migrations(&pool).await?;
        Ok(get_report_by_guid(&pool, guid).await?)
    }
}
