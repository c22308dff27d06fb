//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_scorecard` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use domain_scorecard::initialization::{init_crypto_provider, init_logger_with};
use domain_scorecard::{analyze_domain, lookup_report, CategoryResult, Config, Report};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting PERF_API_KEY in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let result = if let Some(guid) = &config.lookup {
        lookup_report(&config, guid).await
    } else {
        // clap guarantees a domain is present when --lookup is absent
        let domain = config.domain.clone().unwrap_or_default();
        analyze_domain(&config, &domain).await
    };

    match result {
        Ok(report) => {
            print_scorecard(&report);
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_scorecard error: {e:#}");
            process::exit(1);
        }
    }
}

fn print_scorecard(report: &Report) {
    println!("Domain:   {}", report.domain);
    println!("Report:   {}", report.guid);
    println!("Overall:  {}", report.scores.overall);
    println!(
        "  performance {:>3}  {}",
        report.scores.performance,
        category_note(&report.performance_data)
    );
    println!(
        "  seo         {:>3}  {}",
        report.scores.seo,
        category_note(&report.seo_data)
    );
    println!(
        "  mobile      {:>3}  {}",
        report.scores.mobile,
        category_note(&report.mobile_data)
    );
    println!(
        "  security    {:>3}  {}",
        report.scores.security,
        category_note(&report.security_data)
    );
}

fn category_note<T>(result: &CategoryResult<T>) -> String {
    match result.failure() {
        Some(f) => format!("({})", f.error),
        None => String::new(),
    }
}
