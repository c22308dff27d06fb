//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and programmatic configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_PERF_RESULT_URL, DEFAULT_PERF_RUN_URL, DEFAULT_REUSE_WINDOW_DAYS,
    DEFAULT_USER_AGENT, MOBILE_USER_AGENT,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Application configuration.
///
/// Doubles as the CLI surface (via `clap::Parser`) and the library
/// configuration. Tests construct it programmatically with
/// `Config { ..Default::default() }` and point the performance endpoints at
/// a mock server.
#[derive(Parser, Debug, Clone)]
#[command(name = "domain_scorecard", about = "Analyze a domain and produce a 0-100 scorecard")]
pub struct Config {
    /// Domain to analyze (e.g. "example.com"); scheme and path are stripped
    #[arg(required_unless_present = "lookup")]
    pub domain: Option<String>,

    /// Fetch a previously stored report by its guid instead of analyzing
    #[arg(long)]
    pub lookup: Option<String>,

    /// Report language tag stored alongside the analysis
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// HTTP User-Agent header for desktop page fetches
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// HTTP User-Agent header for the mobile checker
    #[arg(long, default_value = MOBILE_USER_AGENT)]
    pub mobile_user_agent: String,

    /// Reuse window for cached performance tests, in days
    #[arg(long, default_value_t = DEFAULT_REUSE_WINDOW_DAYS)]
    pub reuse_window_days: i64,

    /// Endpoint used to start a remote performance measurement
    #[arg(long, default_value = DEFAULT_PERF_RUN_URL)]
    pub perf_run_url: String,

    /// Endpoint used to fetch a remote performance measurement result
    #[arg(long, default_value = DEFAULT_PERF_RESULT_URL)]
    pub perf_result_url: String,

    /// API key for the performance measurement backend
    /// (falls back to the PERF_API_KEY environment variable)
    #[arg(long, env = "PERF_API_KEY")]
    pub perf_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: None,
            lookup: None,
            language: "en".to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            mobile_user_agent: MOBILE_USER_AGENT.to_string(),
            reuse_window_days: DEFAULT_REUSE_WINDOW_DAYS,
            perf_run_url: DEFAULT_PERF_RUN_URL.to_string(),
            perf_result_url: DEFAULT_PERF_RESULT_URL.to_string(),
            perf_api_key: None,
        }
    }
}
