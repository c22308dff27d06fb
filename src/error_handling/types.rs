//! Error type definitions.
//!
//! Checker-level errors (`CheckError`) are caught at the checker boundary and
//! converted into failure markers; they never cross the fan-out coordinator.
//! Storage errors are the only fatal path for an analysis.

use std::time::Duration;

use crate::config::HTTP_REQUEST_TIMEOUT_SECS;
use log::SetLoggerError;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Machine-readable classification of a checker failure.
///
/// Persisted inside per-category failure markers, so variants serialize in
/// camelCase to match the report JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIterMacro)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Network/connection failure to a third-party service or the target domain.
    UpstreamUnreachable,
    /// The checker's timeout budget was exceeded.
    UpstreamTimeout,
    /// The upstream was reachable but its response was unusable.
    InvalidUpstreamData,
}

impl ErrorKind {
    /// Returns a human-readable string representation of the error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UpstreamUnreachable => "upstream unreachable",
            ErrorKind::UpstreamTimeout => "upstream timeout",
            ErrorKind::InvalidUpstreamData => "invalid upstream data",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by a category checker.
///
/// Every variant carries a message suitable for display in the report;
/// raw transport errors are flattened into strings at the boundary.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Network or connection failure reaching an upstream service.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The checker exceeded its timeout budget.
    #[error("timed out after {0:?}")]
    UpstreamTimeout(Duration),

    /// The upstream responded but the payload was unusable.
    #[error("invalid upstream data: {0}")]
    InvalidUpstreamData(String),
}

impl CheckError {
    /// The machine-readable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::UpstreamUnreachable(_) => ErrorKind::UpstreamUnreachable,
            CheckError::UpstreamTimeout(_) => ErrorKind::UpstreamTimeout,
            CheckError::InvalidUpstreamData(_) => ErrorKind::InvalidUpstreamData,
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        // Classification follows the transport: timeouts keep their own kind
        // and carry the per-request budget, decode problems are data
        // problems, everything else is reachability.
        if e.is_timeout() {
            CheckError::UpstreamTimeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        } else if e.is_decode() {
            CheckError::InvalidUpstreamData(e.to_string())
        } else {
            CheckError::UpstreamUnreachable(e.to_string())
        }
    }
}

/// Error types for the report store and test-record storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// A stored JSON column could not be decoded.
    #[error("Stored record is corrupt: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// The post-insert read-back could not find the just-written report.
    #[error("Write verification failed for report {guid}")]
    VerificationFailed {
        /// Identifier returned by the failed insert.
        guid: String,
    },

    /// No report exists under the requested identifier.
    ///
    /// An expected, non-exceptional outcome on retrieval, distinct from a
    /// storage-layer fault.
    #[error("No report found for guid {guid}")]
    NotFound {
        /// The identifier that was looked up.
        guid: String,
    },
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Top-level error for a full analysis request.
///
/// Checker failures are not represented here: they degrade the report rather
/// than failing it. Only resource initialization and persistence can make an
/// analysis fail outright.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The requested domain could not be normalized into a bare hostname.
    #[error("Invalid domain: {0:?}")]
    InvalidDomain(String),

    /// A shared resource (client, pool, logger) could not be initialized.
    #[error("Initialization failed: {0}")]
    Initialization(#[from] InitializationError),

    /// The report could not be persisted or verified; the request is
    /// retryable.
    #[error("Report persistence failed: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::UpstreamTimeout.as_str(), "upstream timeout");
        assert_eq!(
            ErrorKind::UpstreamUnreachable.as_str(),
            "upstream unreachable"
        );
        assert_eq!(
            ErrorKind::InvalidUpstreamData.as_str(),
            "invalid upstream data"
        );
    }

    #[test]
    fn test_all_error_kinds_have_string_representation() {
        for kind in ErrorKind::iter() {
            assert!(
                !kind.as_str().is_empty(),
                "{:?} should have non-empty string",
                kind
            );
        }
    }

    #[test]
    fn test_error_kind_serializes_camel_case() {
        let json = serde_json::to_string(&ErrorKind::InvalidUpstreamData).unwrap();
        assert_eq!(json, "\"invalidUpstreamData\"");
        let back: ErrorKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorKind::InvalidUpstreamData);
    }

    #[test]
    fn test_check_error_kind_mapping() {
        assert_eq!(
            CheckError::UpstreamUnreachable("connection refused".into()).kind(),
            ErrorKind::UpstreamUnreachable
        );
        assert_eq!(
            CheckError::UpstreamTimeout(Duration::from_secs(8)).kind(),
            ErrorKind::UpstreamTimeout
        );
        assert_eq!(
            CheckError::InvalidUpstreamData("missing score".into()).kind(),
            ErrorKind::InvalidUpstreamData
        );
    }

    #[test]
    fn test_timeout_message_names_the_request_timeout() {
        let err = CheckError::UpstreamTimeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS));
        assert_eq!(err.to_string(), "timed out after 8s");
    }

    #[test]
    fn test_storage_not_found_is_distinct_from_sql_error() {
        let not_found = StorageError::NotFound {
            guid: "abc".into(),
        };
        assert!(matches!(not_found, StorageError::NotFound { .. }));

        let sql: StorageError = sqlx::Error::PoolClosed.into();
        assert!(matches!(sql, StorageError::SqlError(_)));
    }
}
