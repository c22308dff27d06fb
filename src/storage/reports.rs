//! Report persistence.
//!
//! The store owns identifier generation: callers never supply a guid. An
//! insert is only reported successful after the row has been read back by
//! its new guid, turning "insert succeeded" into a read-after-write
//! guarantee rather than eventual consistency. Reports are immutable; a
//! repeated analysis of the same domain inserts a new row.

use chrono::Utc;
use log::{debug, error};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error_handling::StorageError;
use crate::models::{NewReport, Report};

/// Persists a completed analysis and returns its store-assigned guid.
///
/// Category payloads (including failure markers) are serialized as JSON
/// columns. The insert is verified with a read-back before returning; a
/// verification miss is a `StorageError::VerificationFailed`, not success.
pub async fn insert_report(pool: &SqlitePool, report: &NewReport) -> Result<String, StorageError> {
    let guid = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp_millis();

    sqlx::query(
        "INSERT INTO reports (
            guid, domain, language, scores,
            performance_data, seo_data, mobile_data, security_data, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&guid)
    .bind(&report.domain)
    .bind(&report.language)
    .bind(serde_json::to_string(&report.scores)?)
    .bind(serde_json::to_string(&report.performance_data)?)
    .bind(serde_json::to_string(&report.seo_data)?)
    .bind(serde_json::to_string(&report.mobile_data)?)
    .bind(serde_json::to_string(&report.security_data)?)
    .bind(created_at)
    .execute(pool)
    .await?;

    // Read-back verification: the row must be fetchable by the new guid
    // before the insert counts as successful.
    match get_report_by_guid(pool, &guid).await {
        Ok(_) => {
            debug!("Stored report {guid} for {}", report.domain);
            Ok(guid)
        }
        Err(StorageError::NotFound { .. }) => {
            error!("Read-back verification failed for report {guid}");
            Err(StorageError::VerificationFailed { guid })
        }
        Err(e) => Err(e),
    }
}

/// Retrieves a report by its guid.
///
/// An unknown or malformed guid yields `StorageError::NotFound`, which is an
/// expected outcome, distinct from storage-layer faults.
pub async fn get_report_by_guid(pool: &SqlitePool, guid: &str) -> Result<Report, StorageError> {
    let row = sqlx::query(
        "SELECT guid, domain, language, scores,
                performance_data, seo_data, mobile_data, security_data, created_at
         FROM reports WHERE guid = ?",
    )
    .bind(guid)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(StorageError::NotFound {
            guid: guid.to_string(),
        });
    };

    Ok(Report {
        guid: row.get("guid"),
        domain: row.get("domain"),
        language: row.get("language"),
        scores: serde_json::from_str(row.get::<String, _>("scores").as_str())?,
        performance_data: serde_json::from_str(
            row.get::<String, _>("performance_data").as_str(),
        )?,
        seo_data: serde_json::from_str(row.get::<String, _>("seo_data").as_str())?,
        mobile_data: serde_json::from_str(row.get::<String, _>("mobile_data").as_str())?,
        security_data: serde_json::from_str(row.get::<String, _>("security_data").as_str())?,
        created_at: row.get("created_at"),
    })
}
