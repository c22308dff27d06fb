// storage/migrations.rs
// Schema bootstrap

use sqlx::{Pool, Sqlite};

use crate::error_handling::StorageError;

/// Creates the `reports` and `domain_tests` tables if they don't exist.
///
/// `reports` rows are immutable once written; `domain_tests` holds at most
/// one live row per domain (upsert semantics, enforced by the primary key).
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS reports (
        guid TEXT PRIMARY KEY,
        domain TEXT NOT NULL,
        language TEXT NOT NULL,
        scores TEXT NOT NULL,
        performance_data TEXT NOT NULL,
        seo_data TEXT NOT NULL,
        mobile_data TEXT NOT NULL,
        security_data TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS domain_tests (
        domain TEXT PRIMARY KEY,
        test_id TEXT NOT NULL,
        last_run INTEGER NOT NULL
    )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
