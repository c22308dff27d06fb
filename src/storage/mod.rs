//! SQLite-backed persistence: the report store and the domain test-record
//! table that backs the performance reuse policy.

mod migrations;
mod pool;
mod reports;

pub use domain_tests::{get_domain_test, upsert_domain_test};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use reports::{get_report_by_guid, insert_report};
