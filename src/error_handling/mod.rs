//! Error handling and categorization.
//!
//! Defines the typed errors used at every component boundary. The propagation
//! policy is: checker errors become per-category failure markers, storage
//! errors fail the whole analysis, `NotFound` on retrieval is expected.

mod types;

pub use types::{AnalysisError, CheckError, ErrorKind, InitializationError, StorageError};
