//! Error types for the reconciliation workflow

use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciliation errors
#[derive(Error, Debug)]
pub enum Error {
    /// Named export does not exist in the store
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// Export row failed to parse
    #[error("malformed sales export: {0}")]
    DataFormat(String),

    /// Enrichment fan-out failed after its retry budget
    #[error("enrichment failed: {0}")]
    Enrichment(#[source] runtime_core::Error),

    /// Ledger sync batch failed after its retry budget
    #[error(
        "ledger sync failed on batch {batch_index} after {attempts} attempts \
         ({synced_before} records synced before failure): {last_error}"
    )]
    Sync {
        /// Index of the failing batch
        batch_index: usize,
        /// Attempts made on the failing batch
        attempts: u32,
        /// Records acknowledged by the ledger before the failure
        synced_before: usize,
        /// Error from the final attempt
        last_error: String,
    },

    /// Report artifact could not be written
    #[error("report write failed: {0}")]
    ReportWrite(String),

    /// Approval notification could not be emitted
    #[error("approval notification failed: {0}")]
    Notification(#[source] runtime_core::Error),

    /// Callback gate failed
    #[error("approval callback error: {0}")]
    Callback(#[source] runtime_core::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
