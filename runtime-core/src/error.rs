//! Error types for the execution primitives

use thiserror::Error;
use uuid::Uuid;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors
#[derive(Error, Debug)]
pub enum Error {
    /// A step failed on every attempt its retry policy allowed
    #[error("step '{step}' exhausted retry budget after {attempts} attempts: {last_error}")]
    StepExhausted {
        /// Step name
        step: String,
        /// Attempts made, including the first
        attempts: u32,
        /// Error from the final attempt
        last_error: String,
    },

    /// A fan-out batch failed, aborting the whole dispatch
    #[error("batch {index} failed: {source}")]
    BatchFailed {
        /// Index of the failing batch
        index: usize,
        /// Underlying step failure
        #[source]
        source: Box<Error>,
    },

    /// Callback token not registered or already resolved
    #[error("unknown or already-resolved callback token {0}")]
    UnknownCallback(Uuid),

    /// Callback channel dropped before a decision arrived
    #[error("callback channel closed before resolution")]
    CallbackClosed,

    /// A fan-out task was cancelled or panicked
    #[error("fan-out task failed: {0}")]
    Join(String),
}
