//! Durable-execution primitives
//!
//! In-process executor for the interface a checkpointing workflow runtime
//! exposes to workflow code:
//!
//! - **Steps**: retried units of work governed by a declarative
//!   [`RetryPolicy`]
//! - **Batch fan-out**: bounded-concurrency dispatch over batches with an
//!   all-successful completion policy
//! - **Callbacks**: deadline-bound gates on external decisions
//! - **Waits**: logical sleeps that hold no thread
//!
//! Checkpoint persistence and cross-restart replay are the host runtime's
//! concern and are not implemented here; this crate provides the interface
//! semantics (retry budgets, completion policies, deadlines) so workflow
//! logic can be written against it and exercised in-process.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod callback;
pub mod context;
pub mod error;
pub mod map;
pub mod retry;
pub mod step;

// Re-exports
pub use callback::{CallbackOutcome, CallbackRegistry, CallbackToken};
pub use context::RunContext;
pub use error::{Error, Result};
pub use map::map_batches;
pub use retry::{Backoff, RetryPolicy};
pub use step::step;
