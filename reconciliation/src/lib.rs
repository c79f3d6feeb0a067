//! Daily Sales Reconciliation
//!
//! Ingests a day's sales export, enriches every record with computed
//! tax/total fields, gates high-value transactions behind an external
//! approval decision bounded by a deadline, forwards approved records to an
//! external ledger under rate limiting and retry, and emits audit reports.
//!
//! # Architecture
//!
//! Stages run in a fixed sequence on top of the `runtime-core` execution
//! primitives:
//!
//! 1. **Ingest**: load and type-normalize the CSV export
//! 2. **Enrich**: bounded-concurrency batch fan-out, all-or-nothing
//! 3. **Approval gate**: flag amounts ≥ threshold, await the external
//!    decision or its deadline, reconcile into approved/rejected
//! 4. **Ledger sync**: sequential batches with exponential retry and a
//!    fixed rate-limit pause between batches
//! 5. **Reports**: summary always, rejection detail only when rejections
//!    exist
//!
//! # Example
//!
//! ```no_run
//! use reconciliation::{
//!     Config, FsObjectStore, LogApprovalChannel, ReconciliationEngine, StubLedgerClient,
//! };
//! use runtime_core::CallbackRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> reconciliation::Result<()> {
//!     let config = Config::default();
//!     let store = Arc::new(FsObjectStore::new(config.store_root.clone()));
//!     let callbacks = Arc::new(CallbackRegistry::new());
//!
//!     let engine = ReconciliationEngine::new(
//!         config,
//!         store,
//!         Arc::new(StubLedgerClient),
//!         Arc::new(LogApprovalChannel),
//!         callbacks,
//!     )?;
//!
//!     let summary = engine.run_daily("2025-01-15").await?;
//!     println!(
//!         "approved {} / rejected {}",
//!         summary.approved_records, summary.rejected_records
//!     );
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod approval;
pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod ingest;
pub mod report;
pub mod store;
pub mod sync;
pub mod types;

// Re-exports
pub use approval::{ApprovalChannel, ApprovalGate, ApprovalRequest, LogApprovalChannel};
pub use config::Config;
pub use engine::ReconciliationEngine;
pub use error::{Error, Result};
pub use store::{FsObjectStore, ObjectStore};
pub use sync::{LedgerApi, LedgerSync, StubLedgerClient, SyncAck};
pub use types::{
    ApprovalDecision, EnrichedRecord, ReconciliationResult, ReportLocations, RunStatus,
    RunSummary, SalesRecord,
};
