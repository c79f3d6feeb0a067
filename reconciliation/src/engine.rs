//! Daily reconciliation engine
//!
//! Orchestrates the fixed stage sequence for one day's export: ingest,
//! enrich, approval gate, ledger sync, reports. Stages run strictly in
//! order; only enrichment fans out internally. A fatal error at any stage
//! aborts the remainder of the run with no cross-stage compensation.

use crate::{
    approval::{ApprovalChannel, ApprovalGate},
    config::Config,
    enrich, ingest,
    report::ReportWriter,
    store::ObjectStore,
    sync::{LedgerApi, LedgerSync},
    types::{RunStatus, RunSummary},
    Result,
};
use runtime_core::{CallbackRegistry, RunContext};
use std::sync::Arc;

/// Reconciliation engine
pub struct ReconciliationEngine {
    /// Object store (exports in, reports out)
    store: Arc<dyn ObjectStore>,

    /// Approval gate
    gate: ApprovalGate,

    /// Ledger sync stage
    ledger_sync: LedgerSync,

    /// Report writer
    reports: ReportWriter,

    /// Configuration
    config: Config,
}

impl ReconciliationEngine {
    /// Create an engine over its external collaborators.
    ///
    /// The callback registry is shared with whatever surface lets the
    /// external approver resolve decisions.
    pub fn new(
        config: Config,
        store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn LedgerApi>,
        approvals: Arc<dyn ApprovalChannel>,
        callbacks: Arc<CallbackRegistry>,
    ) -> Result<Self> {
        config.validate()?;

        let gate = ApprovalGate::new(
            approvals,
            callbacks,
            config.high_value_threshold,
            config.approval.clone(),
        );
        let ledger_sync = LedgerSync::new(ledger, config.sync.clone());
        let reports = ReportWriter::new(store.clone());

        Ok(Self {
            store,
            gate,
            ledger_sync,
            reports,
            config,
        })
    }

    /// Run the full reconciliation for `date` (YYYY-MM-DD).
    ///
    /// Returns a summary only when every stage completed; any fatal error
    /// surfaces as a failed run, leaving whatever artifacts earlier stages
    /// already wrote.
    pub async fn run_daily(&self, date: &str) -> Result<RunSummary> {
        let ctx = RunContext::new();
        tracing::info!(run_id = %ctx.run_id(), date, "starting daily reconciliation");

        // Step 1: Load the day's export
        let records = ingest::load_sales_export(self.store.as_ref(), date).await?;
        let total_records = records.len();

        // Step 2: Enrich all records (parallel batches)
        let processed = enrich::enrich_all(&ctx, records, &self.config.enrich).await?;

        // Steps 3-4: Approval gate over high-value transactions
        let result = self.gate.run(&ctx, date, processed).await?;

        // Step 5: Forward approved records to the external ledger
        let sync = self.ledger_sync.sync(&ctx, &result.approved).await?;

        // Step 6: Audit reports
        let report = self
            .reports
            .generate(date, &result.approved, &result.rejected)
            .await?;

        tracing::info!(
            run_id = %ctx.run_id(),
            date,
            total_records,
            approved_records = result.approved.len(),
            rejected_records = result.rejected.len(),
            synced_records = sync.synced_records,
            "daily reconciliation complete"
        );

        Ok(RunSummary {
            status: RunStatus::Completed,
            date: date.to_string(),
            total_records,
            approved_records: result.approved.len(),
            rejected_records: result.rejected.len(),
            synced_records: sync.synced_records,
            report,
        })
    }
}
