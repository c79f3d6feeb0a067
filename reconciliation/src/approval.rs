//! High-value approval gate
//!
//! Isolates transactions at or above the configured threshold, solicits an
//! external decision bounded by a deadline, and reconciles the outcome into
//! approved and rejected sets. Rejection is the absence of approval: any
//! flagged id the decision does not name is rejected, and a deadline elapse
//! is reconciled exactly like an empty decision.

use crate::{
    config::ApprovalConfig,
    types::{ApprovalDecision, EnrichedRecord, ReconciliationResult},
    Error, Result,
};
use async_trait::async_trait;
use runtime_core::{CallbackOutcome, CallbackRegistry, RunContext};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Callback name registered for the decision gate
pub const APPROVAL_CALLBACK: &str = "high-value-transaction-approval";

/// Notification emitted to the external approval channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// Callback token the approver resolves
    pub token_id: Uuid,

    /// Number of flagged transactions
    pub high_value_count: usize,

    /// Run date (YYYY-MM-DD)
    pub date: String,
}

/// External channel the approval request is emitted on
#[async_trait]
pub trait ApprovalChannel: Send + Sync {
    /// Emit the approval request. Best-effort: failures propagate through
    /// the ordinary step-retry policy, with no dedicated compensation.
    async fn notify(&self, request: &ApprovalRequest) -> anyhow::Result<()>;
}

/// Channel that logs the operator instruction.
///
/// Placeholder integration: production deployments plug a chat or email
/// notifier in here.
#[derive(Debug, Default)]
pub struct LogApprovalChannel;

#[async_trait]
impl ApprovalChannel for LogApprovalChannel {
    async fn notify(&self, request: &ApprovalRequest) -> anyhow::Result<()> {
        info!(
            token = %request.token_id,
            high_value_count = request.high_value_count,
            date = %request.date,
            "approval requested: resolve the callback token with {{\"approved_ids\": [..]}}"
        );
        Ok(())
    }
}

/// Ids of records at or above the high-value threshold
pub fn extract_high_value_ids(records: &[EnrichedRecord], threshold: i64) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.amount() >= threshold)
        .map(|r| r.id().to_string())
        .collect()
}

/// Validate a raw decision payload.
///
/// Anything that does not match `{approved_ids: [string]}` is rejected
/// explicitly and treated as no approvals.
pub fn parse_decision(payload: serde_json::Value) -> ApprovalDecision {
    match serde_json::from_value::<ApprovalDecision>(payload) {
        Ok(decision) => decision,
        Err(e) => {
            warn!(error = %e, "malformed approval payload, treating as no approvals");
            ApprovalDecision::default()
        }
    }
}

/// Reconciled approval outcome over the flagged set
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    /// Flagged ids the decision approved
    pub approved_ids: HashSet<String>,

    /// Flagged ids left unapproved
    pub rejected_ids: HashSet<String>,
}

/// Intersect the decision with the flagged set.
///
/// `approved = decision ∩ flagged`; `rejected = flagged − approved`. Ids in
/// the decision that were never flagged have no effect.
pub fn reconcile(high_value_ids: &[String], decision: &ApprovalDecision) -> ApprovalOutcome {
    let flagged: HashSet<&str> = high_value_ids.iter().map(String::as_str).collect();
    let approved_ids: HashSet<String> = decision
        .approved_ids
        .iter()
        .filter(|id| flagged.contains(id.as_str()))
        .cloned()
        .collect();
    let rejected_ids: HashSet<String> = high_value_ids
        .iter()
        .filter(|id| !approved_ids.contains(*id))
        .cloned()
        .collect();

    ApprovalOutcome {
        approved_ids,
        rejected_ids,
    }
}

/// Partition all records by threshold and approval outcome.
///
/// Disjoint and exhaustive: below-threshold records are always approved,
/// flagged records go by their id's outcome.
pub fn partition_by_approval(
    records: Vec<EnrichedRecord>,
    threshold: i64,
    outcome: &ApprovalOutcome,
) -> ReconciliationResult {
    let mut approved = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        if record.amount() < threshold || outcome.approved_ids.contains(record.id()) {
            approved.push(record);
        } else {
            rejected.push(record);
        }
    }

    ReconciliationResult { approved, rejected }
}

/// The approval gate state machine
pub struct ApprovalGate {
    channel: Arc<dyn ApprovalChannel>,
    callbacks: Arc<CallbackRegistry>,
    threshold: i64,
    config: ApprovalConfig,
}

impl ApprovalGate {
    /// Create a gate over `channel` and `callbacks`
    pub fn new(
        channel: Arc<dyn ApprovalChannel>,
        callbacks: Arc<CallbackRegistry>,
        threshold: i64,
        config: ApprovalConfig,
    ) -> Self {
        Self {
            channel,
            callbacks,
            threshold,
            config,
        }
    }

    /// Run the gate for one day's enriched records.
    ///
    /// With no flagged transactions the gate resolves immediately and no
    /// external interaction happens.
    pub async fn run(
        &self,
        ctx: &RunContext,
        date: &str,
        records: Vec<EnrichedRecord>,
    ) -> Result<ReconciliationResult> {
        let high_value_ids = extract_high_value_ids(&records, self.threshold);
        info!(
            run_id = %ctx.run_id(),
            total_records = records.len(),
            high_value_count = high_value_ids.len(),
            threshold = self.threshold,
            "extracted high-value transactions"
        );

        if high_value_ids.is_empty() {
            return Ok(ReconciliationResult {
                approved: records,
                rejected: Vec::new(),
            });
        }

        let token = self
            .callbacks
            .create(APPROVAL_CALLBACK, self.config.deadline())
            .await;
        let request = ApprovalRequest {
            token_id: token.id(),
            high_value_count: high_value_ids.len(),
            date: date.to_string(),
        };

        runtime_core::step(ctx, "send-approval-request", &self.config.notify_policy(), || {
            let channel = self.channel.clone();
            let request = request.clone();
            async move { channel.notify(&request).await }
        })
        .await
        .map_err(Error::Notification)?;

        let decision = match self
            .callbacks
            .await_decision(token)
            .await
            .map_err(Error::Callback)?
        {
            CallbackOutcome::Resolved(payload) => parse_decision(payload),
            CallbackOutcome::TimedOut => {
                warn!(
                    run_id = %ctx.run_id(),
                    "approval deadline elapsed, rejecting all flagged transactions"
                );
                ApprovalDecision::default()
            }
        };

        let outcome = reconcile(&high_value_ids, &decision);
        info!(
            run_id = %ctx.run_id(),
            approved_count = outcome.approved_ids.len(),
            rejected_count = outcome.rejected_ids.len(),
            "reconciled approval decision"
        );

        Ok(partition_by_approval(records, self.threshold, &outcome))
    }
}
