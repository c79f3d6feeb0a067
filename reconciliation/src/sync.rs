//! External ledger synchronization
//!
//! Forwards approved records to the external accounting system in
//! fixed-size batches, submitted strictly sequentially: the ledger endpoint
//! is rate-limited and batch ordering matters. Each batch retries with
//! exponential backoff; once a batch exhausts its budget the whole sync
//! fails and no further batches are dispatched. There is no compensating
//! rollback for batches already acknowledged.

use crate::{config::SyncConfig, types::EnrichedRecord, Error, Result};
use async_trait::async_trait;
use runtime_core::RunContext;
use std::sync::Arc;
use tracing::info;

/// Acknowledgment from the external ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncAck {
    /// Records the ledger accepted
    pub synced: usize,
}

/// External accounting system endpoint
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Forward one batch; the ledger acknowledges how many records it took
    async fn sync_batch(&self, records: &[EnrichedRecord]) -> anyhow::Result<SyncAck>;
}

/// Ledger client that acknowledges and logs.
///
/// Placeholder integration: production deployments plug the accounting
/// API client in here.
#[derive(Debug, Default)]
pub struct StubLedgerClient;

#[async_trait]
impl LedgerApi for StubLedgerClient {
    async fn sync_batch(&self, records: &[EnrichedRecord]) -> anyhow::Result<SyncAck> {
        info!(synced_count = records.len(), "synced batch to external ledger");
        Ok(SyncAck {
            synced: records.len(),
        })
    }
}

/// Result of a completed sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Records acknowledged across all batches
    pub synced_records: usize,

    /// Batches dispatched
    pub batch_count: usize,
}

/// Sequential, rate-limited ledger sync stage
pub struct LedgerSync {
    client: Arc<dyn LedgerApi>,
    config: SyncConfig,
}

impl LedgerSync {
    /// Create the stage over a ledger client
    pub fn new(client: Arc<dyn LedgerApi>, config: SyncConfig) -> Self {
        Self { client, config }
    }

    /// Sync all approved records.
    ///
    /// Pauses for the configured rate-limit interval after every
    /// successfully synced batch except the last.
    pub async fn sync(
        &self,
        ctx: &RunContext,
        approved: &[EnrichedRecord],
    ) -> Result<SyncOutcome> {
        let policy = self.config.retry_policy();
        let batches: Vec<&[EnrichedRecord]> = approved.chunks(self.config.batch_size).collect();
        let batch_count = batches.len();
        let mut synced_records = 0usize;

        for (index, batch) in batches.into_iter().enumerate() {
            let step_name = format!("sync-to-ledger[{index}]");
            let client = self.client.clone();

            let ack = runtime_core::step(ctx, &step_name, &policy, || {
                let client = client.clone();
                async move { client.sync_batch(batch).await }
            })
            .await
            .map_err(|e| match e {
                runtime_core::Error::StepExhausted {
                    attempts,
                    last_error,
                    ..
                } => Error::Sync {
                    batch_index: index,
                    attempts,
                    synced_before: synced_records,
                    last_error,
                },
                other => Error::Sync {
                    batch_index: index,
                    attempts: 0,
                    synced_before: synced_records,
                    last_error: other.to_string(),
                },
            })?;

            synced_records += ack.synced;
            info!(
                run_id = %ctx.run_id(),
                batch_index = index,
                batch_total = batch_count,
                synced = ack.synced,
                total_synced = synced_records,
                "ledger batch synced"
            );

            if index + 1 < batch_count {
                ctx.wait(self.config.rate_limit_wait()).await;
            }
        }

        Ok(SyncOutcome {
            synced_records,
            batch_count,
        })
    }
}
