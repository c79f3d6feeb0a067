//! Record enrichment
//!
//! Computes tax and total for every record, executed as a bounded-
//! concurrency fan-out over fixed-size batches. Enrichment is a pure
//! function of the input record: no batch index, clock, or execution-order
//! dependence, so any batch can be retried without corrupting the merged
//! result.

use crate::{config::EnrichConfig, types::{EnrichedRecord, SalesRecord}, Error, Result};
use runtime_core::{map_batches, RunContext};
use tracing::{debug, info};

/// Enrich a single record.
///
/// `tax = floor(amount * 0.1)` and `total = floor(amount * 1.1)`, computed
/// with exact integer arithmetic (`total` is identically `amount + tax`).
/// Deterministic and idempotent.
pub fn enrich_record(record: SalesRecord) -> EnrichedRecord {
    let tax = record.amount.div_euclid(10);
    EnrichedRecord {
        tax,
        total: record.amount + tax,
        processed: true,
        record,
    }
}

/// Split records into consecutive batches of `batch_size`; the last batch
/// may be smaller.
pub fn partition(records: Vec<SalesRecord>, batch_size: usize) -> Vec<Vec<SalesRecord>> {
    let mut batches = Vec::with_capacity(records.len().div_ceil(batch_size));
    let mut records = records.into_iter();
    loop {
        let batch: Vec<SalesRecord> = records.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }
    batches
}

/// Enrich all records with the configured batch size and concurrency bound.
///
/// All-or-nothing: if any batch fails after its retry budget, the whole
/// call fails and no partial output is produced.
pub async fn enrich_all(
    ctx: &RunContext,
    records: Vec<SalesRecord>,
    config: &EnrichConfig,
) -> Result<Vec<EnrichedRecord>> {
    let total = records.len();
    let batches = partition(records, config.batch_size);

    let results = map_batches(
        ctx,
        "process-records",
        batches,
        config.max_concurrency,
        config.retry_policy(),
        |index, batch| async move {
            debug!(batch_index = index, record_count = batch.len(), "processing batch");
            Ok(batch.into_iter().map(enrich_record).collect())
        },
    )
    .await
    .map_err(Error::Enrichment)?;

    let processed: Vec<EnrichedRecord> = results.into_iter().flatten().collect();
    info!(
        run_id = %ctx.run_id(),
        input_count = total,
        processed_count = processed.len(),
        "enrichment complete"
    );
    Ok(processed)
}
