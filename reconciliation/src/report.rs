//! Audit report generation
//!
//! Persists a summary of the day's reconciliation and, when any
//! transaction was rejected, a rejection-detail report. The two writes are
//! not transactional: a summary failure after the detail was written leaves
//! the detail artifact in place.

use crate::{
    store::ObjectStore,
    types::{EnrichedRecord, ReportLocations},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Store key for a day's summary report
pub fn summary_key(date: &str) -> String {
    format!("reports/{date}-report.json")
}

/// Store key for a day's rejection-detail report
pub fn rejected_key(date: &str) -> String {
    format!("rejected/{date}-rejected.json")
}

/// Summary report body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Reconciled date
    pub date: String,

    /// Aggregated counts and amounts
    pub summary: SummaryCounts,
}

/// Aggregates over both partitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCounts {
    /// Approved record count
    pub total_approved: usize,

    /// Rejected record count
    pub total_rejected: usize,

    /// Total approved sales amount
    pub approved_sales: i64,

    /// Total rejected sales amount
    pub rejected_sales: i64,
}

/// Rejection-detail report body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedReport {
    /// Reconciled date
    pub date: String,

    /// Rejected record count
    pub rejected_count: usize,

    /// Total rejected sales amount
    pub total_amount: i64,

    /// Full rejected records
    pub records: Vec<EnrichedRecord>,
}

/// Writes the audit artifacts to the object store
pub struct ReportWriter {
    store: Arc<dyn ObjectStore>,
}

impl ReportWriter {
    /// Create a writer over `store`
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Write the day's report pair.
    ///
    /// The summary is always written; the rejection detail only when
    /// `rejected` is non-empty, in which case its location is returned.
    pub async fn generate(
        &self,
        date: &str,
        approved: &[EnrichedRecord],
        rejected: &[EnrichedRecord],
    ) -> Result<ReportLocations> {
        let mut rejected_detail = None;
        if !rejected.is_empty() {
            let report = RejectedReport {
                date: date.to_string(),
                rejected_count: rejected.len(),
                total_amount: rejected.iter().map(EnrichedRecord::amount).sum(),
                records: rejected.to_vec(),
            };
            let key = rejected_key(date);
            self.put_json(&key, &report).await?;
            rejected_detail = Some(self.store.location(&key));
        }

        let approved_sales: i64 = approved.iter().map(EnrichedRecord::amount).sum();
        let rejected_sales: i64 = rejected.iter().map(EnrichedRecord::amount).sum();
        let summary = SummaryReport {
            date: date.to_string(),
            summary: SummaryCounts {
                total_approved: approved.len(),
                total_rejected: rejected.len(),
                approved_sales,
                rejected_sales,
            },
        };
        let key = summary_key(date);
        self.put_json(&key, &summary).await?;

        info!(
            approved_count = approved.len(),
            rejected_count = rejected.len(),
            approved_sales,
            rejected_sales,
            summary_key = key,
            "generated reconciliation reports"
        );

        Ok(ReportLocations {
            summary: self.store.location(&key),
            rejected_detail,
        })
    }

    async fn put_json<T: Serialize>(&self, key: &str, body: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(body)
            .map_err(|e| Error::ReportWrite(format!("{key}: {e}")))?;
        self.store
            .put(key, &json)
            .await
            .map_err(|e| Error::ReportWrite(format!("{key}: {e}")))
    }
}
