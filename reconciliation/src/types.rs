//! Core types for the reconciliation workflow

use serde::{Deserialize, Serialize};

/// A single sales transaction from the daily export.
///
/// Immutable once ingested; identity is carried by `id`, unique within the
/// day's batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Transaction ID
    pub id: String,

    /// Customer name
    pub customer_name: String,

    /// Product name
    pub product: String,

    /// Amount in integer currency units
    pub amount: i64,

    /// Units sold
    pub quantity: u32,

    /// Sales region
    pub region: String,

    /// Product category
    pub category: String,

    /// Transaction timestamp (ISO 8601, carried verbatim)
    pub timestamp: String,
}

/// A sales record with computed tax and total fields attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// The underlying transaction
    #[serde(flatten)]
    pub record: SalesRecord,

    /// Tax at 10%, floored
    pub tax: i64,

    /// Amount plus tax, floored
    pub total: i64,

    /// Processed marker
    pub processed: bool,
}

impl EnrichedRecord {
    /// Transaction ID
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Amount in integer currency units
    pub fn amount(&self) -> i64 {
        self.record.amount
    }
}

/// External approval decision payload.
///
/// A missing or empty id list means no approvals; ids outside the flagged
/// set have no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    /// Ids the approver marked approved
    #[serde(default)]
    pub approved_ids: Vec<String>,
}

/// Partition of all enriched records into approved and rejected sets.
///
/// Disjoint and exhaustive: every record belongs to exactly one side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Records cleared for ledger sync
    pub approved: Vec<EnrichedRecord>,

    /// High-value records whose id was not approved
    pub rejected: Vec<EnrichedRecord>,
}

impl ReconciliationResult {
    /// Total approved sales amount
    pub fn approved_sales(&self) -> i64 {
        self.approved.iter().map(EnrichedRecord::amount).sum()
    }

    /// Total rejected sales amount
    pub fn rejected_sales(&self) -> i64 {
        self.rejected.iter().map(EnrichedRecord::amount).sum()
    }
}

/// Workflow run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every stage ran to completion
    Completed,
}

/// Locations of the written report artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLocations {
    /// Summary report, always written
    pub summary: String,

    /// Rejection-detail report, written only when rejections exist
    pub rejected_detail: Option<String>,
}

/// User-visible result of a fully successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Run status
    pub status: RunStatus,

    /// Reconciled date (YYYY-MM-DD)
    pub date: String,

    /// Records ingested
    pub total_records: usize,

    /// Records approved (non-high-value plus approved high-value)
    pub approved_records: usize,

    /// High-value records rejected
    pub rejected_records: usize,

    /// Records acknowledged by the external ledger
    pub synced_records: usize,

    /// Report artifact locations
    pub report: ReportLocations,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, amount: i64) -> SalesRecord {
        SalesRecord {
            id: id.to_string(),
            customer_name: "Acme K1".to_string(),
            product: "Air purifier".to_string(),
            amount,
            quantity: 1,
            region: "Tokyo".to_string(),
            category: "appliance".to_string(),
            timestamp: "2025-01-15T00:00:00".to_string(),
        }
    }

    #[test]
    fn test_enriched_record_serializes_flat() {
        let enriched = EnrichedRecord {
            record: record("00001", 50_000),
            tax: 5_000,
            total: 55_000,
            processed: true,
        };

        // Report consumers see one flat object, not a nested record
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["id"], "00001");
        assert_eq!(value["amount"], 50_000);
        assert_eq!(value["tax"], 5_000);
        assert!(value.get("record").is_none());
    }

    #[test]
    fn test_decision_payload_missing_ids_means_none() {
        let decision: ApprovalDecision = serde_json::from_str("{}").unwrap();
        assert!(decision.approved_ids.is_empty());
    }

    #[test]
    fn test_result_totals() {
        let result = ReconciliationResult {
            approved: vec![
                EnrichedRecord {
                    record: record("a", 100),
                    tax: 10,
                    total: 110,
                    processed: true,
                },
                EnrichedRecord {
                    record: record("b", 200),
                    tax: 20,
                    total: 220,
                    processed: true,
                },
            ],
            rejected: vec![EnrichedRecord {
                record: record("c", 1_500_000),
                tax: 150_000,
                total: 1_650_000,
                processed: true,
            }],
        };

        assert_eq!(result.approved_sales(), 300);
        assert_eq!(result.rejected_sales(), 1_500_000);
    }
}
