//! Property-based tests for reconciliation invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Enrichment arithmetic: tax/total are exact floors, idempotent
//! - Fan-out partitioning: every input id appears exactly once
//! - Reconcile algebra: rejected = flagged − (decision ∩ flagged)
//! - Approval partition: disjoint and exhaustive

use proptest::prelude::*;
use reconciliation::approval::{partition_by_approval, reconcile};
use reconciliation::enrich::{enrich_record, partition};
use reconciliation::{ApprovalDecision, SalesRecord};
use std::collections::{HashMap, HashSet};

const THRESHOLD: i64 = 1_000_000;

/// Strategy for generating valid amounts (positive integer currency units)
fn amount_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000_000
}

/// Strategy for generating record ids
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{4,8}"
}

fn record(id: String, amount: i64) -> SalesRecord {
    SalesRecord {
        id,
        customer_name: "Company A1".to_string(),
        product: "Air purifier".to_string(),
        amount,
        quantity: 1,
        region: "Tokyo".to_string(),
        category: "appliance".to_string(),
        timestamp: "2025-01-15T00:00:00".to_string(),
    }
}

/// Strategy for generating record sets with unique ids
fn records_strategy(max: usize) -> impl Strategy<Value = Vec<SalesRecord>> {
    prop::collection::hash_map(id_strategy(), amount_strategy(), 0..max)
        .prop_map(|m| m.into_iter().map(|(id, amount)| record(id, amount)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: tax and total are the exact floors of 0.1x and 1.1x
    #[test]
    fn prop_enrichment_arithmetic(amount in amount_strategy()) {
        let enriched = enrich_record(record("a1".to_string(), amount));

        prop_assert_eq!(enriched.tax, amount.div_euclid(10));
        prop_assert_eq!(enriched.total, (11 * amount).div_euclid(10));
        prop_assert_eq!(enriched.total, amount + enriched.tax);
        prop_assert!(enriched.processed);
    }

    /// Property: re-enriching the output's base record changes nothing
    #[test]
    fn prop_enrichment_idempotent(amount in amount_strategy()) {
        let first = enrich_record(record("a1".to_string(), amount));
        let second = enrich_record(first.record.clone());
        prop_assert_eq!(first, second);
    }

    /// Property: partitioning preserves every id exactly once
    #[test]
    fn prop_partition_reconstructs_input(
        records in records_strategy(120),
        batch_size in 1usize..40,
    ) {
        let input_ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let batches = partition(records, batch_size);

        // Every batch but the last is exactly batch_size
        for batch in batches.iter().rev().skip(1) {
            prop_assert_eq!(batch.len(), batch_size);
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        for record in batches.into_iter().flatten() {
            *seen.entry(record.id).or_insert(0) += 1;
        }
        prop_assert_eq!(seen.len(), input_ids.len());
        prop_assert!(input_ids.iter().all(|id| seen[id] == 1));
    }

    /// Property: rejected = flagged − (decision ∩ flagged); foreign ids
    /// have no effect
    #[test]
    fn prop_reconcile_algebra(
        flagged in prop::collection::hash_set(id_strategy(), 0..30),
        decided in prop::collection::vec(id_strategy(), 0..30),
    ) {
        let flagged: Vec<String> = flagged.into_iter().collect();
        let decision = ApprovalDecision { approved_ids: decided.clone() };
        let outcome = reconcile(&flagged, &decision);

        let flagged_set: HashSet<&String> = flagged.iter().collect();
        let decided_set: HashSet<&String> = decided.iter().collect();

        // approved ⊆ flagged ∩ decided
        for id in &outcome.approved_ids {
            prop_assert!(flagged_set.contains(id) && decided_set.contains(id));
        }

        // approved and rejected partition the flagged set
        prop_assert!(outcome.approved_ids.is_disjoint(&outcome.rejected_ids));
        prop_assert_eq!(
            outcome.approved_ids.len() + outcome.rejected_ids.len(),
            flagged.len()
        );
        for id in &flagged {
            prop_assert!(
                outcome.approved_ids.contains(id) || outcome.rejected_ids.contains(id)
            );
        }
    }

    /// Property: the final partition is disjoint and exhaustive, and only
    /// flagged records can land in rejected
    #[test]
    fn prop_approval_partition(
        records in records_strategy(60),
        decided in prop::collection::vec(id_strategy(), 0..20),
    ) {
        let enriched: Vec<_> = records.into_iter().map(enrich_record).collect();
        let flagged: Vec<String> = enriched
            .iter()
            .filter(|r| r.amount() >= THRESHOLD)
            .map(|r| r.id().to_string())
            .collect();

        let decision = ApprovalDecision { approved_ids: decided };
        let outcome = reconcile(&flagged, &decision);
        let total = enriched.len();
        let result = partition_by_approval(enriched, THRESHOLD, &outcome);

        prop_assert_eq!(result.approved.len() + result.rejected.len(), total);

        let approved_ids: HashSet<&str> = result.approved.iter().map(|r| r.id()).collect();
        let rejected_ids: HashSet<&str> = result.rejected.iter().map(|r| r.id()).collect();
        prop_assert!(approved_ids.is_disjoint(&rejected_ids));

        // Below-threshold records are always approved
        for record in &result.rejected {
            prop_assert!(record.amount() >= THRESHOLD);
        }
    }
}
