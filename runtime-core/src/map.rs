//! Bounded-concurrency batch fan-out
//!
//! Dispatches batches onto concurrent tasks with a ceiling on how many are
//! in flight at once; the rest queue and are admitted as slots free up.
//! Completion policy is all-successful: any batch failing after its retry
//! budget fails the whole dispatch and no partial output is returned.

use crate::{context::RunContext, retry::RetryPolicy, step::run_with_retry, Error, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

/// Map `f` over `batches` with at most `max_concurrency` batches in flight.
///
/// Each batch is executed as its own step under `policy`, so transient
/// per-batch failures retry independently. Results are reassembled in batch
/// order regardless of completion order, so the merge is deterministic.
///
/// `max_concurrency` must be at least 1.
pub async fn map_batches<T, U, F, Fut>(
    ctx: &RunContext,
    name: &str,
    batches: Vec<Vec<T>>,
    max_concurrency: usize,
    policy: RetryPolicy,
    f: F,
) -> Result<Vec<Vec<U>>>
where
    T: Clone + Send + Sync + 'static,
    U: Send + 'static,
    F: Fn(usize, Vec<T>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<U>>> + Send + 'static,
{
    let batch_count = batches.len();
    info!(
        run_id = %ctx.run_id(),
        step = name,
        batch_count,
        max_concurrency,
        "dispatching batches"
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut tasks: JoinSet<(usize, Result<Vec<U>>)> = JoinSet::new();

    for (index, batch) in batches.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let f = f.clone();
        let run_id = ctx.run_id();
        let step_name = format!("{name}[{index}]");

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (index, Err(Error::Join("semaphore closed".to_string()))),
            };
            let result =
                run_with_retry(run_id, &step_name, policy, || f(index, batch.clone())).await;
            (index, result)
        });
    }

    let mut results: Vec<Option<Vec<U>>> = (0..batch_count).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| Error::Join(e.to_string()))?;
        match result {
            Ok(output) => results[index] = Some(output),
            Err(e) => {
                // All-or-nothing: abandon in-flight batches, surface the failure
                tasks.abort_all();
                return Err(Error::BatchFailed {
                    index,
                    source: Box::new(e),
                });
            }
        }
    }

    results
        .into_iter()
        .map(|slot| slot.ok_or_else(|| Error::Join("missing batch result".to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_output_preserves_batch_order() {
        let ctx = RunContext::new();
        let batches = vec![vec![1, 2], vec![3, 4], vec![5]];

        let results = map_batches(
            &ctx,
            "double",
            batches,
            2,
            RetryPolicy::no_retry(),
            |_, batch| async move { Ok(batch.into_iter().map(|n| n * 2).collect()) },
        )
        .await
        .unwrap();

        assert_eq!(results, vec![vec![2, 4], vec![6, 8], vec![10]]);

        // Merged output covers every input exactly once
        let merged: Vec<i32> = results.into_iter().flatten().collect();
        assert_eq!(merged.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_ceiling_respected() {
        let ctx = RunContext::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let batches: Vec<Vec<u32>> = (0..20).map(|n| vec![n]).collect();

        let in_flight_ref = in_flight.clone();
        let peak_ref = peak.clone();
        let results = map_batches(
            &ctx,
            "bounded",
            batches,
            3,
            RetryPolicy::no_retry(),
            move |_, batch| {
                let in_flight = in_flight_ref.clone();
                let peak = peak_ref.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(batch)
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_single_batch_failure_fails_dispatch() {
        let ctx = RunContext::new();
        let batches = vec![vec![1], vec![2], vec![3]];

        let result = map_batches(
            &ctx,
            "partial",
            batches,
            2,
            RetryPolicy::no_retry(),
            |index, batch| async move {
                if index == 1 {
                    anyhow::bail!("bad batch");
                }
                Ok(batch)
            },
        )
        .await;

        match result {
            Err(Error::BatchFailed { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, Error::StepExhausted { .. }));
            }
            other => panic!("expected BatchFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batches_retry_independently() {
        let ctx = RunContext::new();
        let failures = Arc::new(AtomicU32::new(0));
        let batches = vec![vec![1], vec![2]];

        let failures_ref = failures.clone();
        let results = map_batches(
            &ctx,
            "flaky",
            batches,
            2,
            RetryPolicy::fixed(3, Duration::from_millis(100)),
            move |index, batch| {
                let failures = failures_ref.clone();
                async move {
                    // Batch 1 fails twice before succeeding
                    if index == 1 && failures.fetch_add(1, Ordering::SeqCst) < 2 {
                        anyhow::bail!("transient");
                    }
                    Ok(batch)
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(results, vec![vec![1], vec![2]]);
        assert_eq!(failures.load(Ordering::SeqCst), 3);
    }
}
