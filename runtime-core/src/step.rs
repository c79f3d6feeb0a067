//! Retrying step executor

use crate::{context::RunContext, retry::RetryPolicy, Error, Result};
use std::future::Future;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Execute an operation as a step under `policy`.
///
/// The operation is attempted up to `policy.max_attempts` times with the
/// policy's backoff between failures. Once the budget is exhausted the step
/// fails permanently with [`Error::StepExhausted`].
pub async fn step<T, F, Fut>(
    ctx: &RunContext,
    name: &str,
    policy: &RetryPolicy,
    op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    run_with_retry(ctx.run_id(), name, *policy, op).await
}

/// Retry loop shared by [`step`] and the batch fan-out.
pub(crate) async fn run_with_retry<T, F, Fut>(
    run_id: Uuid,
    name: &str,
    policy: RetryPolicy,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match op().await {
            Ok(value) => {
                if attempts > 1 {
                    info!(%run_id, step = name, attempts, "step succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => match policy.delay_after(attempts) {
                Some(delay) => {
                    warn!(
                        %run_id,
                        step = name,
                        attempt = attempts,
                        ?delay,
                        error = %e,
                        "step failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    error!(%run_id, step = name, attempts, error = %e, "step exhausted retry budget");
                    return Err(Error::StepExhausted {
                        step: name.to_string(),
                        attempts,
                        last_error: e.to_string(),
                    });
                }
            },
        }
    }
}
