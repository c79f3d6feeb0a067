//! Execution context threaded through workflow steps

use std::time::Duration;
use uuid::Uuid;

/// Per-run execution context.
///
/// Carries the run identity for logging and provides the durable-wait
/// primitive. Constructed once per workflow run and passed explicitly to
/// every step; there is no implicit registration or global state.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
}

impl RunContext {
    /// Create a context for a new run
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
        }
    }

    /// Run identifier
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Logical sleep.
    ///
    /// A suspension point: no thread is held while waiting.
    pub async fn wait(&self, duration: Duration) {
        tracing::debug!(run_id = %self.run_id, ?duration, "durable wait");
        tokio::time::sleep(duration).await;
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
