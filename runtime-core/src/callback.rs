//! Deadline-bound external decision gate
//!
//! A workflow registers a callback token, hands its id to an external
//! system, and suspends until that system resolves the token with a JSON
//! payload or the deadline elapses. Each token carries exactly one pending
//! decision.

use crate::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

/// Handle for one pending external decision
#[derive(Debug)]
pub struct CallbackToken {
    id: Uuid,
    name: String,
    deadline: Duration,
    rx: oneshot::Receiver<serde_json::Value>,
}

impl CallbackToken {
    /// Token identifier, handed to the external system
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Callback name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time allowed for the decision to arrive
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Outcome of awaiting a callback
#[derive(Debug)]
pub enum CallbackOutcome {
    /// External system resolved the token with this payload
    Resolved(serde_json::Value),
    /// Deadline elapsed with no decision
    TimedOut,
}

/// Registry of pending callback tokens
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    pending: Mutex<HashMap<Uuid, oneshot::Sender<serde_json::Value>>>,
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback bound to `deadline`
    pub async fn create(&self, name: &str, deadline: Duration) -> CallbackToken {
        let id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        info!(callback = name, token = %id, ?deadline, "registered callback");

        CallbackToken {
            id,
            name: name.to_string(),
            deadline,
            rx,
        }
    }

    /// Resolve a pending token with a decision payload.
    ///
    /// Fails if the token is unknown, already resolved, or timed out.
    pub async fn resolve(&self, token_id: Uuid, payload: serde_json::Value) -> Result<()> {
        let tx = self
            .pending
            .lock()
            .await
            .remove(&token_id)
            .ok_or(Error::UnknownCallback(token_id))?;

        info!(token = %token_id, "callback resolved");
        tx.send(payload).map_err(|_| Error::CallbackClosed)
    }

    /// Suspend until the token is resolved or its deadline elapses
    pub async fn await_decision(&self, token: CallbackToken) -> Result<CallbackOutcome> {
        match tokio::time::timeout(token.deadline, token.rx).await {
            Ok(Ok(payload)) => Ok(CallbackOutcome::Resolved(payload)),
            Ok(Err(_)) => Err(Error::CallbackClosed),
            Err(_) => {
                // Deregister so a late resolution is rejected, not silently lost
                self.pending.lock().await.remove(&token.id);
                warn!(callback = token.name, token = %token.id, "callback deadline elapsed");
                Ok(CallbackOutcome::TimedOut)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_delivers_payload() {
        let registry = CallbackRegistry::new();
        let token = registry.create("approval", Duration::from_secs(60)).await;
        let token_id = token.id();

        registry
            .resolve(token_id, json!({"approved_ids": ["00001"]}))
            .await
            .unwrap();

        match registry.await_decision(token).await.unwrap() {
            CallbackOutcome::Resolved(payload) => {
                assert_eq!(payload["approved_ids"][0], "00001");
            }
            CallbackOutcome::TimedOut => panic!("expected resolution"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapse_times_out() {
        let registry = CallbackRegistry::new();
        let token = registry.create("approval", Duration::from_secs(3600)).await;
        let token_id = token.id();

        let outcome = registry.await_decision(token).await.unwrap();
        assert!(matches!(outcome, CallbackOutcome::TimedOut));

        // Late resolution is an error, not a silent success
        let late = registry.resolve(token_id, json!({})).await;
        assert!(matches!(late, Err(Error::UnknownCallback(_))));
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let registry = CallbackRegistry::new();
        let result = registry.resolve(Uuid::new_v4(), json!({})).await;
        assert!(matches!(result, Err(Error::UnknownCallback(_))));
    }

    #[tokio::test]
    async fn test_double_resolution_rejected() {
        let registry = CallbackRegistry::new();
        let token = registry.create("approval", Duration::from_secs(60)).await;
        let token_id = token.id();

        registry.resolve(token_id, json!({})).await.unwrap();
        let second = registry.resolve(token_id, json!({})).await;
        assert!(matches!(second, Err(Error::UnknownCallback(_))));
    }
}
