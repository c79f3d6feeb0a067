//! Daily reconciliation runner
//!
//! Wires the engine to a filesystem store, the stub ledger client, and a
//! decision-file approval channel: when `approvals/{date}-decision.json`
//! exists in the store, its payload resolves the approval callback;
//! otherwise the gate waits out its deadline and fails closed.
//!
//! Usage: daily_run [DATE]

use async_trait::async_trait;
use reconciliation::{
    ApprovalChannel, ApprovalRequest, Config, FsObjectStore, ObjectStore, ReconciliationEngine,
    StubLedgerClient,
};
use runtime_core::CallbackRegistry;
use std::error::Error;
use std::sync::Arc;

/// Resolves the approval callback from a decision file when one is present.
struct FileDecisionChannel {
    store: Arc<FsObjectStore>,
    callbacks: Arc<CallbackRegistry>,
}

#[async_trait]
impl ApprovalChannel for FileDecisionChannel {
    async fn notify(&self, request: &ApprovalRequest) -> anyhow::Result<()> {
        let key = format!("approvals/{}-decision.json", request.date);
        match self.store.get(&key).await {
            Ok(body) => {
                let payload: serde_json::Value = serde_json::from_str(&body)?;
                tracing::info!(key, token = %request.token_id, "resolving approval from decision file");
                self.callbacks.resolve(request.token_id, payload).await?;
            }
            Err(_) => {
                tracing::info!(
                    token = %request.token_id,
                    high_value_count = request.high_value_count,
                    "no decision file at {key}; approval will wait for its deadline"
                );
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let date = std::env::args()
        .nth(1)
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let config = Config::from_env()?;
    let store = Arc::new(FsObjectStore::new(config.store_root.clone()));
    let callbacks = Arc::new(CallbackRegistry::new());
    let approvals = Arc::new(FileDecisionChannel {
        store: store.clone(),
        callbacks: callbacks.clone(),
    });

    let engine = ReconciliationEngine::new(
        config,
        store,
        Arc::new(StubLedgerClient),
        approvals,
        callbacks,
    )?;

    let summary = engine.run_daily(&date).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
