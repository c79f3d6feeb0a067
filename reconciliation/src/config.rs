//! Configuration for the reconciliation workflow
//!
//! One explicit object constructed at workflow start and threaded through
//! every component; there are no process-wide mutable globals.

use runtime_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the object store (exports in, reports out)
    pub store_root: PathBuf,

    /// Amount at or above which a transaction requires approval
    pub high_value_threshold: i64,

    /// Enrichment fan-out configuration
    pub enrich: EnrichConfig,

    /// Approval gate configuration
    pub approval: ApprovalConfig,

    /// Ledger sync configuration
    pub sync: SyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from("./data/store"),
            high_value_threshold: 1_000_000,
            enrich: EnrichConfig::default(),
            approval: ApprovalConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

/// Enrichment fan-out configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Records per batch
    pub batch_size: usize,

    /// Batches in flight at once
    pub max_concurrency: usize,

    /// Attempts per batch, including the first
    pub retry_attempts: u32,

    /// Delay between batch attempts (milliseconds)
    pub retry_delay_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_concurrency: 10,
            retry_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

impl EnrichConfig {
    /// Per-batch retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.retry_attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

/// Approval gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    /// Time allowed for the external decision (seconds, default 3 days)
    pub deadline_seconds: u64,

    /// Attempts for the notification step, including the first
    pub notify_attempts: u32,

    /// Delay between notification attempts (milliseconds)
    pub notify_delay_ms: u64,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            deadline_seconds: 259_200, // 3 days
            notify_attempts: 3,
            notify_delay_ms: 500,
        }
    }
}

impl ApprovalConfig {
    /// Decision deadline
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_seconds)
    }

    /// Notification step retry policy
    pub fn notify_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.notify_attempts, Duration::from_millis(self.notify_delay_ms))
    }
}

/// Ledger sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Records per sync batch
    pub batch_size: usize,

    /// Attempts per batch, including the first
    pub max_attempts: u32,

    /// Backoff after the first failure (seconds)
    pub initial_delay_seconds: u64,

    /// Backoff ceiling (seconds)
    pub max_delay_seconds: u64,

    /// Pause between successful batches (seconds)
    pub rate_limit_wait_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_attempts: 5,
            initial_delay_seconds: 5,  // 5s → 10s → 20s → 40s, capped at 60s
            max_delay_seconds: 60,
            rate_limit_wait_seconds: 10,
        }
    }
}

impl SyncConfig {
    /// Per-batch retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.max_attempts,
            Duration::from_secs(self.initial_delay_seconds),
            Duration::from_secs(self.max_delay_seconds),
        )
    }

    /// Pause between successful batches
    pub fn rate_limit_wait(&self) -> Duration {
        Duration::from_secs(self.rate_limit_wait_seconds)
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(root) = std::env::var("RECON_STORE_ROOT") {
            config.store_root = PathBuf::from(root);
        }

        if let Ok(threshold) = std::env::var("RECON_HIGH_VALUE_THRESHOLD") {
            config.high_value_threshold = threshold
                .parse()
                .map_err(|_| crate::Error::Config(format!("bad threshold: {}", threshold)))?;
        }

        if let Ok(deadline) = std::env::var("RECON_APPROVAL_DEADLINE_SECONDS") {
            config.approval.deadline_seconds = deadline
                .parse()
                .map_err(|_| crate::Error::Config(format!("bad deadline: {}", deadline)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the workflow cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.enrich.batch_size == 0 {
            return Err(crate::Error::Config("enrich.batch_size must be >= 1".into()));
        }
        if self.enrich.max_concurrency == 0 {
            return Err(crate::Error::Config(
                "enrich.max_concurrency must be >= 1".into(),
            ));
        }
        if self.sync.batch_size == 0 {
            return Err(crate::Error::Config("sync.batch_size must be >= 1".into()));
        }
        if self.sync.max_attempts == 0 {
            return Err(crate::Error::Config("sync.max_attempts must be >= 1".into()));
        }
        Ok(())
    }
}
