//! Declarative retry policies
//!
//! A policy is a value (`max_attempts` + backoff shape), not executable
//! code: the delay schedule can be inspected and tested without running a
//! single step.

use std::time::Duration;

/// Backoff shape between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately
    None,
    /// Fixed delay between attempts
    Fixed(Duration),
    /// Delay doubles each failure, starting at `base`, capped at `cap`
    Exponential {
        /// Delay after the first failure
        base: Duration,
        /// Upper bound on any single delay
        cap: Duration,
    },
}

/// Retry policy for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first
    pub max_attempts: u32,

    /// Backoff between attempts
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::None,
        }
    }

    /// Fixed delay between up to `max_attempts` attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Exponential backoff: `base`, `2*base`, `4*base`, ... capped at `cap`
    pub fn exponential(max_attempts: u32, base: Duration, cap: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { base, cap },
        }
    }

    /// Delay before the next attempt after `failed_attempts` failures
    /// (1-indexed). `None` means the budget is exhausted and the step
    /// fails permanently.
    pub fn delay_after(&self, failed_attempts: u32) -> Option<Duration> {
        if failed_attempts >= self.max_attempts {
            return None;
        }
        let delay = match self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, cap } => {
                let factor = 2u32.saturating_pow(failed_attempts.saturating_sub(1));
                base.saturating_mul(factor).min(cap)
            }
        };
        Some(delay)
    }
}
