//! Strategy trait and the per-attempt execution context.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::outcome::StrategyOutcome;
use super::reference::PostReference;

/// Deadline and cancellation signal handed to a single strategy attempt.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl ExecutionContext {
    pub fn new(budget: Duration, cancel: CancellationToken) -> Self {
        Self {
            deadline: Instant::now() + budget,
            cancel,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// One retrieval and extraction technique against a post reference.
///
/// Implementations are constructed once at startup and shared across
/// concurrent resolutions, so they must hold no per-call mutable state.
///
/// `attempt` never panics or propagates errors: every retrieval or parse
/// fault is reported as [`StrategyOutcome::Failed`].
///
/// # Implementations
///
/// - [`crate::infrastructure::strategies::ScrapeStrategy`]
/// - [`crate::infrastructure::strategies::StructuredQueryStrategy`]
/// - [`crate::infrastructure::strategies::DirectFetchStrategy`]
/// - [`crate::infrastructure::strategies::RelayStrategy`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Stable name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Runs one attempt, respecting the context deadline.
    async fn attempt(&self, reference: &PostReference, ctx: &ExecutionContext) -> StrategyOutcome;
}
