//! Strategy chain executor.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{
    Attempt, ExecutionContext, Resolution, ResolveError, Strategy, StrategyFailure,
    StrategyOutcome, parse,
};

/// Errors raised while assembling a chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainConfigError {
    #[error("Strategy chain must contain at least one strategy")]
    Empty,

    #[error("Strategy attempt timeout must be greater than zero")]
    ZeroTimeout,
}

/// Resolves post references by running an ordered chain of strategies.
///
/// Strategies run one at a time in declared order. The first `Found`
/// outcome ends the resolution; later strategies are never consulted.
/// A failing or slow strategy is recorded and the chain moves on.
///
/// The service holds only immutable configuration and is shared across
/// concurrent resolutions behind an `Arc`.
pub struct ResolverService {
    strategies: Vec<Arc<dyn Strategy>>,
    attempt_timeout: Duration,
}

impl ResolverService {
    /// Default per-attempt deadline, in line with observed upstream latency.
    pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Creates a resolver over the given strategies.
    ///
    /// # Errors
    ///
    /// Returns [`ChainConfigError::Empty`] for an empty strategy list and
    /// [`ChainConfigError::ZeroTimeout`] for a zero attempt timeout.
    pub fn new(
        strategies: Vec<Arc<dyn Strategy>>,
        attempt_timeout: Duration,
    ) -> Result<Self, ChainConfigError> {
        if strategies.is_empty() {
            return Err(ChainConfigError::Empty);
        }
        if attempt_timeout.is_zero() {
            return Err(ChainConfigError::ZeroTimeout);
        }

        Ok(Self {
            strategies,
            attempt_timeout,
        })
    }

    /// Strategy names in chain order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Resolves a reference with no external cancellation.
    ///
    /// See [`Self::resolve_with_cancellation`].
    pub async fn resolve(&self, reference: &str) -> Result<Resolution, ResolveError> {
        self.resolve_with_cancellation(reference, CancellationToken::new())
            .await
    }

    /// Resolves a reference to a direct media URL.
    ///
    /// # Flow
    ///
    /// 1. Parse the reference; a parse failure returns before any network activity
    /// 2. Run each strategy under its own deadline, recording the outcome
    /// 3. Return [`Resolution::Resolved`] on the first non-blank `Found`
    /// 4. Return [`Resolution::Exhausted`] with every attempt otherwise
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Parse`] if the reference has no post segment
    /// - [`ResolveError::Cancelled`] if `cancel` fires; the in-flight attempt
    ///   is dropped immediately, releasing its connection
    pub async fn resolve_with_cancellation(
        &self,
        reference: &str,
        cancel: CancellationToken,
    ) -> Result<Resolution, ResolveError> {
        let reference = parse(reference)?;
        let total = self.strategies.len();
        let mut attempts = Vec::with_capacity(total);

        for (index, strategy) in self.strategies.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }

            let name = strategy.name();
            let ctx = ExecutionContext::new(self.attempt_timeout, cancel.child_token());
            let started = Instant::now();

            debug!(
                "Trying strategy '{}' ({}/{}) for {}",
                name,
                index + 1,
                total,
                reference.shortcode()
            );

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Resolution of {} cancelled during '{}'", reference.shortcode(), name);
                    return Err(ResolveError::Cancelled);
                }
                result = tokio::time::timeout_at(ctx.deadline(), strategy.attempt(&reference, &ctx)) => {
                    match result {
                        Ok(outcome) => normalize(outcome),
                        Err(_) => StrategyOutcome::Failed(StrategyFailure::Timeout),
                    }
                }
            };

            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &outcome {
                StrategyOutcome::Found(url) => {
                    info!(
                        strategy = name,
                        elapsed_ms, "Resolved {} via '{}'", reference.shortcode(), name
                    );
                    return Ok(Resolution::Resolved {
                        asset_url: url.clone(),
                        strategy: name,
                    });
                }
                StrategyOutcome::NotFound => {
                    info!(
                        strategy = name,
                        elapsed_ms, "Strategy '{}' found no media, trying next", name
                    );
                }
                StrategyOutcome::Failed(reason) => {
                    warn!(
                        strategy = name,
                        elapsed_ms, "Strategy '{}' failed: {}, trying next", name, reason
                    );
                }
            }

            attempts.push(Attempt {
                strategy: name,
                outcome,
            });
        }

        warn!(
            "All {} strategies exhausted for {}",
            total,
            reference.shortcode()
        );

        Ok(Resolution::Exhausted { attempts })
    }
}

/// Blank asset URLs count as not found.
fn normalize(outcome: StrategyOutcome) -> StrategyOutcome {
    match outcome {
        StrategyOutcome::Found(url) => StrategyOutcome::from_candidate(Some(url)),
        other => other,
    }
}
