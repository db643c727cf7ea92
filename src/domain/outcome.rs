//! Outcome types produced by strategies and by the resolution chain.

use super::reference::ParseError;

/// Why a single strategy attempt failed.
///
/// Failures are recorded and never escalate past the chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyFailure {
    #[error("timeout")]
    Timeout,

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Login wall, HTTP 401/403 or rate limiting by the upstream.
    #[error("upstream blocked the request ({0})")]
    Blocked(String),

    #[error("request failed: {0}")]
    Network(String),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Result of one strategy attempt.
///
/// `Found` and `NotFound` are not errors; `Failed` carries a retrieval or
/// parse fault that the strategy captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Found(String),
    NotFound,
    Failed(StrategyFailure),
}

impl StrategyOutcome {
    /// Builds `Found` for a usable URL, `NotFound` for a blank one.
    pub fn from_candidate(candidate: Option<String>) -> Self {
        match candidate {
            Some(url) if !url.trim().is_empty() => StrategyOutcome::Found(url),
            _ => StrategyOutcome::NotFound,
        }
    }

    /// Short label used in logs and transport payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyOutcome::Found(_) => "found",
            StrategyOutcome::NotFound => "not_found",
            StrategyOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StrategyOutcome::Failed(_))
    }
}

impl From<Result<Option<String>, StrategyFailure>> for StrategyOutcome {
    fn from(result: Result<Option<String>, StrategyFailure>) -> Self {
        match result {
            Ok(candidate) => StrategyOutcome::from_candidate(candidate),
            Err(failure) => StrategyOutcome::Failed(failure),
        }
    }
}

/// One recorded step of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: &'static str,
    pub outcome: StrategyOutcome,
}

/// Terminal value of a resolution that got past reference parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The first strategy that found an asset URL.
    Resolved {
        asset_url: String,
        strategy: &'static str,
    },
    /// Every strategy yielded `NotFound` or `Failed`, in chain order.
    Exhausted { attempts: Vec<Attempt> },
}

impl Resolution {
    pub fn asset_url(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { asset_url, .. } => Some(asset_url),
            Resolution::Exhausted { .. } => None,
        }
    }
}

/// Errors that end a resolution before or outside the strategy chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Resolution was cancelled")]
    Cancelled,
}
