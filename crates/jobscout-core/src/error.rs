//! Error types shared across the core.
//!
//! Agent-level failures (`AgentError`) are recorded on a run's outcomes and never
//! propagate out of the orchestrator. `CoreError` covers registry/store/limiter
//! misuse that callers are expected to handle.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Returned when a wait (limiter acquisition, agent fetch) is stopped by the
/// run's cancellation token before it could complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Failure of a single source agent during one run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// Transport-level failure (connection refused, HTTP status, DNS).
    #[error("network: {0}")]
    Network(String),
    /// Upstream payload could not be turned into job records.
    #[error("parse: {0}")]
    Parse(String),
    /// Source requires credentials that are missing or were rejected.
    #[error("auth: {0}")]
    Auth(String),
    /// Agent could not be instantiated for this run.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// The run was cancelled before or while this agent ran.
    #[error("cancelled")]
    Cancelled,
    /// The run deadline or the agent's own timeout elapsed.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    /// The agent task ended without producing an outcome (panic).
    #[error("agent task aborted")]
    Aborted,
}

impl AgentError {
    /// True for failures caused by cancellation or deadline expiry rather than
    /// by the source itself.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AgentError::Cancelled | AgentError::TimedOut(_))
    }
}

impl From<Cancelled> for AgentError {
    fn from(_: Cancelled) -> Self {
        AgentError::Cancelled
    }
}

/// Errors returned by registry, store and limiter operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent not found: {0}")]
    UnknownAgent(String),

    #[error("rate limiter needs a positive rate and interval")]
    InvalidRate,

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_classification() {
        assert!(AgentError::Cancelled.is_cancellation());
        assert!(AgentError::TimedOut(Duration::from_secs(1)).is_cancellation());
        assert!(!AgentError::Network("reset".into()).is_cancellation());
        assert!(!AgentError::Auth("missing".into()).is_cancellation());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            CoreError::UnknownAgent("ghost".into()).to_string(),
            "agent not found: ghost"
        );
        assert_eq!(AgentError::Parse("bad json".into()).to_string(), "parse: bad json");
        assert_eq!(AgentError::from(Cancelled), AgentError::Cancelled);
    }
}
