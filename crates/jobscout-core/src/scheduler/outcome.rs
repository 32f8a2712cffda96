//! Per-agent results of one orchestrated run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::model::JobRecord;

/// What one agent produced during a run: records on success, an error otherwise.
/// Exactly one outcome exists per agent that took part in the run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub agent: String,
    pub records: Vec<JobRecord>,
    pub error: Option<AgentError>,
    pub elapsed: Duration,
}

impl AgentOutcome {
    pub fn success(agent: impl Into<String>, records: Vec<JobRecord>, elapsed: Duration) -> Self {
        Self {
            agent: agent.into(),
            records,
            error: None,
            elapsed,
        }
    }

    pub fn failure(agent: impl Into<String>, error: AgentError, elapsed: Duration) -> Self {
        Self {
            agent: agent.into(),
            records: Vec::new(),
            error: Some(error),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Concatenate the records of successful outcomes, in the order given.
///
/// No deduplication happens here; the store drops repeated URLs on insert.
pub fn merge(outcomes: &[AgentOutcome]) -> Vec<JobRecord> {
    outcomes
        .iter()
        .filter(|o| o.is_success())
        .flat_map(|o| o.records.iter().cloned())
        .collect()
}

/// Serializable view of an outcome, without the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub agent: String,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl From<&AgentOutcome> for OutcomeSummary {
    fn from(o: &AgentOutcome) -> Self {
        Self {
            agent: o.agent.clone(),
            count: o.records.len(),
            error: o.error.as_ref().map(ToString::to_string),
            elapsed_ms: u64::try_from(o.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Summary of `Orchestrator::run_and_store`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcomes: Vec<OutcomeSummary>,
    /// Records returned by successful agents, before dedup.
    pub fetched: usize,
    /// Records that were new to the store.
    pub inserted: usize,
}
