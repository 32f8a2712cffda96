//! Fan-out of one search over every active agent.
//!
//! One task per agent in a `JoinSet`; each task takes a token from the shared
//! limiter before fetching. The collector waits for all tasks or the deadline,
//! whichever comes first, then reports one outcome per agent in launch order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::agent::SourceAgent;
use crate::error::AgentError;
use crate::model::{FilterCriteria, JobRecord};
use crate::registry::{ActiveAgent, AgentRegistry};
use crate::store::JobStore;

use super::limiter::RateLimiter;
use super::outcome::{merge, AgentOutcome, OutcomeSummary, RunReport};

/// Stand-in deadline when the requested one does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Deadline,
    Cancelled,
}

/// Runs registry agents concurrently under one shared rate limiter.
pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    limiter: Arc<RateLimiter>,
}

impl Orchestrator {
    pub fn new(registry: Arc<AgentRegistry>, limiter: Arc<RateLimiter>) -> Self {
        Self { registry, limiter }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run every enabled agent with `criteria`, giving up after `deadline`.
    pub async fn run_all(&self, criteria: &FilterCriteria, deadline: Duration) -> Vec<AgentOutcome> {
        self.run_all_with_cancel(criteria, deadline, &CancellationToken::new())
            .await
    }

    /// Like `run_all`, but also stops when `parent` is cancelled. Agents still
    /// running at that point get a `Cancelled` outcome instead of `TimedOut`.
    pub async fn run_all_with_cancel(
        &self,
        criteria: &FilterCriteria,
        deadline: Duration,
        parent: &CancellationToken,
    ) -> Vec<AgentOutcome> {
        let agents = self.registry.active_agents().await;
        self.run_agents(agents, criteria, deadline, parent).await
    }

    /// Run, merge successful records into `store`, and summarise.
    pub async fn run_and_store(
        &self,
        criteria: &FilterCriteria,
        deadline: Duration,
        store: &JobStore,
    ) -> RunReport {
        let outcomes = self.run_all(criteria, deadline).await;
        let records = merge(&outcomes);
        let fetched = records.len();
        let inserted = store.store(records);
        tracing::info!(fetched, inserted, "run merged into store");
        RunReport {
            outcomes: outcomes.iter().map(OutcomeSummary::from).collect(),
            fetched,
            inserted,
        }
    }

    /// Fan out over an explicit agent set. Outcomes come back in `agents` order.
    pub async fn run_agents(
        &self,
        agents: Vec<ActiveAgent>,
        criteria: &FilterCriteria,
        deadline: Duration,
        parent: &CancellationToken,
    ) -> Vec<AgentOutcome> {
        if agents.is_empty() {
            tracing::warn!("no active agents for this run");
            return Vec::new();
        }

        let started = Instant::now();
        let deadline_at = started.checked_add(deadline).unwrap_or_else(|| started + FAR_FUTURE);
        let cancel = parent.child_token();
        let criteria = Arc::new(criteria.clone());
        let names: Vec<String> = agents.iter().map(|a| a.agent.name().to_string()).collect();

        let mut join_set = JoinSet::new();
        for (index, active) in agents.into_iter().enumerate() {
            let limiter = Arc::clone(&self.limiter);
            let criteria = Arc::clone(&criteria);
            let cancel = cancel.clone();
            let timeout = active.config.timeout_secs.map(Duration::from_secs);
            join_set.spawn(async move {
                let agent_started = Instant::now();
                let result = fetch_one(&*active.agent, &criteria, &limiter, cancel, timeout).await;
                let elapsed = agent_started.elapsed();
                let name = active.agent.name().to_string();
                let outcome = match result {
                    Ok(records) => AgentOutcome::success(name, records, elapsed),
                    Err(e) => AgentOutcome::failure(name, e, elapsed),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<AgentOutcome>> = (0..names.len()).map(|_| None).collect();
        let mut stop: Option<StopReason> = None;
        loop {
            tokio::select! {
                joined = join_set.join_next() => match joined {
                    None => break,
                    Some(Ok((index, outcome))) => slots[index] = Some(outcome),
                    Some(Err(e)) if e.is_panic() => tracing::error!(error = %e, "agent task panicked"),
                    Some(Err(_)) => {}
                },
                _ = tokio::time::sleep_until(deadline_at), if stop.is_none() => {
                    stop = Some(StopReason::Deadline);
                    cancel.cancel();
                    join_set.abort_all();
                }
                _ = parent.cancelled(), if stop.is_none() => {
                    stop = Some(StopReason::Cancelled);
                    cancel.cancel();
                    join_set.abort_all();
                }
            }
        }

        let outcomes: Vec<AgentOutcome> = slots
            .into_iter()
            .zip(names)
            .map(|(slot, name)| match (slot, stop) {
                // An agent that noticed our token reports Cancelled; when the
                // token fired because of the deadline, call it a timeout.
                (Some(mut o), Some(StopReason::Deadline))
                    if o.error == Some(AgentError::Cancelled) =>
                {
                    o.error = Some(AgentError::TimedOut(deadline));
                    o
                }
                (Some(o), _) => o,
                (None, Some(StopReason::Deadline)) => {
                    AgentOutcome::failure(name, AgentError::TimedOut(deadline), started.elapsed())
                }
                (None, Some(StopReason::Cancelled)) => {
                    AgentOutcome::failure(name, AgentError::Cancelled, started.elapsed())
                }
                (None, None) => AgentOutcome::failure(name, AgentError::Aborted, started.elapsed()),
            })
            .collect();

        for o in &outcomes {
            match &o.error {
                None => tracing::info!(
                    agent = %o.agent,
                    count = o.records.len(),
                    elapsed_ms = o.elapsed.as_millis() as u64,
                    "agent fetch completed"
                ),
                Some(e) => tracing::warn!(
                    agent = %o.agent,
                    error = %e,
                    elapsed_ms = o.elapsed.as_millis() as u64,
                    "agent fetch failed"
                ),
            }
        }
        outcomes
    }
}

/// Acquire a limiter token, then fetch, bounded by the run token and the
/// agent's own timeout.
async fn fetch_one(
    agent: &dyn SourceAgent,
    criteria: &FilterCriteria,
    limiter: &RateLimiter,
    cancel: CancellationToken,
    timeout: Option<Duration>,
) -> Result<Vec<JobRecord>, AgentError> {
    limiter.acquire(&cancel).await?;

    let fetch = agent.fetch(criteria, cancel.clone());
    let bounded = async {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or(Err(AgentError::TimedOut(limit))),
            None => fetch.await,
        }
    };

    tokio::select! {
        res = bounded => res,
        _ = cancel.cancelled() => Err(AgentError::Cancelled),
    }
}
