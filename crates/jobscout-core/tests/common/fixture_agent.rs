//! Scripted source agent for orchestrator tests.
//!
//! Returns a fixed record set (or a fixed error) after an optional delay. The
//! delay can either honour the cancellation token, like a well-behaved agent,
//! or ignore it to model an agent stuck in I/O. A panicking variant models a
//! buggy agent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jobscout_core::agent::SourceAgent;
use jobscout_core::{AgentError, ExperienceLevel, FilterCriteria, JobRecord, RemoteMode};
use tokio_util::sync::CancellationToken;

pub struct FixtureAgent {
    name: String,
    result: Result<Vec<JobRecord>, AgentError>,
    delay: Duration,
    ignore_cancel: bool,
    panics: bool,
    pub calls: Arc<AtomicUsize>,
}

impl FixtureAgent {
    pub fn ok(name: &str, records: Vec<JobRecord>) -> Self {
        Self {
            name: name.to_string(),
            result: Ok(records),
            delay: Duration::ZERO,
            ignore_cancel: false,
            panics: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str, error: AgentError) -> Self {
        Self {
            result: Err(error),
            ..Self::ok(name, Vec::new())
        }
    }

    /// Agent whose fetch panics, taking its task down with it.
    pub fn panicking(name: &str) -> Self {
        Self {
            panics: true,
            ..Self::ok(name, Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ignoring_cancel(mut self) -> Self {
        self.ignore_cancel = true;
        self
    }
}

#[async_trait]
impl SourceAgent for FixtureAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(
        &self,
        _criteria: &FilterCriteria,
        cancel: CancellationToken,
    ) -> Result<Vec<JobRecord>, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics {
            panic!("{} fetch blew up", self.name);
        }
        if !self.delay.is_zero() {
            if self.ignore_cancel {
                tokio::time::sleep(self.delay).await;
            } else {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        }
        self.result.clone()
    }
}

/// Record with a URL unique to `(source, n)` and a timestamp increasing with `n`.
pub fn record(source: &str, n: u32) -> JobRecord {
    JobRecord {
        id: format!("{source}-{n}"),
        title: format!("Engineer {n}"),
        company: format!("{source} Corp"),
        location: "Remote".into(),
        description: "Fixture posting".into(),
        requirements: vec![],
        skills: vec!["Rust".into()],
        salary_min: Some(50_000 + u64::from(n) * 10_000),
        salary_max: None,
        salary_currency: Some("USD".into()),
        degree_required: false,
        experience_level: ExperienceLevel::Mid,
        remote_mode: RemoteMode::Remote,
        posted_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(n as i64),
        url: format!("https://{}.test/jobs/{n}", source.to_lowercase()),
        source: source.to_string(),
        company_size: None,
        industry: None,
        benefits: vec![],
    }
}

pub fn records(source: &str, count: u32) -> Vec<JobRecord> {
    (0..count).map(|n| record(source, n)).collect()
}
