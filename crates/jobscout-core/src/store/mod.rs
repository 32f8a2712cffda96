//! In-memory job store.
//!
//! Holds the merged postings of every run in this process, deduplicated by URL.
//! A single `RwLock` guards both the record list and the URL index so they can
//! never disagree; searches take the read side and may run concurrently.

mod analytics;
mod filter;

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::model::{FilterCriteria, JobRecord};

pub use analytics::{analytics, percentile, AnalyticsSummary, RankedCount, SalaryRange, TOP_N};
pub(crate) use filter::matches as matches_criteria;

/// Result of `JobStore::search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The requested page, newest first.
    pub jobs: Vec<JobRecord>,
    /// Number of matches before pagination.
    pub total: usize,
    /// Statistics over all matches, not just the page.
    pub analytics: AnalyticsSummary,
    pub criteria: FilterCriteria,
}

#[derive(Debug, Default)]
struct Inner {
    jobs: Vec<JobRecord>,
    urls: HashSet<String>,
}

/// Thread-safe, append-only collection of job records keyed by URL.
#[derive(Debug, Default)]
pub struct JobStore {
    inner: RwLock<Inner>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic in another thread cannot leave `Inner` half-updated (inserts push
    // the URL and the record together), so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge `records` into the store. A record whose URL is already present
    /// (from an earlier call or earlier in this batch) is skipped; the first
    /// entry wins. Returns the number of records actually inserted.
    pub fn store<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = JobRecord>,
    {
        let mut inner = self.write();
        let mut inserted = 0;
        for record in records {
            if inner.urls.contains(&record.url) {
                continue;
            }
            inner.urls.insert(record.url.clone());
            inner.jobs.push(record);
            inserted += 1;
        }
        tracing::debug!(inserted, total = inner.jobs.len(), "stored job records");
        inserted
    }

    /// Filter, sort newest-first, paginate, and summarise the matching records.
    pub fn search(&self, criteria: &FilterCriteria) -> SearchResponse {
        let mut matched: Vec<JobRecord> = {
            let inner = self.read();
            inner
                .jobs
                .iter()
                .filter(|job| filter::matches(job, criteria))
                .cloned()
                .collect()
        };

        // Stable: equal timestamps keep insertion order, so identical searches
        // return identical pages.
        matched.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));

        let total = matched.len();
        let start = criteria.offset.min(total);
        let end = if criteria.limit == 0 {
            total
        } else {
            start.saturating_add(criteria.limit).min(total)
        };

        let analytics = analytics::analytics(&matched);
        let jobs = matched.drain(start..end).collect();

        SearchResponse {
            jobs,
            total,
            analytics,
            criteria: criteria.clone(),
        }
    }

    /// Look up a record by its id.
    pub fn get(&self, id: &str) -> Result<JobRecord> {
        self.read()
            .jobs
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| CoreError::JobNotFound(id.to_string()))
    }

    /// Summary over every stored record.
    pub fn analytics_all(&self) -> AnalyticsSummary {
        analytics::analytics(&self.read().jobs)
    }

    /// Snapshot of every stored record in insertion order.
    pub fn all(&self) -> Vec<JobRecord> {
        self.read().jobs.clone()
    }

    /// Remove every record and forget every URL.
    pub fn clear(&self) {
        let mut inner = self.write();
        let removed = inner.jobs.len();
        inner.jobs.clear();
        inner.urls.clear();
        tracing::info!(removed, "cleared job store");
    }

    pub fn len(&self) -> usize {
        self.read().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
