//! Source agents: anything that can turn filter criteria into job records.
//!
//! The orchestrator only sees `SourceAgent` trait objects. How an agent talks to
//! its upstream (JSON API, HTML pages, RSS) is its own business. Sources that
//! need a login additionally expose `AuthenticatedAgent` through
//! `SourceAgent::as_authenticated`, which the registry checks before a run.

mod gated;
mod mock;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;
use crate::model::{FilterCriteria, JobRecord};

pub use gated::GatedAgent;
pub use mock::MockAgent;

/// Opaque key/value credentials (e.g. `username`, `password`, `api_key`).
pub type Credentials = HashMap<String, String>;

/// A single upstream job source.
#[async_trait]
pub trait SourceAgent: Send + Sync {
    /// Stable agent name, used in outcomes and logs.
    fn name(&self) -> &str;

    /// Fetch postings matching `criteria`.
    ///
    /// Implementations must watch `cancel` and return `AgentError::Cancelled`
    /// promptly once it fires instead of continuing to use the shared budget.
    async fn fetch(
        &self,
        criteria: &FilterCriteria,
        cancel: CancellationToken,
    ) -> Result<Vec<JobRecord>, AgentError>;

    /// Authentication capability, for sources behind a login.
    fn as_authenticated(&self) -> Option<&dyn AuthenticatedAgent> {
        None
    }
}

/// Extra capability of sources that need credentials before `fetch` works.
#[async_trait]
pub trait AuthenticatedAgent: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AgentError>;

    fn is_authenticated(&self) -> bool;
}
