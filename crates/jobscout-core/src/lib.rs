pub mod config;
pub mod error;
pub mod logging;

pub mod agent;
pub mod model;
pub mod registry;
pub mod scheduler;
pub mod store;

pub use error::{AgentError, Cancelled, CoreError};
pub use model::{ExperienceLevel, FilterCriteria, JobRecord, RemoteMode};
pub use scheduler::{merge, AgentOutcome, Orchestrator, RateLimiter};
pub use store::{analytics, AnalyticsSummary, JobStore, SearchResponse};
