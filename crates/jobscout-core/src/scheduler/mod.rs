//! Run scheduling: the shared rate limiter and the orchestrator that fans a
//! search out over every active agent.
//!
//! Pipeline per run: registry → active agents → (limiter token → fetch) per
//! agent in parallel → outcomes in launch order → merge → store.

mod limiter;
mod outcome;
mod run;

pub use limiter::RateLimiter;
pub use outcome::{merge, AgentOutcome, OutcomeSummary, RunReport};
pub use run::Orchestrator;
