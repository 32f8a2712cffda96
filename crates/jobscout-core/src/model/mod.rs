//! Normalized job postings and the search predicate applied to them.
//!
//! Every source agent produces `JobRecord`s in this shape regardless of how the
//! upstream site represents a posting; the store and analytics only see this model.

mod criteria;
mod job;

pub use criteria::FilterCriteria;
pub use job::{ExperienceLevel, JobRecord, ParseLevelError, RemoteMode};
