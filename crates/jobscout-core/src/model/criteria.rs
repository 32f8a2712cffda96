use serde::{Deserialize, Serialize};

use super::job::ExperienceLevel;

/// Sparse search predicate. Every field is optional and an absent field places
/// no constraint. Multi-valued fields match if ANY value matches (except
/// `skills`, which requires ALL); fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substrings searched in title, description and skills.
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub locations: Vec<String>,
    pub remote_only: bool,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub experience_level: Option<ExperienceLevel>,
    /// `None` = any, `Some(true)` = required, `Some(false)` = not required.
    pub degree_required: Option<bool>,
    /// Every listed skill must be present on the record.
    pub skills: Vec<String>,
    /// Page size; 0 means everything from `offset`.
    pub limit: usize,
    pub offset: usize,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }
}
