//! Predicate evaluation for `FilterCriteria`.

use crate::model::{FilterCriteria, JobRecord};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns true if `job` satisfies every constraint set on `criteria`.
///
/// Salary bounds treat missing data as a mismatch: a record without `salary_min`
/// never passes a `min_salary` filter.
pub(crate) fn matches(job: &JobRecord, criteria: &FilterCriteria) -> bool {
    if let Some(title) = criteria.title.as_deref().filter(|t| !t.is_empty()) {
        if !contains_ci(&job.title, title) {
            return false;
        }
    }

    if !criteria.keywords.is_empty() {
        let text = format!("{} {} {}", job.title, job.description, job.skills.join(" "))
            .to_lowercase();
        if !criteria
            .keywords
            .iter()
            .any(|k| text.contains(&k.to_lowercase()))
        {
            return false;
        }
    }

    if let Some(location) = criteria.location.as_deref().filter(|l| !l.is_empty()) {
        if !contains_ci(&job.location, location) {
            return false;
        }
    }

    if !criteria.locations.is_empty()
        && !criteria
            .locations
            .iter()
            .any(|l| contains_ci(&job.location, l))
    {
        return false;
    }

    if criteria.remote_only && !contains_ci(job.remote_mode.as_str(), "remote") {
        return false;
    }

    if let Some(min) = criteria.min_salary {
        match job.salary_min {
            Some(have) if have >= min => {}
            _ => return false,
        }
    }
    if let Some(max) = criteria.max_salary {
        match job.salary_max {
            Some(have) if have <= max => {}
            _ => return false,
        }
    }

    if let Some(level) = criteria.experience_level {
        if !job.experience_level.as_str().eq_ignore_ascii_case(level.as_str()) {
            return false;
        }
    }

    if let Some(degree) = criteria.degree_required {
        if job.degree_required != degree {
            return false;
        }
    }

    criteria.skills.iter().all(|s| job.has_skill(s))
}
