use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seniority bucket of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
        }
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteMode {
    #[default]
    Onsite,
    Remote,
    Hybrid,
}

impl RemoteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteMode::Onsite => "onsite",
            RemoteMode::Remote => "remote",
            RemoteMode::Hybrid => "hybrid",
        }
    }
}

/// Error for an unrecognised experience level or remote mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised value: {}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for ExperienceLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl FromStr for RemoteMode {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onsite" => Ok(RemoteMode::Onsite),
            "remote" => Ok(RemoteMode::Remote),
            "hybrid" => Ok(RemoteMode::Hybrid),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RemoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized job posting.
///
/// Records are immutable once merged into the store; `url` is the dedup key, so a
/// changed posting shows up as a new record only if its URL changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Skill tags in the order the source listed them.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_currency: Option<String>,
    pub degree_required: bool,
    pub experience_level: ExperienceLevel,
    pub remote_mode: RemoteMode,
    pub posted_at: DateTime<Utc>,
    pub url: String,
    /// Name of the agent that produced the record.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl JobRecord {
    /// Single salary figure used for aggregate statistics: the midpoint when both
    /// bounds are known, otherwise whichever bound is present.
    pub fn representative_salary(&self) -> Option<f64> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some((min as f64 + max as f64) / 2.0),
            (Some(min), None) => Some(min as f64),
            (None, Some(max)) => Some(max as f64),
            (None, None) => None,
        }
    }

    /// True if any skill tag equals `skill`, ignoring case.
    pub fn has_skill(&self, skill: &str) -> bool {
        let skill = skill.to_lowercase();
        self.skills.iter().any(|s| s.to_lowercase() == skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(min: Option<u64>, max: Option<u64>) -> JobRecord {
        JobRecord {
            id: "r-1".into(),
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            location: "Berlin".into(),
            description: String::new(),
            requirements: vec![],
            skills: vec!["Rust".into(), "Docker".into()],
            salary_min: min,
            salary_max: max,
            salary_currency: Some("EUR".into()),
            degree_required: false,
            experience_level: ExperienceLevel::Mid,
            remote_mode: RemoteMode::Hybrid,
            posted_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            url: "https://acme.example/jobs/1".into(),
            source: "fixture".into(),
            company_size: None,
            industry: None,
            benefits: vec![],
        }
    }

    #[test]
    fn representative_salary_prefers_midpoint() {
        assert_eq!(record(Some(60_000), Some(80_000)).representative_salary(), Some(70_000.0));
        assert_eq!(record(Some(60_000), None).representative_salary(), Some(60_000.0));
        assert_eq!(record(None, Some(90_000)).representative_salary(), Some(90_000.0));
        assert_eq!(record(None, None).representative_salary(), None);
    }

    #[test]
    fn skill_match_ignores_case() {
        let r = record(None, None);
        assert!(r.has_skill("rust"));
        assert!(r.has_skill("DOCKER"));
        assert!(!r.has_skill("go"));
    }

    #[test]
    fn skill_match_folds_non_ascii_case() {
        let mut r = record(None, None);
        r.skills = vec!["Ölsysteme".into()];
        assert!(r.has_skill("ölsysteme"));
        assert!(r.has_skill("ÖLSYSTEME"));
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!("Senior".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Senior);
        assert_eq!(" remote ".parse::<RemoteMode>().unwrap(), RemoteMode::Remote);
        assert!("principal".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn serializes_enums_lowercase() {
        let json = serde_json::to_value(record(Some(1), None)).unwrap();
        assert_eq!(json["experience_level"], "mid");
        assert_eq!(json["remote_mode"], "hybrid");
        assert!(json.get("salary_max").is_none());
    }
}
