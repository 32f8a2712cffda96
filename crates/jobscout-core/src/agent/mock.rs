//! Demo source producing synthetic but deterministic postings.
//!
//! Stands in for a real transport when none is configured, and gives tests a
//! source whose output is known in advance.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;
use crate::model::{ExperienceLevel, FilterCriteria, JobRecord, RemoteMode};

use super::SourceAgent;

struct Template {
    titles: &'static [&'static str],
    companies: &'static [&'static str],
    locations: &'static [&'static str],
    /// Salary band per experience level, indexed like `LEVELS`.
    salaries: [(u64, u64); 4],
    skills: &'static [&'static [&'static str]],
    remote: &'static [RemoteMode],
    industries: &'static [&'static str],
}

const LEVELS: [ExperienceLevel; 4] = [
    ExperienceLevel::Entry,
    ExperienceLevel::Mid,
    ExperienceLevel::Senior,
    ExperienceLevel::Lead,
];

const TEMPLATES: &[Template] = &[
    Template {
        titles: &[
            "Backend Developer",
            "Go Developer",
            "Full Stack Developer",
            "Software Engineer",
            "DevOps Engineer",
            "Data Scientist",
            "Frontend Developer",
        ],
        companies: &[
            "TechCorp Inc",
            "CloudTech Solutions",
            "DataFlow Systems",
            "ScaleUp Technologies",
            "CodeCraft Solutions",
        ],
        locations: &[
            "San Francisco, CA",
            "Remote",
            "Austin, TX",
            "Berlin, Germany",
            "Remote - US",
        ],
        salaries: [(60_000, 90_000), (80_000, 120_000), (110_000, 160_000), (140_000, 200_000)],
        skills: &[
            &["Go", "Docker", "Kubernetes", "PostgreSQL"],
            &["Python", "Django", "AWS", "Redis"],
            &["JavaScript", "React", "Node.js", "GraphQL"],
            &["Rust", "Linux", "gRPC"],
        ],
        remote: &[RemoteMode::Remote, RemoteMode::Hybrid, RemoteMode::Onsite],
        industries: &["Technology", "SaaS", "Cloud Computing"],
    },
    Template {
        titles: &[
            "Financial Analyst",
            "Accountant",
            "Risk Analyst",
            "Compliance Officer",
        ],
        companies: &["First National Bank", "Capital Management", "Wealth Management"],
        locations: &["New York, NY", "Chicago, IL", "Remote", "Charlotte, NC"],
        salaries: [(50_000, 70_000), (70_000, 95_000), (90_000, 125_000), (120_000, 170_000)],
        skills: &[
            &["Excel", "Financial Modeling", "SQL", "Python"],
            &["Risk Management", "Compliance", "Auditing"],
        ],
        remote: &[RemoteMode::Onsite, RemoteMode::Hybrid, RemoteMode::Remote],
        industries: &["Finance", "Banking", "Insurance"],
    },
];

/// Synthetic job source. Output depends only on the agent name, the configured
/// count and the anchor timestamp, so two runs produce the same records.
#[derive(Debug, Clone)]
pub struct MockAgent {
    name: String,
    base_url: String,
    count: usize,
    latency: Duration,
    anchor: DateTime<Utc>,
}

impl MockAgent {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let base_url = format!("https://{}.example", name.to_lowercase());
        Self {
            name,
            base_url,
            count: 20,
            latency: Duration::ZERO,
            anchor: Utc::now(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Simulated upstream latency before records are returned.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Timestamp of the newest generated posting; older ones step back an hour each.
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    fn generate(&self, index: usize) -> JobRecord {
        let t = &TEMPLATES[index % TEMPLATES.len()];
        let n = index / TEMPLATES.len();
        let level_idx = n % LEVELS.len();
        let level = LEVELS[level_idx];
        let title = t.titles[n % t.titles.len()];
        let title = match level {
            ExperienceLevel::Entry => format!("Junior {title}"),
            ExperienceLevel::Senior => format!("Senior {title}"),
            ExperienceLevel::Lead => format!("Lead {title}"),
            ExperienceLevel::Mid => title.to_string(),
        };
        let company = t.companies[(index * 7) % t.companies.len()];
        let skills: Vec<String> = t.skills[n % t.skills.len()]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (salary_min, salary_max) = t.salaries[level_idx];
        // Every fifth posting omits pay, as many real listings do.
        let (salary_min, salary_max) = if index % 5 == 4 {
            (None, None)
        } else {
            (Some(salary_min), Some(salary_max))
        };
        let degree_required = matches!(level, ExperienceLevel::Senior | ExperienceLevel::Lead);

        JobRecord {
            id: format!("{}-{}", self.name.to_lowercase(), index),
            description: format!(
                "{company} is hiring a {title}. You will work with {}.",
                skills.join(", ")
            ),
            title,
            company: company.to_string(),
            location: t.locations[(index * 3) % t.locations.len()].to_string(),
            requirements: vec![format!("Experience with {}", skills[0])],
            skills,
            salary_min,
            salary_max,
            salary_currency: salary_min.map(|_| "USD".to_string()),
            degree_required,
            experience_level: level,
            remote_mode: t.remote[index % t.remote.len()],
            posted_at: self.anchor - chrono::Duration::hours(index as i64),
            url: format!("{}/jobs/{}", self.base_url, index),
            source: self.name.clone(),
            company_size: None,
            industry: Some(t.industries[n % t.industries.len()].to_string()),
            benefits: vec!["Health Insurance".into(), "Flexible Hours".into()],
        }
    }
}

#[async_trait]
impl SourceAgent for MockAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(
        &self,
        criteria: &FilterCriteria,
        cancel: CancellationToken,
    ) -> Result<Vec<JobRecord>, AgentError> {
        if !self.latency.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                _ = tokio::time::sleep(self.latency) => {}
            }
        }
        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        // Sources typically only honour the text part of a query upstream.
        let upstream = FilterCriteria {
            title: criteria.title.clone(),
            keywords: criteria.keywords.clone(),
            ..Default::default()
        };
        let jobs: Vec<JobRecord> = (0..self.count)
            .map(|i| self.generate(i))
            .filter(|job| crate::store::matches_criteria(job, &upstream))
            .collect();
        tracing::debug!(agent = %self.name, generated = self.count, kept = jobs.len(), "mock fetch");
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn agent() -> MockAgent {
        MockAgent::new("Demo")
            .with_count(24)
            .with_anchor(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn output_is_deterministic_with_unique_urls() {
        let a = agent().fetch(&FilterCriteria::default(), CancellationToken::new()).await.unwrap();
        let b = agent().fetch(&FilterCriteria::default(), CancellationToken::new()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
        let urls: HashSet<_> = a.iter().map(|j| j.url.as_str()).collect();
        assert_eq!(urls.len(), 24);
        assert!(a.iter().all(|j| j.source == "Demo"));
        assert!(a[0].url.starts_with("https://demo.example/jobs/"));
    }

    #[tokio::test]
    async fn title_filter_applied_upstream() {
        let jobs = agent()
            .fetch(&FilterCriteria::new().with_title("analyst"), CancellationToken::new())
            .await
            .unwrap();
        assert!(!jobs.is_empty());
        assert!(jobs.iter().all(|j| j.title.to_lowercase().contains("analyst")));
    }

    #[tokio::test]
    async fn some_postings_have_no_salary() {
        let jobs = agent().fetch(&FilterCriteria::default(), CancellationToken::new()).await.unwrap();
        assert!(jobs.iter().any(|j| j.salary_min.is_none()));
        assert!(jobs.iter().any(|j| j.salary_min.is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_honours_cancellation() {
        let agent = agent().with_latency(Duration::from_secs(30));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });
        let res = agent.fetch(&FilterCriteria::default(), cancel).await;
        assert_eq!(res, Err(AgentError::Cancelled));
    }
}
