//! Statistics over an arbitrary set of job records.
//!
//! Nothing here is cached: the summary is recomputed from whatever slice the
//! caller passes, which is either the whole store or a filtered view.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::JobRecord;

/// Number of entries kept in the skill and company rankings.
pub const TOP_N: usize = 10;

/// Salary distribution over the representative salaries of a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
}

/// One entry of a frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_jobs: usize,
    /// Mean of representative salaries; 0 when no record carries a salary.
    pub average_salary: f64,
    pub salary_range: SalaryRange,
    pub top_skills: Vec<RankedCount>,
    pub top_companies: Vec<RankedCount>,
    pub experience_levels: BTreeMap<String, usize>,
    pub remote_modes: BTreeMap<String, usize>,
    pub degree_requirements: BTreeMap<String, usize>,
    pub locations: BTreeMap<String, usize>,
    pub industries: BTreeMap<String, usize>,
}

/// Frequency counter that remembers the order in which keys first appeared.
#[derive(Default)]
struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl OrderedCounter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    /// Count-descending ranking; the stable sort keeps first-seen order for ties.
    fn top(mut self, n: usize) -> Vec<RankedCount> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
            .into_iter()
            .take(n)
            .map(|(name, count)| RankedCount { name, count })
            .collect()
    }
}

/// Linear-interpolated percentile over an ascending-sorted sample.
///
/// `p` is in `[0, 100]`. An empty sample yields 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let index = p / 100.0 * (n - 1) as f64;
            let lower = index.floor() as usize;
            let upper = index.ceil() as usize;
            if upper >= n {
                return sorted[n - 1];
            }
            let weight = index - lower as f64;
            sorted[lower] * (1.0 - weight) + sorted[upper] * weight
        }
    }
}

/// Compute the summary for `jobs`.
pub fn analytics(jobs: &[JobRecord]) -> AnalyticsSummary {
    if jobs.is_empty() {
        return AnalyticsSummary::default();
    }

    let mut summary = AnalyticsSummary {
        total_jobs: jobs.len(),
        ..Default::default()
    };
    let mut skills = OrderedCounter::default();
    let mut companies = OrderedCounter::default();
    let mut salaries = Vec::new();

    for job in jobs {
        *summary
            .experience_levels
            .entry(job.experience_level.as_str().to_string())
            .or_insert(0) += 1;
        *summary
            .remote_modes
            .entry(job.remote_mode.as_str().to_string())
            .or_insert(0) += 1;
        let degree = if job.degree_required {
            "Required"
        } else {
            "Not Required"
        };
        *summary
            .degree_requirements
            .entry(degree.to_string())
            .or_insert(0) += 1;
        if !job.location.is_empty() {
            *summary.locations.entry(job.location.clone()).or_insert(0) += 1;
        }
        if let Some(industry) = job.industry.as_deref().filter(|i| !i.is_empty()) {
            *summary.industries.entry(industry.to_string()).or_insert(0) += 1;
        }

        for skill in &job.skills {
            skills.add(skill);
        }
        if !job.company.is_empty() {
            companies.add(&job.company);
        }
        if let Some(salary) = job.representative_salary() {
            salaries.push(salary);
        }
    }

    if !salaries.is_empty() {
        salaries.sort_by(f64::total_cmp);
        summary.average_salary = salaries.iter().sum::<f64>() / salaries.len() as f64;
        summary.salary_range = SalaryRange {
            min: salaries[0],
            max: salaries[salaries.len() - 1],
            median: percentile(&salaries, 50.0),
            p25: percentile(&salaries, 25.0),
            p75: percentile(&salaries, 75.0),
        };
    }

    summary.top_skills = skills.top(TOP_N);
    summary.top_companies = companies.top(TOP_N);
    summary
}
