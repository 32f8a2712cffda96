//! Tests for JobStore merge, search and pagination.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::error::CoreError;
use crate::model::{ExperienceLevel, FilterCriteria, JobRecord, RemoteMode};

use super::JobStore;

fn job(n: i64, url: &str, skills: &[&str]) -> JobRecord {
    JobRecord {
        id: format!("job-{n}"),
        title: format!("Engineer {n}"),
        company: "Acme".into(),
        location: "Remote".into(),
        description: "Platform work".into(),
        requirements: vec![],
        skills: skills.iter().map(|s| s.to_string()).collect(),
        salary_min: None,
        salary_max: None,
        salary_currency: None,
        degree_required: false,
        experience_level: ExperienceLevel::Mid,
        remote_mode: RemoteMode::Remote,
        posted_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::days(n),
        url: url.to_string(),
        source: "fixture".into(),
        company_size: None,
        industry: None,
        benefits: vec![],
    }
}

fn seeded(n: i64) -> JobStore {
    let store = JobStore::new();
    store.store((0..n).map(|i| job(i, &format!("https://jobs.test/{i}"), &[])));
    store
}

#[test]
fn duplicate_urls_are_ignored_across_batches() {
    let store = JobStore::new();
    let first = job(1, "https://jobs.test/same", &[]);
    let mut second = job(2, "https://jobs.test/same", &[]);
    second.title = "Changed title".into();

    assert_eq!(store.store(vec![first.clone()]), 1);
    assert_eq!(store.store(vec![second]), 0);
    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].title, first.title);
}

#[test]
fn duplicate_urls_are_ignored_within_a_batch() {
    let store = JobStore::new();
    let inserted = store.store(vec![
        job(1, "https://jobs.test/a", &[]),
        job(2, "https://jobs.test/a", &[]),
        job(3, "https://jobs.test/b", &[]),
    ]);
    assert_eq!(inserted, 2);
    assert_eq!(store.len(), 2);
}

#[test]
fn search_orders_newest_first() {
    let store = JobStore::new();
    store.store(vec![
        job(1, "https://jobs.test/1", &[]),
        job(5, "https://jobs.test/5", &[]),
        job(3, "https://jobs.test/3", &[]),
    ]);
    let resp = store.search(&FilterCriteria::default());
    let ids: Vec<_> = resp.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["job-5", "job-3", "job-1"]);
    assert_eq!(resp.total, 3);
}

#[test]
fn skills_and_keywords_semantics() {
    let store = JobStore::new();
    store.store(vec![
        job(1, "https://jobs.test/both", &["Go", "Docker"]),
        job(2, "https://jobs.test/go", &["Go"]),
        job(3, "https://jobs.test/java", &["Java"]),
    ]);

    let skills = store.search(&FilterCriteria::new().with_skills(["Go", "Docker"]));
    assert_eq!(skills.total, 1);
    assert_eq!(skills.jobs[0].id, "job-1");

    let keywords = store.search(&FilterCriteria::new().with_keywords(["Go", "Java"]));
    assert_eq!(keywords.total, 3);
}

#[test]
fn missing_min_salary_fails_min_filter() {
    let store = JobStore::new();
    let mut paid = job(1, "https://jobs.test/paid", &[]);
    paid.salary_min = Some(60_000);
    store.store(vec![paid, job(2, "https://jobs.test/unpaid", &[])]);

    let resp = store.search(&FilterCriteria {
        min_salary: Some(50_000),
        ..Default::default()
    });
    assert_eq!(resp.total, 1);
    assert_eq!(resp.jobs[0].id, "job-1");
}

#[test]
fn offset_beyond_total_returns_empty_page() {
    let store = seeded(5);
    let resp = store.search(&FilterCriteria::new().with_page(10, 3));
    assert!(resp.jobs.is_empty());
    assert_eq!(resp.total, 5);
    assert_eq!(resp.analytics.total_jobs, 5);
}

#[test]
fn zero_limit_returns_rest_from_offset() {
    let store = seeded(5);
    let resp = store.search(&FilterCriteria::new().with_page(2, 0));
    assert_eq!(resp.jobs.len(), 3);
    assert_eq!(resp.jobs[0].id, "job-2");

    let page = store.search(&FilterCriteria::new().with_page(1, 2));
    let ids: Vec<_> = page.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["job-3", "job-2"]);
}

#[test]
fn repeated_searches_are_identical() {
    let store = JobStore::new();
    let mut records = Vec::new();
    for i in 0..8 {
        let mut r = job(i % 3, &format!("https://jobs.test/{i}"), &["Rust", "Go"]);
        r.salary_min = Some(50_000 + i as u64 * 1_000);
        r.company = format!("Company {}", i % 4);
        records.push(r);
    }
    store.store(records);

    let criteria = FilterCriteria::new().with_keywords(["engineer"]).with_page(1, 4);
    let a = serde_json::to_string(&store.search(&criteria)).unwrap();
    let b = serde_json::to_string(&store.search(&criteria)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn clear_empties_records_and_url_index() {
    let store = seeded(3);
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.search(&FilterCriteria::default()).total, 0);
    assert_eq!(store.store(vec![job(0, "https://jobs.test/0", &[])]), 1);
}

#[test]
fn get_by_id() {
    let store = seeded(2);
    assert_eq!(store.get("job-1").unwrap().url, "https://jobs.test/1");
    assert!(matches!(store.get("job-9"), Err(CoreError::JobNotFound(id)) if id == "job-9"));
}

#[test]
fn concurrent_writers_keep_one_record_per_url() {
    let store = Arc::new(JobStore::new());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..50 {
                    store.store(vec![job(i, &format!("https://jobs.test/{i}"), &[])]);
                    if t == 0 {
                        let _ = store.search(&FilterCriteria::default());
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.len(), 50);
}
