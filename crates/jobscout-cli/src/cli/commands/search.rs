//! `jobscout search` – fan out to every enabled source, merge into a store and
//! print the filtered page with its analytics.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use jobscout_core::agent::{GatedAgent, MockAgent, SourceAgent};
use jobscout_core::config::JobscoutConfig;
use jobscout_core::registry::{AgentConfig, AgentKind, AgentRegistry};
use jobscout_core::scheduler::OutcomeSummary;
use jobscout_core::{merge, AgentError, AnalyticsSummary, JobRecord, JobStore, Orchestrator, SearchResponse};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::SearchArgs;

/// What `--json` prints: per-source outcomes plus the search response.
#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    outcomes: Vec<OutcomeSummary>,
    inserted: usize,
    #[serde(flatten)]
    response: &'a SearchResponse,
}

fn demo_agent(config: &AgentConfig) -> Result<Arc<dyn SourceAgent>, AgentError> {
    let mut agent = MockAgent::new(config.agent_name());
    if let Some(url) = &config.base_url {
        agent = agent.with_base_url(url.clone());
    }
    Ok(Arc::new(agent))
}

fn demo_gated_agent(config: &AgentConfig) -> Result<Arc<dyn SourceAgent>, AgentError> {
    Ok(Arc::new(GatedAgent::new(demo_agent(config)?)))
}

/// Registry over `cfg.agents` where every kind is served by the synthetic
/// source; login-gated kinds are wrapped so credentials are still checked.
pub fn build_registry(cfg: &JobscoutConfig) -> AgentRegistry {
    AgentRegistry::new(cfg.agents.iter().cloned())
        .with_kind_factory(AgentKind::Api, demo_agent)
        .with_kind_factory(AgentKind::Public, demo_agent)
        .with_kind_factory(AgentKind::Mock, demo_agent)
        .with_kind_factory(AgentKind::Authenticated, demo_gated_agent)
}

pub async fn run_search(cfg: &JobscoutConfig, args: &SearchArgs) -> Result<()> {
    let registry = build_registry(cfg);
    for name in &args.enable {
        registry.enable(name)?;
    }
    for name in &args.disable {
        registry.disable(name)?;
    }

    let limiter = cfg.rate_limit.build()?;
    let orchestrator = Orchestrator::new(Arc::new(registry), Arc::new(limiter));
    let deadline = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| cfg.run_timeout());
    let criteria = args.criteria(cfg.default_limit);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling run");
            on_signal.cancel();
        }
    });

    let outcomes = orchestrator
        .run_all_with_cancel(&criteria, deadline, &cancel)
        .await;
    signal_task.abort();

    let store = JobStore::new();
    let inserted = store.store(merge(&outcomes));
    let response = store.search(&criteria);
    let summaries: Vec<OutcomeSummary> = outcomes.iter().map(OutcomeSummary::from).collect();
    tracing::info!(
        agents = summaries.len(),
        inserted,
        matched = response.total,
        "search finished"
    );

    if args.json {
        let output = SearchOutput {
            outcomes: summaries,
            inserted,
            response: &response,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_outcomes(&summaries);
    println!();
    print_jobs(&response);
    println!();
    print_analytics(&response.analytics);
    Ok(())
}

fn print_outcomes(outcomes: &[OutcomeSummary]) {
    if outcomes.is_empty() {
        println!("No active agents.");
        return;
    }
    println!("{:<16} {:<6} {:<10} {}", "AGENT", "JOBS", "ELAPSED", "RESULT");
    for o in outcomes {
        let result = o.error.as_deref().unwrap_or("ok");
        println!(
            "{:<16} {:<6} {:<10} {}",
            o.agent,
            o.count,
            format!("{}ms", o.elapsed_ms),
            result
        );
    }
}

fn salary_cell(job: &JobRecord) -> String {
    match (job.salary_min, job.salary_max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!("{min}+"),
        (None, Some(max)) => format!("<={max}"),
        (None, None) => "-".to_string(),
    }
}

fn print_jobs(response: &SearchResponse) {
    if response.jobs.is_empty() {
        println!("No matching jobs ({} total).", response.total);
        return;
    }
    println!(
        "{:<10} {:<28} {:<22} {:<20} {:<14} {}",
        "POSTED", "TITLE", "COMPANY", "LOCATION", "SALARY", "SOURCE"
    );
    for job in &response.jobs {
        println!(
            "{:<10} {:<28} {:<22} {:<20} {:<14} {}",
            job.posted_at.format("%Y-%m-%d"),
            truncate(&job.title, 28),
            truncate(&job.company, 22),
            truncate(&job.location, 20),
            salary_cell(job),
            job.source
        );
    }
    println!(
        "showing {} of {} (offset {})",
        response.jobs.len(),
        response.total,
        response.criteria.offset.min(response.total)
    );
}

fn print_analytics(a: &AnalyticsSummary) {
    println!("matched jobs:   {}", a.total_jobs);
    if a.average_salary > 0.0 {
        println!("average salary: {:.0}", a.average_salary);
        println!(
            "salary range:   {:.0} / p25 {:.0} / median {:.0} / p75 {:.0} / {:.0}",
            a.salary_range.min,
            a.salary_range.p25,
            a.salary_range.median,
            a.salary_range.p75,
            a.salary_range.max
        );
    }
    if !a.top_skills.is_empty() {
        let skills: Vec<String> = a
            .top_skills
            .iter()
            .map(|s| format!("{} ({})", s.name, s.count))
            .collect();
        println!("top skills:     {}", skills.join(", "));
    }
    if !a.top_companies.is_empty() {
        let companies: Vec<String> = a
            .top_companies
            .iter()
            .map(|c| format!("{} ({})", c.name, c.count))
            .collect();
        println!("top companies:  {}", companies.join(", "));
    }
    for (label, dist) in [
        ("experience:", &a.experience_levels),
        ("remote mode:", &a.remote_modes),
        ("degree:", &a.degree_requirements),
    ] {
        if dist.is_empty() {
            continue;
        }
        let parts: Vec<String> = dist.iter().map(|(k, v)| format!("{k} {v}")).collect();
        println!("{:<15} {}", label, parts.join(", "));
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
