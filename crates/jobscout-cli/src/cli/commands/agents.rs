//! `jobscout agents list|show` – inspect configured sources.

use anyhow::Result;
use jobscout_core::config::JobscoutConfig;
use jobscout_core::registry::AgentRegistry;

pub fn run_agents_list(cfg: &JobscoutConfig) -> Result<()> {
    let registry = AgentRegistry::new(cfg.agents.iter().cloned());
    let agents = registry.list();
    if agents.is_empty() {
        println!("No agents configured.");
        return Ok(());
    }
    println!(
        "{:<16} {:<16} {:<14} {:<14} {}",
        "NAME", "DISPLAY", "KIND", "STATUS", "RATE/MIN"
    );
    for a in agents {
        println!(
            "{:<16} {:<16} {:<14} {:<14} {}",
            a.name,
            a.agent_name(),
            a.kind.to_string(),
            a.status().to_string(),
            a.rate_limit_per_min
        );
    }
    Ok(())
}

pub fn run_agents_show(cfg: &JobscoutConfig, name: &str) -> Result<()> {
    let registry = AgentRegistry::new(cfg.agents.iter().cloned());
    let agent = registry.get(name)?;

    println!("name:          {}", agent.name);
    println!("display name:  {}", agent.agent_name());
    println!("kind:          {}", agent.kind);
    println!("status:        {}", agent.status());
    println!("rate limit:    {}/min", agent.rate_limit_per_min);
    match agent.timeout_secs {
        Some(secs) => println!("timeout:       {}s", secs),
        None => println!("timeout:       run deadline"),
    }
    println!("requires auth: {}", agent.requires_auth);
    if let Some(url) = &agent.base_url {
        println!("base url:      {}", url);
    }
    // Only key names; values are secrets.
    if !agent.credentials.is_empty() {
        let mut keys: Vec<&str> = agent.credentials.keys().map(String::as_str).collect();
        keys.sort_unstable();
        println!("credentials:   {}", keys.join(", "));
    }
    Ok(())
}
