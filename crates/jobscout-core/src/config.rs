use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::registry::{default_agents, AgentConfig};
use crate::scheduler::RateLimiter;

/// Global fetch budget shared by all agents (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Tokens per interval; also the burst size.
    pub rate: u32,
    /// Refill interval in milliseconds.
    pub interval_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rate: 5,
            interval_ms: 1000,
        }
    }
}

impl RateLimitConfig {
    /// Build the shared limiter. Fails for a zero rate or interval.
    pub fn build(&self) -> Result<RateLimiter> {
        RateLimiter::new(self.rate, Duration::from_millis(self.interval_ms))
            .context("invalid [rate_limit] section")
    }
}

/// Global configuration loaded from `~/.config/jobscout/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobscoutConfig {
    /// Deadline for one orchestrated run, in seconds.
    pub run_timeout_secs: u64,
    /// Page size used when a search does not ask for one.
    pub default_limit: usize,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Known sources, in launch order.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,
}

impl Default for JobscoutConfig {
    fn default() -> Self {
        Self {
            run_timeout_secs: 30,
            default_limit: 50,
            rate_limit: RateLimitConfig::default(),
            agents: default_agents(),
        }
    }
}

impl JobscoutConfig {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jobscout")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<JobscoutConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: JobscoutConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

/// Write `cfg` to `path`, creating parent directories.
pub fn save_to_path(cfg: &JobscoutConfig, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml)?;
    Ok(())
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<JobscoutConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = JobscoutConfig::default();
        save_to_path(&default_cfg, &path)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AgentKind;

    #[test]
    fn default_config_values() {
        let cfg = JobscoutConfig::default();
        assert_eq!(cfg.run_timeout_secs, 30);
        assert_eq!(cfg.default_limit, 50);
        assert_eq!(cfg.rate_limit.rate, 5);
        assert_eq!(cfg.rate_limit.interval_ms, 1000);
        assert_eq!(cfg.agents.len(), 6);
        assert!(cfg.agents.iter().any(|a| a.name == "linkedin" && !a.enabled));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = JobscoutConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: JobscoutConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.run_timeout_secs, cfg.run_timeout_secs);
        assert_eq!(parsed.agents, cfg.agents);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            run_timeout_secs = 10
            default_limit = 20

            [rate_limit]
            rate = 2
            interval_ms = 500

            [[agents]]
            name = "acme"
            enabled = true
            kind = "api"
            rate_limit_per_min = 12
            timeout_secs = 5

            [[agents]]
            name = "private-board"
            enabled = false
            kind = "authenticated"
            rate_limit_per_min = 6
            requires_auth = true
            credentials = { username = "me", password = "secret" }
        "#;
        let cfg: JobscoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.run_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.rate_limit.rate, 2);
        assert_eq!(cfg.agents.len(), 2);
        assert_eq!(cfg.agents[0].kind, AgentKind::Api);
        assert_eq!(cfg.agents[0].timeout_secs, Some(5));
        assert!(cfg.agents[1].requires_auth);
        assert_eq!(cfg.agents[1].credentials.get("username").map(String::as_str), Some("me"));
        assert!(cfg.rate_limit.build().is_ok());
    }

    #[test]
    fn missing_sections_use_defaults() {
        let toml = r#"
            run_timeout_secs = 15
            default_limit = 25
        "#;
        let cfg: JobscoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.rate_limit.rate, 5);
        assert_eq!(cfg.agents.len(), default_agents().len());
    }

    #[test]
    fn zero_rate_fails_to_build() {
        let rl = RateLimitConfig {
            rate: 0,
            interval_ms: 1000,
        };
        assert!(rl.build().is_err());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = JobscoutConfig::default();
        cfg.default_limit = 7;
        save_to_path(&cfg, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.default_limit, 7);
        assert_eq!(loaded.agents, cfg.agents);
    }
}
