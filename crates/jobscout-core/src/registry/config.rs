use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agent::Credentials;

/// How a source is reached. Drives which factory builds the agent when no
/// name-specific factory is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// JSON API.
    Api,
    /// Public HTML or RSS pages.
    Public,
    /// Needs a login before fetching.
    Authenticated,
    /// Synthetic demo data.
    Mock,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentKind::Api => "api",
            AgentKind::Public => "public",
            AgentKind::Authenticated => "authenticated",
            AgentKind::Mock => "mock",
        };
        f.write_str(s)
    }
}

/// Registry entry for one source (an `[[agents]]` table in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Registry key, e.g. `remoteok`.
    pub name: String,
    /// Human-facing name used as the agent/source name, e.g. `RemoteOK`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub enabled: bool,
    pub kind: AgentKind,
    /// Upstream request budget in requests per minute.
    pub rate_limit_per_min: u32,
    /// Per-agent fetch timeout; the run deadline still applies when shorter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Credentials::is_empty")]
    pub credentials: Credentials,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, kind: AgentKind) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            enabled: true,
            kind,
            rate_limit_per_min: 30,
            timeout_secs: None,
            requires_auth: kind == AgentKind::Authenticated,
            base_url: None,
            credentials: Credentials::new(),
        }
    }

    /// Name agents built from this entry should report.
    pub fn agent_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn status(&self) -> AgentStatus {
        if !self.enabled {
            AgentStatus::Disabled
        } else if self.requires_auth {
            AgentStatus::RequiresAuth
        } else {
            AgentStatus::Active
        }
    }
}

/// Coarse state shown to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    RequiresAuth,
    Disabled,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentStatus::Active => "active",
            AgentStatus::RequiresAuth => "requires_auth",
            AgentStatus::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

/// Built-in source list, mirroring the sites the aggregator knows about.
/// Login-gated sources start disabled.
pub fn default_agents() -> Vec<AgentConfig> {
    fn entry(
        name: &str,
        display: &str,
        kind: AgentKind,
        enabled: bool,
        rate: u32,
        url: &str,
    ) -> AgentConfig {
        AgentConfig {
            display_name: Some(display.to_string()),
            enabled,
            rate_limit_per_min: rate,
            timeout_secs: Some(30),
            base_url: Some(url.to_string()),
            ..AgentConfig::new(name, kind)
        }
    }

    vec![
        entry("remoteok", "RemoteOK", AgentKind::Api, true, 30, "https://remoteok.io"),
        entry(
            "weworkremotely",
            "WeWorkRemotely",
            AgentKind::Public,
            true,
            20,
            "https://weworkremotely.com",
        ),
        entry(
            "linkedin",
            "LinkedIn",
            AgentKind::Authenticated,
            false,
            10,
            "https://linkedin.com",
        ),
        entry(
            "jobstreet",
            "JobStreet",
            AgentKind::Authenticated,
            false,
            15,
            "https://id.jobstreet.com",
        ),
        entry("indeed", "Indeed", AgentKind::Public, true, 10, "https://indeed.com"),
        entry("mock", "MockJobSite", AgentKind::Mock, true, 60, "https://mock-job-site.com"),
    ]
}
