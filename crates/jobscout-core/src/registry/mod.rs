//! Agent registry: which sources exist, which are enabled, and how to build them.
//!
//! The registry is an explicit value (usually behind an `Arc`) handed to the
//! orchestrator, so tests can run isolated registries side by side. Configs can
//! be toggled at runtime through `&self`; the next run sees the change.

mod config;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::agent::SourceAgent;
use crate::error::{AgentError, CoreError, Result};

pub use config::{default_agents, AgentConfig, AgentKind, AgentStatus};

/// Builds an agent for a registry entry.
pub type AgentFactory =
    Arc<dyn Fn(&AgentConfig) -> std::result::Result<Arc<dyn SourceAgent>, AgentError> + Send + Sync>;

/// An instantiated, enabled agent together with the config it was built from.
#[derive(Clone)]
pub struct ActiveAgent {
    pub config: AgentConfig,
    pub agent: Arc<dyn SourceAgent>,
}

impl std::fmt::Debug for ActiveAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveAgent")
            .field("name", &self.agent.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Ordered set of agent configs plus the factories that turn them into agents.
#[derive(Default)]
pub struct AgentRegistry {
    configs: RwLock<Vec<AgentConfig>>,
    by_name: HashMap<String, AgentFactory>,
    by_kind: HashMap<AgentKind, AgentFactory>,
}

impl AgentRegistry {
    /// Registry holding `configs` in the given order. A later entry with the
    /// same name replaces an earlier one.
    pub fn new(configs: impl IntoIterator<Item = AgentConfig>) -> Self {
        let registry = Self::default();
        for config in configs {
            registry.register(config);
        }
        registry
    }

    /// Factory used for the entry named `name`. Takes precedence over kind factories.
    pub fn with_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&AgentConfig) -> std::result::Result<Arc<dyn SourceAgent>, AgentError>
            + Send
            + Sync
            + 'static,
    {
        self.by_name.insert(name.into(), Arc::new(factory));
        self
    }

    /// Fallback factory for every entry of `kind` without a named factory.
    pub fn with_kind_factory<F>(mut self, kind: AgentKind, factory: F) -> Self
    where
        F: Fn(&AgentConfig) -> std::result::Result<Arc<dyn SourceAgent>, AgentError>
            + Send
            + Sync
            + 'static,
    {
        self.by_kind.insert(kind, Arc::new(factory));
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<AgentConfig>> {
        self.configs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<AgentConfig>> {
        self.configs.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an entry, or replace the entry with the same name in place.
    pub fn register(&self, config: AgentConfig) {
        let mut configs = self.write();
        match configs.iter_mut().find(|c| c.name == config.name) {
            Some(existing) => *existing = config,
            None => configs.push(config),
        }
    }

    /// Snapshot of every entry in registration order.
    pub fn list(&self) -> Vec<AgentConfig> {
        self.read().clone()
    }

    pub fn get(&self, name: &str) -> Result<AgentConfig> {
        self.read()
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownAgent(name.to_string()))
    }

    pub fn status(&self, name: &str) -> Result<AgentStatus> {
        self.get(name).map(|c| c.status())
    }

    pub fn enable(&self, name: &str) -> Result<()> {
        self.set_enabled(name, true)
    }

    pub fn disable(&self, name: &str) -> Result<()> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        let mut configs = self.write();
        let config = configs
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::UnknownAgent(name.to_string()))?;
        config.enabled = enabled;
        tracing::info!(agent = %name, enabled, "agent toggled");
        Ok(())
    }

    async fn instantiate(
        &self,
        config: &AgentConfig,
    ) -> std::result::Result<Arc<dyn SourceAgent>, AgentError> {
        let factory = self
            .by_name
            .get(&config.name)
            .or_else(|| self.by_kind.get(&config.kind))
            .ok_or_else(|| {
                AgentError::Unavailable(format!("no implementation for {}", config.name))
            })?;
        let agent = factory(config)?;

        if config.requires_auth {
            let auth = agent.as_authenticated().ok_or_else(|| {
                AgentError::Auth(format!("{} cannot authenticate", config.name))
            })?;
            if !auth.is_authenticated() {
                if config.credentials.is_empty() {
                    return Err(AgentError::Auth(format!(
                        "{} requires credentials",
                        config.name
                    )));
                }
                auth.authenticate(&config.credentials).await?;
            }
        }
        Ok(agent)
    }

    /// Build agents for every enabled entry, in registration order.
    ///
    /// An entry that cannot be built (no factory, missing or rejected
    /// credentials) is left out of the run and logged; it is not an error.
    pub async fn active_agents(&self) -> Vec<ActiveAgent> {
        let enabled: Vec<AgentConfig> = self.list().into_iter().filter(|c| c.enabled).collect();
        let mut active = Vec::with_capacity(enabled.len());
        for config in enabled {
            match self.instantiate(&config).await {
                Ok(agent) => active.push(ActiveAgent { config, agent }),
                Err(e) => {
                    tracing::warn!(agent = %config.name, error = %e, "agent excluded from run")
                }
            }
        }
        active
    }
}
