//! Login-gated wrapper around another agent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;
use crate::model::{FilterCriteria, JobRecord};

use super::{AuthenticatedAgent, Credentials, SourceAgent};

/// Delegates to an inner agent once authenticated; until then every fetch
/// fails with `AgentError::Auth`.
///
/// Authentication accepts any non-empty `username` + `password` pair. Real
/// sources verify them upstream; this wrapper only models the gate.
pub struct GatedAgent {
    inner: Arc<dyn SourceAgent>,
    authenticated: AtomicBool,
}

impl GatedAgent {
    pub fn new(inner: Arc<dyn SourceAgent>) -> Self {
        Self {
            inner,
            authenticated: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SourceAgent for GatedAgent {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(
        &self,
        criteria: &FilterCriteria,
        cancel: CancellationToken,
    ) -> Result<Vec<JobRecord>, AgentError> {
        if !self.is_authenticated() {
            return Err(AgentError::Auth(format!(
                "{} requires authentication",
                self.inner.name()
            )));
        }
        self.inner.fetch(criteria, cancel).await
    }

    fn as_authenticated(&self) -> Option<&dyn AuthenticatedAgent> {
        Some(self)
    }
}

#[async_trait]
impl AuthenticatedAgent for GatedAgent {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AgentError> {
        let present = |key: &str| credentials.get(key).is_some_and(|v| !v.trim().is_empty());
        if !present("username") || !present("password") {
            return Err(AgentError::Auth(format!(
                "{}: username and password are required",
                self.inner.name()
            )));
        }
        self.authenticated.store(true, Ordering::Release);
        tracing::info!(agent = %self.inner.name(), "authenticated");
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockAgent;

    fn gated() -> GatedAgent {
        GatedAgent::new(Arc::new(MockAgent::new("LinkedIn").with_count(3)))
    }

    fn creds(user: &str, pass: &str) -> Credentials {
        Credentials::from([
            ("username".to_string(), user.to_string()),
            ("password".to_string(), pass.to_string()),
        ])
    }

    #[tokio::test]
    async fn fetch_fails_until_authenticated() {
        let agent = gated();
        let err = agent
            .fetch(&FilterCriteria::default(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Auth(_)));

        let auth = agent.as_authenticated().expect("gated agent exposes auth");
        auth.authenticate(&creds("me", "secret")).await.unwrap();
        assert!(auth.is_authenticated());

        let jobs = agent
            .fetch(&FilterCriteria::default(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(agent.name(), "LinkedIn");
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected() {
        let agent = gated();
        let auth = agent.as_authenticated().unwrap();
        assert!(auth.authenticate(&creds("me", "  ")).await.is_err());
        assert!(auth.authenticate(&Credentials::new()).await.is_err());
        assert!(!auth.is_authenticated());
    }
}
