//! Process lifecycle: `Unconfigured -> Configured -> Serving`, once, in
//! order. Listeners are bound only by [`Bootstrap::serve`], so nothing
//! accepts requests before the process is `Serving`.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use configs::{AppConfig, DeploymentProfile};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::compose::Endpoint;
use crate::errors::StartupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unconfigured,
    Configured,
    Serving,
}

pub struct Unconfigured;

pub struct Configured {
    deployment: DeploymentProfile,
}

pub struct Serving {
    addrs: BTreeMap<String, SocketAddr>,
    tasks: JoinSet<(String, std::io::Result<()>)>,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unconfigured {}
    impl Sealed for super::Configured {}
    impl Sealed for super::Serving {}
}

pub trait LifecycleState: sealed::Sealed {
    const PHASE: Phase;
}

impl LifecycleState for Unconfigured {
    const PHASE: Phase = Phase::Unconfigured;
}

impl LifecycleState for Configured {
    const PHASE: Phase = Phase::Configured;
}

impl LifecycleState for Serving {
    const PHASE: Phase = Phase::Serving;
}

pub struct Bootstrap<S: LifecycleState> {
    state: S,
}

impl<S: LifecycleState> Bootstrap<S> {
    pub fn phase(&self) -> Phase {
        S::PHASE
    }
}

impl Default for Bootstrap<Unconfigured> {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap<Unconfigured> {
    pub fn new() -> Self {
        Bootstrap { state: Unconfigured }
    }

    /// Select the profile from `APP_ENV` (and `CONFIG_DIR`).
    pub fn configure(self) -> Result<Bootstrap<Configured>, StartupError> {
        Ok(self.with_profile(DeploymentProfile::load()?))
    }

    pub fn configure_from(self, selector: Option<&str>, dir: &Path) -> Result<Bootstrap<Configured>, StartupError> {
        Ok(self.with_profile(DeploymentProfile::load_from(selector, dir)?))
    }

    pub fn with_profile(self, deployment: DeploymentProfile) -> Bootstrap<Configured> {
        info!(phase = ?Phase::Configured, profile = %deployment.profile, "bootstrap transition");
        Bootstrap { state: Configured { deployment } }
    }
}

impl Bootstrap<Configured> {
    pub fn deployment(&self) -> &DeploymentProfile {
        &self.state.deployment
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.deployment.config
    }

    /// Bind every endpoint, then start serving them all. A bind failure
    /// leaves nothing running.
    pub async fn serve(self, endpoints: Vec<Endpoint>) -> Result<Bootstrap<Serving>, StartupError> {
        let mut bound = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let listener = TcpListener::bind(&endpoint.addr).await.map_err(|source| StartupError::Bind {
                name: endpoint.name.clone(),
                addr: endpoint.addr.clone(),
                source,
            })?;
            let local = listener.local_addr().map_err(|source| StartupError::Bind {
                name: endpoint.name.clone(),
                addr: endpoint.addr.clone(),
                source,
            })?;
            bound.push((endpoint, listener, local));
        }

        let mut addrs = BTreeMap::new();
        let mut tasks = JoinSet::new();
        for (endpoint, listener, local) in bound {
            info!(listener = %endpoint.name, addr = %local, "listening");
            addrs.insert(endpoint.name.clone(), local);
            let name = endpoint.name;
            let router = endpoint.router;
            tasks.spawn(async move { (name, axum::serve(listener, router).await) });
        }
        info!(phase = ?Phase::Serving, profile = %self.state.deployment.profile, "bootstrap transition");
        Ok(Bootstrap { state: Serving { addrs, tasks } })
    }
}

impl Bootstrap<Serving> {
    pub fn local_addr(&self, name: &str) -> Option<SocketAddr> {
        self.state.addrs.get(name).copied()
    }

    /// Resolves when the first listener stops; the others are aborted on
    /// return.
    pub async fn wait(mut self) -> Result<(), StartupError> {
        match self.state.tasks.join_next().await {
            None => Ok(()),
            Some(Ok((name, Ok(())))) => {
                info!(listener = %name, "listener stopped");
                Ok(())
            }
            Some(Ok((name, Err(source)))) => {
                error!(listener = %name, error = %source, "listener failed");
                Err(StartupError::Serve { name, source })
            }
            Some(Err(join)) => Err(StartupError::Join(join.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use axum::Router;

    fn test_profile_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../env")
    }

    #[test]
    fn unknown_profile_never_leaves_unconfigured() {
        let boot = Bootstrap::new();
        assert_eq!(boot.phase(), Phase::Unconfigured);
        let err = boot.configure_from(Some("staging"), &test_profile_dir()).err();
        assert!(matches!(err, Some(StartupError::Config(configs::ConfigError::UnknownProfile(_)))));
    }

    #[test]
    fn missing_selector_is_fatal() {
        let err = Bootstrap::new().configure_from(None, &test_profile_dir()).err();
        assert!(matches!(err, Some(StartupError::Config(configs::ConfigError::MissingProfile(_)))));
    }

    #[tokio::test]
    async fn phases_advance_in_order() -> anyhow::Result<()> {
        let configured = Bootstrap::new().configure_from(Some("test"), &test_profile_dir())?;
        assert_eq!(configured.phase(), Phase::Configured);

        let ping = Endpoint::new("probe", "127.0.0.1:0", routes::public_router(Router::new()));
        let serving = configured.serve(vec![ping]).await?;
        assert_eq!(serving.phase(), Phase::Serving);
        assert!(serving.local_addr("probe").is_some_and(|a| a.port() != 0));
        Ok(())
    }

    #[tokio::test]
    async fn bind_failure_is_reported_by_name() -> anyhow::Result<()> {
        let taken = TcpListener::bind("127.0.0.1:0").await?;
        let addr = taken.local_addr()?.to_string();
        let configured = Bootstrap::new().configure_from(Some("test"), &test_profile_dir())?;
        let err = configured
            .serve(vec![Endpoint::new("clash", addr, Router::new())])
            .await
            .err();
        assert!(matches!(err, Some(StartupError::Bind { ref name, .. }) if name == "clash"));
        Ok(())
    }
}
