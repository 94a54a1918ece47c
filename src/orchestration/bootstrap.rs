//! # System Bootstrap
//!
//! Wires configuration, the event bus, the run registry, the orchestrator, the
//! launcher and the web application into one handle, the same way for the
//! standalone server and for tests.

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use super::demo_handlers::{EchoStatusPoller, MockPriceAppealSubmitter};
use super::launcher::OrchestrationLauncher;
use super::orchestrator::Orchestrator;
use super::run_registry::RunRegistry;
use super::steps::{JobSubmitter, StatusPoller};
use crate::config::ConfigManager;
use crate::constants::workflow::REGISTRY_SWEEP_INTERVAL;
use crate::error::BpmResult;
use crate::events::EventPublisher;
use crate::web::{create_app, AppState};

/// Fully wired system ready to serve
pub struct BpmSystemHandle {
    pub config_manager: Arc<ConfigManager>,
    pub orchestrator: Arc<Orchestrator>,
    pub launcher: Arc<OrchestrationLauncher>,
    pub registry: Arc<RunRegistry>,
    pub publisher: EventPublisher,
    pub app: Router,
}

impl BpmSystemHandle {
    /// Bootstrap with the given step backends
    pub fn bootstrap(
        config_manager: Arc<ConfigManager>,
        submitter: Arc<dyn JobSubmitter>,
        poller: Arc<dyn StatusPoller>,
    ) -> Self {
        let config = config_manager.config();
        let publisher = EventPublisher::new(config.events.channel_capacity);
        let registry = Arc::new(RunRegistry::with_retention(config.server.run_retention()));
        registry.spawn_sweeper(REGISTRY_SWEEP_INTERVAL);

        let orchestrator = Arc::new(Orchestrator::from_config(
            config,
            submitter,
            poller,
            publisher.clone(),
            registry.clone(),
        ));
        let launcher = Arc::new(OrchestrationLauncher::from_limit(
            orchestrator.clone(),
            config.server.max_concurrent_runs,
        ));

        let state = AppState::new(
            config,
            config_manager.environment(),
            launcher.clone(),
            registry.clone(),
            publisher.clone(),
        );
        let app = create_app(Arc::new(state));

        info!(
            environment = %config_manager.environment(),
            max_concurrent_runs = ?config.server.max_concurrent_runs,
            run_retention_seconds = config.server.run_retention_seconds,
            "System bootstrapped"
        );

        Self {
            config_manager,
            orchestrator,
            launcher,
            registry,
            publisher,
            app,
        }
    }

    /// Bootstrap with the mock price-appeal submitter and echo poller
    pub fn bootstrap_demo(config_manager: Arc<ConfigManager>) -> Self {
        Self::bootstrap(
            config_manager,
            Arc::new(MockPriceAppealSubmitter),
            Arc::new(EchoStatusPoller),
        )
    }

    /// Bind the configured address
    pub async fn bind(&self) -> BpmResult<TcpListener> {
        let bind_address = &self.config_manager.config().server.bind_address;
        Ok(TcpListener::bind(bind_address).await?)
    }

    /// Serve until `shutdown` resolves; in-flight runs are not awaited
    pub async fn serve<S>(self, listener: TcpListener, shutdown: S) -> BpmResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let local_addr: SocketAddr = listener.local_addr()?;
        info!(address = %local_addr, "HTTP server listening");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(
            active_runs = self.registry.active_count(),
            "HTTP server stopped"
        );
        Ok(())
    }
}
