//! Pipeline orchestration
//!
//! A bootstrap run builds a fresh namespace, discovers extensions under the
//! configured root, orders them by their package dependencies, activates
//! them one at a time, and finally publishes the namespace to the host.
//! Entry modules reach the namespace through their [`ModuleContext`], not
//! through the host. Partial activation is a normal outcome; only host
//! exposure can fail the run.
//!
//! [`ModuleContext`]: crate::loader::ModuleContext

use crate::activation::ActivationEngine;
use crate::dependency::{DependencyGraph, SortOutcome};
use crate::host::{self, GlobalHost, HostEnvironment};
use crate::loader::{CommandModuleLoader, ModuleLoader};
use crate::namespace::{Namespace, SharedNamespace};
use crate::native::{LibloadingService, NativeBindingService};
use crate::scanner::ExtensionScanner;
use crate::serialization::{JsonSerialization, SerializationService};
use std::path::Path;
use std::sync::Arc;
use titan_core::types::DiscoveredExtension;
use titan_core::{BootstrapConfig, Reporter, Result};
use tracing::{debug, info};

/// Runs the discovery, ordering, and activation pipeline
pub struct Bootstrapper {
    config: BootstrapConfig,
    binding_service: Arc<dyn NativeBindingService>,
    module_loader: Arc<dyn ModuleLoader>,
    serializer: Arc<dyn SerializationService>,
    host: Arc<dyn HostEnvironment>,
}

impl Bootstrapper {
    /// Create a bootstrapper with the default services
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            binding_service: Arc::new(LibloadingService),
            module_loader: Arc::new(CommandModuleLoader::default()),
            serializer: Arc::new(JsonSerialization),
            host: Arc::new(GlobalHost),
        }
    }

    pub fn with_binding_service(mut self, service: Arc<dyn NativeBindingService>) -> Self {
        self.binding_service = service;
        self
    }

    pub fn with_module_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.module_loader = loader;
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn SerializationService>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_host(mut self, host: Arc<dyn HostEnvironment>) -> Self {
        self.host = host;
        self
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Discover and order extensions without activating anything
    pub fn plan(&self) -> SortOutcome {
        let reporter = self.config.reporter();
        let discovered = ExtensionScanner::new(reporter.clone()).discover(self.config.root_dir());
        let outcome = DependencyGraph::from_extensions(&discovered).order(&discovered);
        log_cycles(&reporter, &outcome);
        outcome
    }

    /// Run the full pipeline and return the populated namespace
    pub async fn bootstrap(&self) -> Result<SharedNamespace> {
        let reporter = self.config.reporter();
        info!("Bootstrapping extensions from {:?}", self.config.root_dir());

        let namespace = Namespace::new(Arc::clone(&self.config.logger)).into_shared();
        host::track(&namespace);

        let outcome = self.plan();
        reporter.info(format!(
            "Loading {} extension(s): {}",
            outcome.order.len(),
            outcome
                .order
                .iter()
                .map(DiscoveredExtension::name)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        let engine = ActivationEngine::new(
            Arc::clone(&self.binding_service),
            Arc::clone(&self.module_loader),
            Arc::clone(&self.serializer),
            reporter,
        );
        engine.activate_all(&outcome.order, &namespace).await;

        host::expose_all(self.host.as_ref(), &namespace)?;

        debug!(
            "Bootstrap complete: {} namespace entries",
            namespace.read().len()
        );
        Ok(namespace)
    }
}

fn log_cycles(reporter: &Reporter, outcome: &SortOutcome) {
    for edge in &outcome.cycles {
        reporter.debug(format!(
            "Dependency cycle broken at {} -> {}",
            edge.from, edge.to
        ));
    }
}

/// Run the pipeline with default services
pub async fn bootstrap(config: BootstrapConfig) -> Result<SharedNamespace> {
    Bootstrapper::new(config).bootstrap().await
}

/// Discover extensions under `root` without logging anything
pub fn list_discovered(root: &Path) -> Vec<DiscoveredExtension> {
    ExtensionScanner::new(Reporter::silent()).discover(root)
}

/// Whether the namespace of the latest bootstrap run has an entry for `name`.
///
/// Answers for the run in progress, so entry modules see only what earlier
/// extensions of the same run registered.
pub fn is_active(name: &str) -> bool {
    host::is_active(name)
}
