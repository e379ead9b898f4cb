//! Host exposure
//!
//! Once activation finishes, the bootstrapper publishes the namespace to the
//! embedding host under two equivalent names. The namespace of the run in
//! progress is tracked separately so [`is_active`] answers for the current
//! run even before anything is published.

use crate::namespace::SharedNamespace;
use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};
use titan_core::{Error, Result};
use tracing::debug;

/// Short global binding
pub const SHORT_BINDING: &str = "t";

/// Long global binding
pub const LONG_BINDING: &str = "Titan";

/// Names the namespace is published under, in publication order
pub const HOST_BINDINGS: &[&str] = &[SHORT_BINDING, LONG_BINDING];

/// Somewhere the namespace can be made globally reachable
pub trait HostEnvironment: Send + Sync {
    fn expose(&self, name: &str, namespace: SharedNamespace) -> Result<()>;
}

static GLOBALS: LazyLock<RwLock<HashMap<String, SharedNamespace>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static ACTIVE: LazyLock<RwLock<Option<SharedNamespace>>> = LazyLock::new(|| RwLock::new(None));

/// Host backed by a process-wide binding table
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalHost;

impl HostEnvironment for GlobalHost {
    fn expose(&self, name: &str, namespace: SharedNamespace) -> Result<()> {
        if name.is_empty() {
            return Err(Error::host_exposure(name, "binding name is empty"));
        }

        debug!("Exposing namespace as global '{}'", name);
        GLOBALS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), namespace);
        Ok(())
    }
}

/// Read a binding published through [`GlobalHost`]
pub fn global(name: &str) -> Option<SharedNamespace> {
    GLOBALS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Publish `namespace` under every host binding
pub fn expose_all(host: &dyn HostEnvironment, namespace: &SharedNamespace) -> Result<()> {
    for name in HOST_BINDINGS {
        host.expose(name, namespace.clone())?;
    }
    Ok(())
}

/// Make `namespace` the one [`is_active`] consults
pub(crate) fn track(namespace: &SharedNamespace) {
    *ACTIVE.write().unwrap_or_else(PoisonError::into_inner) = Some(namespace.clone());
}

/// Namespace of the most recently started bootstrap run
pub fn active() -> Option<SharedNamespace> {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Whether the namespace of the latest bootstrap run has an entry for `name`
pub fn is_active(name: &str) -> bool {
    active().is_some_and(|ns| ns.read().contains(name))
}
