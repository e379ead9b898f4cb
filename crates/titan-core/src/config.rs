//! Bootstrap configuration

use crate::log::{LogSink, Reporter, TracingSink};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment flags that enable verbose logging
pub const VERBOSE_ENV_FLAGS: &[&str] = &["TITAN_VERBOSE", "TITAN_DEBUG"];

/// Settings for one bootstrap run
#[derive(Clone)]
pub struct BootstrapConfig {
    /// Project directory to scan
    pub root_dir: PathBuf,

    /// Emit info/debug lines in addition to warnings
    pub verbose: bool,

    /// Log destination
    pub logger: Arc<dyn LogSink>,
}

impl BootstrapConfig {
    /// Defaults with verbosity taken from the environment
    pub fn from_env() -> Self {
        Self::default().with_verbose(verbose_from_env())
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn LogSink>) -> Self {
        self.logger = logger;
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Reporter bound to this configuration's sink and verbosity
    pub fn reporter(&self) -> Reporter {
        Reporter::new(Arc::clone(&self.logger), self.verbose)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            root_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            verbose: false,
            logger: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("root_dir", &self.root_dir)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

/// True when any verbosity flag is set to an affirmative value
pub fn verbose_from_env() -> bool {
    VERBOSE_ENV_FLAGS.iter().any(|flag| {
        std::env::var(flag)
            .map(|value| is_affirmative(&value))
            .unwrap_or(false)
    })
}

/// Accepts `1`, `true`, `yes`, `on` (case-insensitive)
pub fn is_affirmative(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
