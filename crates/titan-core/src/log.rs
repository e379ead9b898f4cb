//! Logging side channel for the activation pipeline
//!
//! Pipeline warnings and progress lines are written to a [`LogSink`]. The
//! default sink forwards to `tracing`, so a host that installs a subscriber
//! sees pipeline output alongside its own events. Tests and embedders can
//! supply their own sink to capture output.

use std::fmt;
use std::sync::Arc;
use tracing::Level;

/// Destination for pipeline log lines
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Sink that forwards every line to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "titan", "{}", message),
            Level::WARN => tracing::warn!(target: "titan", "{}", message),
            Level::INFO => tracing::info!(target: "titan", "{}", message),
            Level::DEBUG => tracing::debug!(target: "titan", "{}", message),
            _ => tracing::trace!(target: "titan", "{}", message),
        }
    }
}

/// Level-gated writer over a sink.
///
/// Warnings always reach the sink; info and debug lines only when verbose.
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<dyn LogSink>,
    verbose: bool,
    silent: bool,
}

impl Reporter {
    pub fn new(sink: Arc<dyn LogSink>, verbose: bool) -> Self {
        Self {
            sink,
            verbose,
            silent: false,
        }
    }

    /// Reporter that drops everything
    pub fn silent() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            verbose: false,
            silent: true,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.silent
    }

    /// Underlying sink
    pub fn sink(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.sink)
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if !self.silent {
            self.sink.log(Level::WARN, message.as_ref());
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if self.is_verbose() {
            self.sink.log(Level::INFO, message.as_ref());
        }
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        if self.is_verbose() {
            self.sink.log(Level::DEBUG, message.as_ref());
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("verbose", &self.verbose)
            .field("silent", &self.silent)
            .finish()
    }
}
