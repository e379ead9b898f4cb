//! Entry module execution
//!
//! How an entry module actually runs is up to the host. The activation
//! engine hands each module to a [`ModuleLoader`] and awaits it before
//! moving on to the next extension.

use crate::namespace::SharedNamespace;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Environment variable carrying the extension name to spawned modules
pub const EXTENSION_ENV: &str = "TITAN_EXTENSION";

/// Interpreter used by [`CommandModuleLoader`] when none is configured
pub const DEFAULT_INTERPRETER: &str = "node";

/// What a loader knows about the module it runs
#[derive(Clone, Debug)]
pub struct ModuleContext {
    /// Extension name
    pub extension: String,

    /// Extension directory
    pub extension_dir: PathBuf,

    /// Namespace being populated
    pub namespace: SharedNamespace,
}

/// Runs one initialization module to completion
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn run(&self, module: &Path, ctx: ModuleContext) -> Result<()>;
}

/// Loader that runs each module in an interpreter subprocess
#[derive(Debug, Clone)]
pub struct CommandModuleLoader {
    program: String,
    args: Vec<String>,
}

impl CommandModuleLoader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the module path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandModuleLoader {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER)
    }
}

#[async_trait]
impl ModuleLoader for CommandModuleLoader {
    async fn run(&self, module: &Path, ctx: ModuleContext) -> Result<()> {
        debug!(
            "Running {} {:?} for extension {}",
            self.program, module, ctx.extension
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(module)
            .current_dir(&ctx.extension_dir)
            .env(EXTENSION_ENV, &ctx.extension)
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.program))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("{}: {}", ctx.extension, line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} exited with {}: {}",
                module.display(),
                output.status,
                stderr.trim()
            ));
        }

        Ok(())
    }
}
