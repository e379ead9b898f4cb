//! Mock implementations for testing
//!
//! Stand-ins for the pipeline's external capabilities so activation can be
//! exercised without real native libraries, interpreters, or global state.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use titan_core::types::NativeType;
use titan_core::{Error, LogSink, Result};
use titan_extensions::namespace::Binding;
use titan_extensions::{
    is_active, Callable, HostEnvironment, LibraryHandle, ModuleContext, ModuleLoader,
    NativeBindingService, SharedNamespace,
};
use tracing::Level;

/// Record of a bind request
#[derive(Clone, Debug, PartialEq)]
pub struct BindRequest {
    pub library: PathBuf,
    pub symbol: String,
    pub result: NativeType,
    pub params: Vec<NativeType>,
}

/// Binding service resolving symbols from an in-memory table
#[derive(Default)]
pub struct MockBindingService {
    symbols: HashMap<String, Arc<dyn Callable>>,
    broken_libraries: HashSet<String>,
    loads: Arc<Mutex<Vec<PathBuf>>>,
    binds: Arc<Mutex<Vec<BindRequest>>>,
}

impl MockBindingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol that adds its two numeric arguments
    pub fn with_adder(self, symbol: &str) -> Self {
        self.with_symbol(symbol, |args: &[Value]| -> Result<Value> {
            let sum: f64 = args.iter().filter_map(Value::as_f64).sum();
            Ok(json!(sum))
        })
    }

    pub fn with_symbol<F>(mut self, symbol: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.symbols.insert(symbol.to_string(), Arc::new(f));
        self
    }

    /// Fail loading any library whose file name is `file_name`
    pub fn with_broken_library(mut self, file_name: &str) -> Self {
        self.broken_libraries.insert(file_name.to_string());
        self
    }

    pub fn loads(&self) -> Vec<PathBuf> {
        self.loads.lock().unwrap().clone()
    }

    pub fn binds(&self) -> Vec<BindRequest> {
        self.binds.lock().unwrap().clone()
    }
}

impl NativeBindingService for MockBindingService {
    fn load(&self, path: &Path) -> Result<Arc<dyn LibraryHandle>> {
        self.loads.lock().unwrap().push(path.to_path_buf());

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.broken_libraries.contains(&file_name) {
            return Err(Error::library_load(path.display().to_string(), "invalid ELF header"));
        }

        Ok(Arc::new(MockLibrary {
            path: path.to_path_buf(),
            symbols: self.symbols.clone(),
            binds: Arc::clone(&self.binds),
        }))
    }
}

/// Library handle produced by [`MockBindingService`]
pub struct MockLibrary {
    path: PathBuf,
    symbols: HashMap<String, Arc<dyn Callable>>,
    binds: Arc<Mutex<Vec<BindRequest>>>,
}

impl LibraryHandle for MockLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn bind(
        &self,
        symbol: &str,
        result: &NativeType,
        params: &[NativeType],
    ) -> Result<Arc<dyn Callable>> {
        self.binds.lock().unwrap().push(BindRequest {
            library: self.path.clone(),
            symbol: symbol.to_string(),
            result: result.clone(),
            params: params.to_vec(),
        });

        self.symbols
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::bind_failed(symbol, "undefined symbol"))
    }
}

/// Record of an entry module run
#[derive(Clone, Debug)]
pub struct ModuleRun {
    pub extension: String,
    pub module: PathBuf,
    /// Extension entries visible in the namespace when the module started
    pub visible: Vec<String>,
    /// Watched names that `is_active` reported when the module started
    pub active: Vec<String>,
}

/// Module loader that records runs instead of spawning anything
#[derive(Default)]
pub struct RecordingLoader {
    runs: Mutex<Vec<ModuleRun>>,
    failing: HashSet<String>,
    values: Vec<(String, String, Value)>,
    watched: Vec<String>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the module of `extension` fail
    pub fn failing(mut self, extension: &str) -> Self {
        self.failing.insert(extension.to_string());
        self
    }

    /// Have the module of `extension` store `value` under `member`
    pub fn setting(mut self, extension: &str, member: &str, value: Value) -> Self {
        self.values
            .push((extension.to_string(), member.to_string(), value));
        self
    }

    /// Record whether `is_active` holds for each name as every module starts
    pub fn watching(mut self, names: &[&str]) -> Self {
        self.watched = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn runs(&self) -> Vec<ModuleRun> {
        self.runs.lock().unwrap().clone()
    }

    pub fn extensions(&self) -> Vec<String> {
        self.runs().into_iter().map(|r| r.extension).collect()
    }
}

#[async_trait]
impl ModuleLoader for RecordingLoader {
    async fn run(&self, module: &Path, ctx: ModuleContext) -> anyhow::Result<()> {
        let visible = ctx
            .namespace
            .read()
            .extension_names()
            .into_iter()
            .map(String::from)
            .collect();
        let active = self
            .watched
            .iter()
            .filter(|name| is_active(name))
            .cloned()
            .collect();
        self.runs.lock().unwrap().push(ModuleRun {
            extension: ctx.extension.clone(),
            module: module.to_path_buf(),
            visible,
            active,
        });

        tokio::task::yield_now().await;

        for (extension, member, value) in &self.values {
            if *extension == ctx.extension {
                ctx.namespace
                    .write()
                    .bind(extension, member, Binding::Value(value.clone()));
            }
        }

        if self.failing.contains(&ctx.extension) {
            anyhow::bail!("ReferenceError: titan is not defined");
        }
        Ok(())
    }
}

/// Host recording exposures without touching process-wide state
#[derive(Default)]
pub struct RecordingHost {
    exposed: Mutex<Vec<(String, SharedNamespace)>>,
}

impl RecordingHost {
    pub fn names(&self) -> Vec<String> {
        self.exposed
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<SharedNamespace> {
        self.exposed
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ns)| ns.clone())
    }
}

impl HostEnvironment for RecordingHost {
    fn expose(&self, name: &str, namespace: SharedNamespace) -> Result<()> {
        self.exposed
            .lock()
            .unwrap()
            .push((name.to_string(), namespace));
        Ok(())
    }
}

/// Log sink keeping every line
#[derive(Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::WARN)
    }

    /// True when some warning contains `needle`
    pub fn warned(&self, needle: &str) -> bool {
        self.warnings().iter().any(|w| w.contains(needle))
    }
}

impl LogSink for CaptureSink {
    fn log(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}
