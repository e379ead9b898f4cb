//! Shared extension namespace
//!
//! One namespace exists per bootstrap run. It starts with two fixed entries,
//! `log` and `native`, and gains one bag per activated extension. Bags hold
//! callables (bound native functions, serialization hooks) and plain values.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use titan_core::{Error, LogSink, Result};
use tracing::Level;

/// Fixed entry holding the logging function
pub const LOG_ENTRY: &str = "log";

/// Fixed entry reserved for host-side native values
pub const NATIVE_ENTRY: &str = "native";

/// Something that can be invoked from the namespace
pub trait Callable: Send + Sync {
    fn call(&self, args: &[Value]) -> Result<Value>;
}

impl<F> Callable for F
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> Result<Value> {
        self(args)
    }
}

/// Member of an extension bag
#[derive(Clone)]
pub enum Binding {
    Function(Arc<dyn Callable>),
    Value(Value),
}

impl Binding {
    pub fn function(callable: Arc<dyn Callable>) -> Self {
        Self::Function(callable)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    pub fn as_callable(&self) -> Option<&Arc<dyn Callable>> {
        match self {
            Self::Function(f) => Some(f),
            Self::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Function(_) => None,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// Named members contributed by one extension
pub type Bag = IndexMap<String, Binding>;

/// Top-level namespace entry: a bare function or an extension's bag
#[derive(Clone)]
pub enum Slot {
    Function(Arc<dyn Callable>),
    Bag(Bag),
}

impl Slot {
    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            Self::Bag(bag) => Some(bag),
            Self::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<dyn Callable>> {
        match self {
            Self::Function(f) => Some(f),
            Self::Bag(_) => None,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Bag(bag) => f.debug_tuple("Bag").field(bag).finish(),
        }
    }
}

/// The shared object extensions populate
#[derive(Debug)]
pub struct Namespace {
    entries: IndexMap<String, Slot>,
}

impl Namespace {
    /// Create a namespace with its fixed `log` and `native` entries
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        let mut entries = IndexMap::new();
        entries.insert(
            LOG_ENTRY.to_string(),
            Slot::Function(log_function(sink)),
        );
        entries.insert(NATIVE_ENTRY.to_string(), Slot::Bag(Bag::new()));
        Self { entries }
    }

    /// Wrap for sharing with the activation engine and the host
    pub fn into_shared(self) -> SharedNamespace {
        SharedNamespace(Arc::new(RwLock::new(self)))
    }

    /// Ensure a bag exists for `name`, creating an empty one if absent.
    ///
    /// Returns `None` when `name` is taken by a non-bag entry.
    pub fn ensure_bag(&mut self, name: &str) -> Option<&mut Bag> {
        let slot = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Slot::Bag(Bag::new()));
        match slot {
            Slot::Bag(bag) => Some(bag),
            Slot::Function(_) => None,
        }
    }

    /// Add a member to an existing bag
    pub fn bind(&mut self, name: &str, member: &str, binding: Binding) -> bool {
        match self.entries.get_mut(name) {
            Some(Slot::Bag(bag)) => {
                bag.insert(member.to_string(), binding);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.entries.get(name)
    }

    pub fn bag(&self, name: &str) -> Option<&Bag> {
        self.entries.get(name).and_then(Slot::as_bag)
    }

    /// Look up a bag member
    pub fn member(&self, name: &str, member: &str) -> Option<&Binding> {
        self.bag(name).and_then(|bag| bag.get(member))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in insertion order, fixed entries first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entry names contributed by extensions, in activation order
    pub fn extension_names(&self) -> Vec<&str> {
        self.names()
            .filter(|name| *name != LOG_ENTRY && *name != NATIVE_ENTRY)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke `name.member(args)`
    pub fn call(&self, name: &str, member: &str, args: &[Value]) -> Result<Value> {
        let binding = self
            .member(name, member)
            .ok_or_else(|| Error::invalid_call(format!("{name}.{member}"), "not bound"))?;
        let callable = binding
            .as_callable()
            .ok_or_else(|| Error::invalid_call(format!("{name}.{member}"), "not a function"))?;
        callable.call(args)
    }

    /// Invoke the fixed `log` entry
    pub fn log(&self, args: &[Value]) -> Result<Value> {
        self.entries
            .get(LOG_ENTRY)
            .and_then(Slot::as_function)
            .ok_or_else(|| Error::invalid_call(LOG_ENTRY, "not a function"))?
            .call(args)
    }
}

/// `log(source, message...)` writes `[source] message` at info level
fn log_function(sink: Arc<dyn LogSink>) -> Arc<dyn Callable> {
    Arc::new(move |args: &[Value]| -> Result<Value> {
        let parts: Vec<String> = args.iter().map(display_value).collect();
        let line = match parts.split_first() {
            Some((source, rest)) if !rest.is_empty() => {
                format!("[{}] {}", source, rest.join(" "))
            }
            _ => parts.join(" "),
        };
        sink.log(Level::INFO, &line);
        Ok(Value::Null)
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Namespace handle shared between the pipeline, module loaders, and the host
#[derive(Clone, Debug)]
pub struct SharedNamespace(Arc<RwLock<Namespace>>);

impl SharedNamespace {
    pub fn read(&self) -> RwLockReadGuard<'_, Namespace> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Namespace> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// True when both handles refer to the same namespace
    pub fn ptr_eq(&self, other: &SharedNamespace) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
