//! Native library binding
//!
//! The activation engine talks to native code only through
//! [`NativeBindingService`] and [`LibraryHandle`]. Loaded handles are kept in
//! a process-wide list and never dropped: once a function is bound into a
//! live namespace the library cannot be unloaded safely.
//!
//! [`LibloadingService`] is the default implementation. It marshals only
//! all-`double` signatures with up to three parameters returning `double` or
//! `void`; anything else fails at bind time.

use crate::namespace::Callable;
use libloading::Library;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use titan_core::types::{format_signature, NativeType};
use titan_core::{Error, Result};
use tracing::debug;

/// Loads native libraries
pub trait NativeBindingService: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn LibraryHandle>>;
}

/// A loaded native library
pub trait LibraryHandle: Send + Sync {
    /// Path the library was loaded from
    fn path(&self) -> &Path;

    /// Bind `symbol` with the given signature
    fn bind(
        &self,
        symbol: &str,
        result: &NativeType,
        params: &[NativeType],
    ) -> Result<Arc<dyn Callable>>;
}

static RETAINED_LIBRARIES: LazyLock<Mutex<Vec<Arc<dyn LibraryHandle>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

/// Keep a library handle alive for the rest of the process
pub fn retain(handle: Arc<dyn LibraryHandle>) {
    debug!("Retaining native library {:?}", handle.path());
    RETAINED_LIBRARIES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(handle);
}

/// Number of library handles retained so far
pub fn retained_count() -> usize {
    RETAINED_LIBRARIES
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}

/// Binding service backed by `libloading`
#[derive(Debug, Clone, Copy, Default)]
pub struct LibloadingService;

impl NativeBindingService for LibloadingService {
    fn load(&self, path: &Path) -> Result<Arc<dyn LibraryHandle>> {
        // SAFETY: loading runs the library's initializers; extensions are trusted code
        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::library_load(path.display().to_string(), e.to_string()))?;

        debug!("Loaded native library {:?}", path);
        Ok(Arc::new(LoadedLibrary {
            path: path.to_path_buf(),
            library: Arc::new(library),
        }))
    }
}

struct LoadedLibrary {
    path: PathBuf,
    library: Arc<Library>,
}

type D0 = unsafe extern "C" fn() -> f64;
type D1 = unsafe extern "C" fn(f64) -> f64;
type D2 = unsafe extern "C" fn(f64, f64) -> f64;
type D3 = unsafe extern "C" fn(f64, f64, f64) -> f64;
type V0 = unsafe extern "C" fn();
type V1 = unsafe extern "C" fn(f64);
type V2 = unsafe extern "C" fn(f64, f64);
type V3 = unsafe extern "C" fn(f64, f64, f64);

/// Resolved function pointer for a supported signature
#[derive(Clone, Copy)]
enum RawFn {
    D0(D0),
    D1(D1),
    D2(D2),
    D3(D3),
    V0(V0),
    V1(V1),
    V2(V2),
    V3(V3),
}

impl RawFn {
    fn arity(self) -> usize {
        match self {
            Self::D0(_) | Self::V0(_) => 0,
            Self::D1(_) | Self::V1(_) => 1,
            Self::D2(_) | Self::V2(_) => 2,
            Self::D3(_) | Self::V3(_) => 3,
        }
    }
}

impl LoadedLibrary {
    fn symbol<T: Copy>(&self, symbol: &str) -> Result<T> {
        // SAFETY: the caller picks `T` from the declared signature
        let sym = unsafe { self.library.get::<T>(symbol.as_bytes()) }
            .map_err(|e| Error::bind_failed(symbol, e.to_string()))?;
        Ok(*sym)
    }
}

impl LibraryHandle for LoadedLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn bind(
        &self,
        symbol: &str,
        result: &NativeType,
        params: &[NativeType],
    ) -> Result<Arc<dyn Callable>> {
        if params.iter().any(|p| *p != NativeType::Double) {
            return Err(unsupported(symbol, result, params));
        }

        let raw = match (result, params.len()) {
            (NativeType::Double, 0) => RawFn::D0(self.symbol(symbol)?),
            (NativeType::Double, 1) => RawFn::D1(self.symbol(symbol)?),
            (NativeType::Double, 2) => RawFn::D2(self.symbol(symbol)?),
            (NativeType::Double, 3) => RawFn::D3(self.symbol(symbol)?),
            (NativeType::Void, 0) => RawFn::V0(self.symbol(symbol)?),
            (NativeType::Void, 1) => RawFn::V1(self.symbol(symbol)?),
            (NativeType::Void, 2) => RawFn::V2(self.symbol(symbol)?),
            (NativeType::Void, 3) => RawFn::V3(self.symbol(symbol)?),
            _ => return Err(unsupported(symbol, result, params)),
        };

        Ok(Arc::new(NativeFunction {
            symbol: symbol.to_string(),
            raw,
            _library: Arc::clone(&self.library),
        }))
    }
}

fn unsupported(symbol: &str, result: &NativeType, params: &[NativeType]) -> Error {
    Error::UnsupportedSignature {
        symbol: symbol.to_string(),
        params: format_signature(params),
        result: result.to_string(),
    }
}

/// Bound native function
struct NativeFunction {
    symbol: String,
    raw: RawFn,
    _library: Arc<Library>,
}

impl NativeFunction {
    fn doubles(&self, args: &[Value]) -> Result<Vec<f64>> {
        if args.len() != self.raw.arity() {
            return Err(Error::invalid_call(
                &self.symbol,
                format!("expected {} argument(s), got {}", self.raw.arity(), args.len()),
            ));
        }
        args.iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.as_f64().ok_or_else(|| {
                    Error::invalid_call(&self.symbol, format!("argument {} is not a number", i))
                })
            })
            .collect()
    }
}

impl Callable for NativeFunction {
    fn call(&self, args: &[Value]) -> Result<Value> {
        let a = self.doubles(args)?;
        // SAFETY: pointer resolved for exactly this signature; `_library` keeps it mapped
        let result = unsafe {
            match self.raw {
                RawFn::D0(f) => Some(f()),
                RawFn::D1(f) => Some(f(a[0])),
                RawFn::D2(f) => Some(f(a[0], a[1])),
                RawFn::D3(f) => Some(f(a[0], a[1], a[2])),
                RawFn::V0(f) => {
                    f();
                    None
                }
                RawFn::V1(f) => {
                    f(a[0]);
                    None
                }
                RawFn::V2(f) => {
                    f(a[0], a[1]);
                    None
                }
                RawFn::V3(f) => {
                    f(a[0], a[1], a[2]);
                    None
                }
            }
        };

        Ok(result
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null))
    }
}
