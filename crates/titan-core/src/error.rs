//! Error types for titan-core

use thiserror::Error;

/// Result type alias using titan-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the extension pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest file not found
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: String },

    /// Manifest present but not a valid descriptor
    #[error("Invalid manifest {path}: {message}")]
    InvalidManifest { path: String, message: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Native library could not be loaded
    #[error("Failed to load native library {path}: {message}")]
    LibraryLoad { path: String, message: String },

    /// A declared native function could not be bound
    #[error("Failed to bind symbol '{symbol}': {message}")]
    BindFailed { symbol: String, message: String },

    /// The binding service cannot marshal the requested signature
    #[error("Unsupported native signature for '{symbol}': ({params}) -> {result}")]
    UnsupportedSignature {
        symbol: String,
        params: String,
        result: String,
    },

    /// A bound callable was invoked with bad arguments
    #[error("Invalid call to '{function}': {message}")]
    InvalidCall { function: String, message: String },

    /// The host environment refused a namespace binding
    #[error("Host rejected global binding '{binding}': {message}")]
    HostExposure { binding: String, message: String },
}

impl Error {
    /// Create a manifest not found error
    pub fn manifest_not_found(path: impl Into<String>) -> Self {
        Self::ManifestNotFound { path: path.into() }
    }

    /// Create an invalid manifest error
    pub fn invalid_manifest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a library load error
    pub fn library_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LibraryLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a bind failure error
    pub fn bind_failed(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BindFailed {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Create an invalid call error
    pub fn invalid_call(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCall {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Create a host exposure error
    pub fn host_exposure(binding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HostExposure {
            binding: binding.into(),
            message: message.into(),
        }
    }
}
