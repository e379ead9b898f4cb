//! Native type tokens handed to the binding service

use serde::{Deserialize, Serialize};

/// Type token understood by a native binding service.
///
/// Logical manifest type names are translated through a fixed alias table;
/// anything the table does not know passes through unchanged as `Raw`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeType {
    /// NUL-terminated C string
    CString,
    /// 64-bit float
    Double,
    Bool,
    Void,
    /// Unrecognized type name, forwarded verbatim
    Raw(String),
}

impl NativeType {
    /// Translate a logical type name from a manifest
    pub fn from_alias(name: &str) -> Self {
        match name {
            "string" | "cstring" => Self::CString,
            "f64" | "double" => Self::Double,
            "bool" => Self::Bool,
            "void" => Self::Void,
            other => Self::Raw(other.to_string()),
        }
    }

    /// Translate an ordered list of logical parameter names
    pub fn from_aliases<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names.iter().map(|n| Self::from_alias(n.as_ref())).collect()
    }

    /// Token string as seen by the binding service
    pub fn token(&self) -> &str {
        match self {
            Self::CString => "cstring",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Void => "void",
            Self::Raw(name) => name,
        }
    }
}

impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Render a parameter list for diagnostics, e.g. `double, double`
pub fn format_signature(params: &[NativeType]) -> String {
    params
        .iter()
        .map(NativeType::token)
        .collect::<Vec<_>>()
        .join(", ")
}
