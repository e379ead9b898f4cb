//! Structured serialization hooks
//!
//! Extensions that declare `serialize` / `deserialize` hooks get these
//! operations bound directly into their bag instead of going through the
//! native binding path. Byte sequences cross the namespace as JSON arrays
//! of numbers.

use crate::namespace::Callable;
use serde_json::Value;
use std::sync::Arc;
use titan_core::types::SerializationHook;
use titan_core::{Error, Result};

/// Process-wide value serializer
pub trait SerializationService: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>>;
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;
}

/// Serializer producing UTF-8 JSON bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerialization;

impl SerializationService for JsonSerialization {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Callable exposing one serialization hook
pub fn hook_callable(
    service: Arc<dyn SerializationService>,
    hook: SerializationHook,
) -> Arc<dyn Callable> {
    match hook {
        SerializationHook::Serialize => Arc::new(move |args: &[Value]| -> Result<Value> {
            let value = args.first().unwrap_or(&Value::Null);
            let bytes = service.serialize(value)?;
            Ok(Value::Array(bytes.into_iter().map(Value::from).collect()))
        }),
        SerializationHook::Deserialize => Arc::new(move |args: &[Value]| -> Result<Value> {
            let bytes = args
                .first()
                .map(bytes_from_value)
                .transpose()?
                .ok_or_else(|| Error::invalid_call("deserialize", "missing byte array"))?;
            service.deserialize(&bytes)
        }),
    }
}

fn bytes_from_value(value: &Value) -> Result<Vec<u8>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::invalid_call("deserialize", "argument is not a byte array"))?;
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| Error::invalid_call("deserialize", "byte out of range"))
        })
        .collect()
}
