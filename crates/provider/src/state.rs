//! Host State Management
//!
//! Handles encoding and decoding of resource state using msgpack, and the
//! typed record the resource adapters read from and write to.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute holding the resource identifier
pub const ID_ATTR: &str = "id";

/// State encoding errors
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to decode state: {0}")]
    Decode(String),

    #[error("Failed to encode state: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

/// Dynamic value that can be encoded/decoded from host state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<DynamicValue>),
    Map(HashMap<String, DynamicValue>),
}

impl DynamicValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynamicValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, DynamicValue>> {
        match self {
            DynamicValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_map()?.get(key)
    }
}

impl Default for DynamicValue {
    fn default() -> Self {
        DynamicValue::Null
    }
}

/// Decode a host DynamicValue from msgpack bytes, accepting JSON as well
pub fn decode_dynamic_value(data: &[u8]) -> Result<DynamicValue, StateError> {
    if data.is_empty() {
        return Ok(DynamicValue::Null);
    }

    // State is always a map or nil; in msgpack '{' would be a bare fixint
    if data[0] == b'{' {
        return serde_json::from_slice(data).map_err(|e| StateError::Decode(e.to_string()));
    }

    rmp_serde::from_slice(data).map_err(|e| StateError::Decode(e.to_string()))
}

/// Encode a value to host DynamicValue msgpack bytes
pub fn encode_dynamic_value(value: &DynamicValue) -> Result<Vec<u8>, StateError> {
    Ok(rmp_serde::to_vec(value)?)
}

/// Helper to extract a string attribute from a DynamicValue
pub fn get_string_attr(value: &DynamicValue, key: &str) -> String {
    value.get(key)
        .and_then(|v| v.as_string())
        .unwrap_or("")
        .to_string()
}

/// Helper to extract an optional string attribute from a DynamicValue
pub fn get_optional_string_attr(value: &DynamicValue, key: &str) -> Option<String> {
    value.get(key)
        .and_then(|v| match v {
            DynamicValue::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
}

/// Helper to extract an integer attribute from a DynamicValue
pub fn get_int_attr(value: &DynamicValue, key: &str) -> Option<i64> {
    value.get(key).and_then(|v| v.as_i64())
}

/// Helper to extract a bool attribute from a DynamicValue
pub fn get_bool_attr(value: &DynamicValue, key: &str) -> Option<bool> {
    value.get(key).and_then(|v| v.as_bool())
}

/// Create a DynamicValue map with the given attributes
pub fn make_state(attrs: Vec<(&str, DynamicValue)>) -> DynamicValue {
    let mut map = HashMap::new();
    for (key, value) in attrs {
        map.insert(key.to_string(), value);
    }
    DynamicValue::Map(map)
}

/// Create a string DynamicValue
pub fn string_value(s: impl Into<String>) -> DynamicValue {
    DynamicValue::String(s.into())
}

/// Create a bool DynamicValue
pub fn bool_value(b: bool) -> DynamicValue {
    DynamicValue::Bool(b)
}

/// Create a number DynamicValue from i64
pub fn int_value(n: i64) -> DynamicValue {
    DynamicValue::Number(serde_json::Number::from(n))
}

/// Mutable state record for one resource instance.
///
/// Holds the identifier slot separately from the declared attributes; an
/// empty identifier means the resource is not tracked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attrs: HashMap<String, DynamicValue>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a host state value
    pub fn from_value(value: &DynamicValue) -> Self {
        let mut attrs = value.as_map().cloned().unwrap_or_default();
        let id = attrs
            .remove(ID_ATTR)
            .and_then(|v| v.as_string().map(str::to_string))
            .unwrap_or_default();
        Self { id, attrs }
    }

    /// Render the record as a host state value, identifier included
    pub fn to_value(&self) -> DynamicValue {
        let mut map = self.attrs.clone();
        map.insert(ID_ATTR.to_string(), string_value(&self.id));
        DynamicValue::Map(map)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.attrs.get(key)
    }

    /// String attribute, `None` when unset or null
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(|v| v.as_string())
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.insert(key.to_string(), string_value(value));
    }
}
