//! Resource addresses

use crate::utils::error::{ConsoleError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Address of a resource in the management model
///
/// An ordered list of `(type, name)` segments. The empty list is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceAddress {
    segments: Vec<(String, String)>,
}

impl ResourceAddress {
    pub fn root() -> Self {
        Self::default()
    }

    /// Append a segment
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.segments.push((key.into(), value.into()));
        self
    }

    /// A new address one level below this one
    pub fn child(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.clone().add(key, value)
    }

    /// The address without its last segment; the root is its own parent
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn last_key(&self) -> Option<&str> {
        self.segments.last().map(|(key, _)| key.as_str())
    }

    pub fn last_name(&self) -> Option<&str> {
        self.segments.last().map(|(_, name)| name.as_str())
    }

    pub fn segments(&self) -> &[(String, String)] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `self` is `other` or lies below it
    pub fn starts_with(&self, other: &ResourceAddress) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// The address as the management API encodes it
    pub fn to_model(&self) -> Value {
        Value::Array(
            self.segments
                .iter()
                .map(|(key, name)| {
                    let mut segment = Map::new();
                    segment.insert(key.clone(), Value::String(name.clone()));
                    Value::Object(segment)
                })
                .collect(),
        )
    }

    /// Parse the management API encoding (a list of single-entry objects)
    pub fn from_model(node: &Value) -> Result<Self> {
        match node {
            Value::Null => Ok(Self::root()),
            Value::Array(items) => {
                let mut address = Self::root();
                for item in items {
                    let segment = item
                        .as_object()
                        .filter(|object| object.len() == 1)
                        .and_then(|object| object.iter().next())
                        .ok_or_else(|| {
                            ConsoleError::parsing(format!("Invalid address segment: {}", item))
                        })?;
                    let name = segment.1.as_str().ok_or_else(|| {
                        ConsoleError::parsing(format!("Invalid address segment: {}", item))
                    })?;
                    address = address.add(segment.0.clone(), name);
                }
                Ok(address)
            }
            other => Err(ConsoleError::parsing(format!("Invalid address: {}", other))),
        }
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for (key, name) in &self.segments {
            write!(f, "/{}={}", key, name)?;
        }
        Ok(())
    }
}

impl FromStr for ResourceAddress {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        let mut address = Self::root();
        for part in s.split('/').filter(|part| !part.is_empty()) {
            let (key, name) = part
                .split_once('=')
                .filter(|(key, name)| !key.is_empty() && !name.is_empty())
                .ok_or_else(|| ConsoleError::parsing(format!("Invalid address '{}'", s)))?;
            address = address.add(key, name);
        }
        Ok(address)
    }
}

impl Serialize for ResourceAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_model().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Self::from_model(&node).map_err(D::Error::custom)
    }
}
