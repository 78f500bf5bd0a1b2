//! Accessors on model nodes

use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Convenience accessors for management payloads
pub trait ModelNodeExt {
    /// Named children of an object node
    ///
    /// Accepts objects and lists of single-entry objects; anything else yields
    /// an empty list.
    fn property_list(&self) -> Vec<(&str, &Value)>;

    /// Whether `key` is present and not undefined
    fn has_defined(&self, key: &str) -> bool;

    /// The strings of the list attribute `key`
    fn string_list(&self, key: &str) -> Vec<String>;

    fn bool_or(&self, key: &str, default: bool) -> bool;

    fn str_of(&self, key: &str) -> Option<&str>;

    /// Parse the string attribute `key`, falling back when it is missing or unknown
    fn enum_or<T: FromStr>(&self, key: &str, default: T) -> T;
}

impl ModelNodeExt for Value {
    fn property_list(&self) -> Vec<(&str, &Value)> {
        match self {
            Value::Object(object) => object
                .iter()
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_object)
                .filter(|object| object.len() == 1)
                .filter_map(|object| object.iter().next())
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn has_defined(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::String(value)) => value.parse().unwrap_or(default),
            _ => default,
        }
    }

    fn str_of(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn enum_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.str_of(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Unknown value '{}' for attribute {}", raw, key);
                default
            }),
            None => default,
        }
    }
}
