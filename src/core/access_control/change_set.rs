//! Operations from attribute change sets
//!
//! Forms report the attributes a user changed as a map from attribute name
//! to new value. [`OperationFactory`] turns such a map into
//! `write-attribute` and `undefine-attribute` operations, taking alternative
//! attributes into account: writing one attribute of a group of alternatives
//! undefines the others.

use crate::core::dmr::constants::{
    NAME, UNDEFINE_ATTRIBUTE_OPERATION, VALUE, WRITE_ATTRIBUTE_OPERATION,
};
use crate::core::dmr::{Operation, ResourceAddress};
use crate::utils::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, error};

/// Description of one attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    /// Default value, if the attribute has one
    #[serde(default)]
    pub default: Option<Value>,
    /// Whether the attribute may be undefined
    #[serde(default = "default_nillable")]
    pub nillable: bool,
    /// Attributes that cannot be defined together with this one
    #[serde(default)]
    pub alternatives: Vec<String>,
}

fn default_nillable() -> bool {
    true
}

/// Attribute descriptions of a resource type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    attributes: HashMap<String, AttributeMetadata>,
}

impl ResourceMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: impl Into<String>, metadata: AttributeMetadata) -> Self {
        self.attributes.insert(name.into(), metadata);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeMetadata> {
        self.attributes.get(name)
    }

    pub fn alternatives(&self, name: &str) -> &[String] {
        self.get(name)
            .map(|attribute| attribute.alternatives.as_slice())
            .unwrap_or_default()
    }

    pub fn is_default_value(&self, name: &str, value: &Value) -> bool {
        self.get(name)
            .and_then(|attribute| attribute.default.as_ref())
            .is_some_and(|default| default == value)
    }

    fn is_nillable(&self, name: &str) -> bool {
        self.get(name).is_none_or(|attribute| attribute.nillable)
    }

    /// Metadata of the scoped role resources
    pub fn scoped_role(scope_attribute: &str) -> Self {
        Self::new()
            .attribute(
                "base-role",
                AttributeMetadata {
                    nillable: false,
                    ..Default::default()
                },
            )
            .attribute(
                scope_attribute,
                AttributeMetadata {
                    nillable: false,
                    ..Default::default()
                },
            )
    }
}

/// Null, empty strings, empty lists and empty objects count as "no value"
pub fn is_null_or_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Builds attribute operations from change sets
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationFactory;

impl OperationFactory {
    pub fn new() -> Self {
        Self
    }

    /// Turn a change set into operations, ordered by attribute name
    ///
    /// Attributes set to a value are written and their alternatives undefined.
    /// If alternatives of each other are changed together, only the one with a
    /// value other than null, empty or its default is written. Undefining an
    /// attribute that is not nillable is rejected.
    pub fn from_change_set(
        &self,
        address: &ResourceAddress,
        change_set: &Map<String, Value>,
        metadata: &ResourceMetadata,
    ) -> Result<Vec<Operation>> {
        let mut operations: BTreeMap<String, Operation> = BTreeMap::new();
        let mut local_changes: BTreeMap<&str, &Value> = change_set
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        let mut conflicts: BTreeSet<&str> = BTreeSet::new();

        for (name, value) in change_set {
            if is_null_or_empty(value) {
                continue;
            }
            let alternatives = metadata.alternatives(name);
            let changed_alternatives: Vec<&str> = alternatives
                .iter()
                .map(String::as_str)
                .filter(|alternative| change_set.contains_key(*alternative))
                .collect();

            if changed_alternatives.is_empty() {
                for alternative in alternatives {
                    if metadata.get(alternative).is_none() {
                        debug!("Skip undefine for unknown alternative {}", alternative);
                        continue;
                    }
                    operations
                        .entry(alternative.clone())
                        .or_insert_with(|| undefine_attribute(address, alternative));
                }
            } else {
                conflicts.insert(name.as_str());
                conflicts.extend(changed_alternatives);
            }

            for alternative in alternatives {
                local_changes.remove(alternative.as_str());
            }
        }

        if !conflicts.is_empty() {
            let (undefine, write): (Vec<&str>, Vec<&str>) =
                conflicts.into_iter().partition(|name| {
                    let value = change_set.get(*name).unwrap_or(&Value::Null);
                    is_null_or_empty(value) || metadata.is_default_value(name, value)
                });
            if write.len() > 1 {
                error!(
                    "More than one conflicting alternative has a value: [{}]",
                    write.join(", ")
                );
            }

            for name in undefine {
                operations
                    .entry(name.to_string())
                    .or_insert_with(|| undefine_attribute(address, name));
                local_changes.remove(name);
            }
            for name in write {
                let value = change_set.get(name).unwrap_or(&Value::Null);
                operations
                    .entry(name.to_string())
                    .or_insert_with(|| write_attribute(address, name, value));
                local_changes.remove(name);
                for alternative in metadata.alternatives(name) {
                    operations
                        .entry(alternative.clone())
                        .or_insert_with(|| undefine_attribute(address, alternative));
                    local_changes.remove(alternative.as_str());
                }
            }
        }

        for (name, value) in local_changes {
            if is_null_or_empty(value) && !metadata.is_nillable(name) {
                return Err(ConsoleError::validation(format!("{} is required", name)));
            }
            operations.entry(name.to_string()).or_insert_with(|| {
                if is_null_or_empty(value) {
                    undefine_attribute(address, name)
                } else {
                    write_attribute(address, name, value)
                }
            });
        }

        Ok(operations.into_values().collect())
    }
}

fn undefine_attribute(address: &ResourceAddress, name: &str) -> Operation {
    Operation::builder(address.clone(), UNDEFINE_ATTRIBUTE_OPERATION)
        .param(NAME, name)
        .build()
}

fn write_attribute(address: &ResourceAddress, name: &str, value: &Value) -> Operation {
    Operation::builder(address.clone(), WRITE_ATTRIBUTE_OPERATION)
        .param(NAME, name)
        .param(VALUE, value.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address() -> ResourceAddress {
        ResourceAddress::root().add("host-scoped-role", "r")
    }

    fn changes(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn summary(operations: &[Operation]) -> Vec<String> {
        operations
            .iter()
            .map(|operation| {
                format!(
                    "{}:{}",
                    operation.name(),
                    operation.param("name").and_then(Value::as_str).unwrap_or("")
                )
            })
            .collect()
    }

    #[test]
    fn test_write_and_undefine() {
        let metadata = ResourceMetadata::new();
        let operations = OperationFactory::new()
            .from_change_set(
                &address(),
                &changes(json!({"hosts": ["master"], "description": ""})),
                &metadata,
            )
            .unwrap();

        assert_eq!(
            summary(&operations),
            vec!["undefine-attribute:description", "write-attribute:hosts"]
        );
        assert_eq!(operations[1].param("value"), Some(&json!(["master"])));
    }

    #[test]
    fn test_alternatives_are_undefined() {
        let metadata = ResourceMetadata::new()
            .attribute(
                "a",
                AttributeMetadata {
                    alternatives: vec!["b".to_string()],
                    ..Default::default()
                },
            )
            .attribute(
                "b",
                AttributeMetadata {
                    alternatives: vec!["a".to_string()],
                    ..Default::default()
                },
            );

        let operations = OperationFactory::new()
            .from_change_set(&address(), &changes(json!({"a": "x"})), &metadata)
            .unwrap();
        assert_eq!(
            summary(&operations),
            vec!["write-attribute:a", "undefine-attribute:b"]
        );
    }

    #[test]
    fn test_conflicting_alternatives_resolve_to_the_one_with_a_value() {
        let metadata = ResourceMetadata::new()
            .attribute(
                "a",
                AttributeMetadata {
                    default: Some(json!(10)),
                    alternatives: vec!["b".to_string()],
                    ..Default::default()
                },
            )
            .attribute(
                "b",
                AttributeMetadata {
                    alternatives: vec!["a".to_string()],
                    ..Default::default()
                },
            );

        let operations = OperationFactory::new()
            .from_change_set(&address(), &changes(json!({"a": 10, "b": "y"})), &metadata)
            .unwrap();
        assert_eq!(
            summary(&operations),
            vec!["undefine-attribute:a", "write-attribute:b"]
        );
    }

    #[test]
    fn test_default_value_without_conflict_is_written() {
        let metadata = ResourceMetadata::new().attribute(
            "a",
            AttributeMetadata {
                default: Some(json!(10)),
                ..Default::default()
            },
        );

        let operations = OperationFactory::new()
            .from_change_set(&address(), &changes(json!({"a": 10})), &metadata)
            .unwrap();
        assert_eq!(summary(&operations), vec!["write-attribute:a"]);
        assert_eq!(operations[0].param("value"), Some(&json!(10)));
    }

    #[test]
    fn test_required_attribute_cannot_be_undefined() {
        let metadata = ResourceMetadata::scoped_role("hosts");
        let result = OperationFactory::new().from_change_set(
            &address(),
            &changes(json!({"hosts": []})),
            &metadata,
        );
        assert!(matches!(result, Err(ConsoleError::Validation(_))));
    }
}
