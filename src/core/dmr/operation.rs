//! Operations and composites

use super::address::ResourceAddress;
use super::constants::{ADDRESS, COMPOSITE, OPERATION, STEPS};
use serde_json::{Map, Value};
use std::fmt;

/// A single management operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    address: ResourceAddress,
    name: String,
    params: Map<String, Value>,
}

impl Operation {
    /// An operation without parameters
    pub fn new(address: ResourceAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            params: Map::new(),
        }
    }

    pub fn builder(address: ResourceAddress, name: impl Into<String>) -> OperationBuilder {
        OperationBuilder {
            operation: Self::new(address, name),
        }
    }

    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// The operation as the management API encodes it
    pub fn to_model(&self) -> Value {
        let mut node = Map::new();
        node.insert(OPERATION.to_string(), Value::String(self.name.clone()));
        node.insert(ADDRESS.to_string(), self.address.to_model());
        for (key, value) in &self.params {
            node.insert(key.clone(), value.clone());
        }
        Value::Object(node)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.name)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            write!(f, "({})", params.join(","))?;
        }
        Ok(())
    }
}

/// Builder for [`Operation`]
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    operation: Operation,
}

impl OperationBuilder {
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.operation.params.insert(name.into(), value.into());
        self
    }

    /// Add every entry of `payload` as a parameter
    pub fn payload(mut self, payload: Map<String, Value>) -> Self {
        self.operation.params.extend(payload);
        self
    }

    pub fn build(self) -> Operation {
        self.operation
    }
}

/// Operations executed in one request, results indexed by position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    operations: Vec<Operation>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn to_model(&self) -> Value {
        let mut node = Map::new();
        node.insert(OPERATION.to_string(), Value::String(COMPOSITE.to_string()));
        node.insert(ADDRESS.to_string(), Value::Array(Vec::new()));
        node.insert(
            STEPS.to_string(),
            Value::Array(self.operations.iter().map(Operation::to_model).collect()),
        );
        Value::Object(node)
    }
}

impl From<Vec<Operation>> for Composite {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<Operation> for Composite {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Composite {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Composite {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
