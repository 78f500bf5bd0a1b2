//! In-memory management model
//!
//! A [`Dispatcher`] backed by a tree of resources. It understands the
//! operations the console sends, rolls composites back on the first failed
//! step and records every operation it receives.

use async_trait::async_trait;
use hal_console::core::dmr::constants::{
    ADD, CHILD_TYPE, NAME, READ_BOOT_ERRORS, READ_CHILDREN_NAMES_OPERATION,
    READ_CHILDREN_RESOURCES_OPERATION, READ_RESOURCE_OPERATION, RECURSIVE, RELOAD, REMOVE,
    SHUTDOWN, UNDEFINE_ATTRIBUTE_OPERATION, VALUE, WRITE_ATTRIBUTE_OPERATION,
};
use hal_console::{
    Composite, CompositeResult, ConsoleError, Dispatcher, Operation, OperationResult,
    ResourceAddress, Result,
};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

type Key = Vec<(String, String)>;

fn key(address: &ResourceAddress) -> Key {
    address.segments().to_vec()
}

/// Management model kept in memory
pub struct ManagementModel {
    resources: Mutex<BTreeMap<Key, Map<String, Value>>>,
    requests: Mutex<Vec<Operation>>,
    composites: AtomicUsize,
    /// Reads failing after the next reload or shutdown
    outage: AtomicUsize,
    remaining_outage: AtomicUsize,
}

impl ManagementModel {
    pub fn new() -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(Vec::new(), Map::new());
        Self {
            resources: Mutex::new(resources),
            requests: Mutex::new(Vec::new()),
            composites: AtomicUsize::new(0),
            outage: AtomicUsize::new(0),
            remaining_outage: AtomicUsize::new(0),
        }
    }

    /// Add a resource, creating missing parents; `address` is in `/type=name` form
    pub fn with(self, address: &str, attributes: Value) -> Self {
        self.insert(address, attributes);
        self
    }

    pub fn insert(&self, address: &str, attributes: Value) {
        let address = parse(address);
        let mut resources = self.resources.lock();
        let segments = key(&address);
        for end in 1..segments.len() {
            resources.entry(segments[..end].to_vec()).or_default();
        }
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        resources.insert(segments, attributes);
    }

    /// Let `reads` reads fail after each reload or shutdown
    pub fn unreachable_after_action(self, reads: usize) -> Self {
        self.outage.store(reads, Ordering::SeqCst);
        self
    }

    /// Remove a resource and everything below it
    pub fn remove(&self, address: &str) {
        let segments = key(&parse(address));
        self.resources
            .lock()
            .retain(|existing, _| !existing.starts_with(&segments));
    }

    pub fn exists(&self, address: &str) -> bool {
        self.resources.lock().contains_key(&key(&parse(address)))
    }

    pub fn attribute(&self, address: &str, name: &str) -> Option<Value> {
        self.resources
            .lock()
            .get(&key(&parse(address)))
            .and_then(|attributes| attributes.get(name).cloned())
    }

    /// Every operation received, composites flattened
    pub fn requests(&self) -> Vec<Operation> {
        self.requests.lock().clone()
    }

    /// Names of the operations received
    pub fn operation_names(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|operation| operation.name().to_string())
            .collect()
    }

    /// Number of mutating operations received
    pub fn writes(&self) -> usize {
        self.requests()
            .iter()
            .filter(|operation| {
                [ADD, REMOVE, WRITE_ATTRIBUTE_OPERATION, UNDEFINE_ATTRIBUTE_OPERATION]
                    .contains(&operation.name())
            })
            .count()
    }

    pub fn composites(&self) -> usize {
        self.composites.load(Ordering::SeqCst)
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
        self.composites.store(0, Ordering::SeqCst);
    }

    fn apply(
        &self,
        resources: &mut BTreeMap<Key, Map<String, Value>>,
        operation: &Operation,
    ) -> Result<Value> {
        let address = key(operation.address());
        match operation.name() {
            READ_RESOURCE_OPERATION => resources
                .get(&address)
                .map(|attributes| Value::Object(attributes.clone()))
                .ok_or_else(|| not_found(operation.address())),
            READ_CHILDREN_NAMES_OPERATION => {
                require(resources, operation.address())?;
                let child_type = param_str(operation, CHILD_TYPE)?;
                let names: Vec<Value> = children(resources, &address, child_type)
                    .into_iter()
                    .map(|(name, _)| Value::String(name))
                    .collect();
                Ok(Value::Array(names))
            }
            READ_CHILDREN_RESOURCES_OPERATION => {
                require(resources, operation.address())?;
                let child_type = param_str(operation, CHILD_TYPE)?;
                let recursive = operation.param(RECURSIVE).and_then(Value::as_bool) == Some(true);
                let mut result = Map::new();
                for (name, child) in children(resources, &address, child_type) {
                    result.insert(name, describe(resources, &child, recursive));
                }
                Ok(Value::Object(result))
            }
            READ_BOOT_ERRORS => Ok(json!([])),
            ADD => {
                if resources.contains_key(&address) {
                    return Err(ConsoleError::operation(format!(
                        "WFLYCTL0212: Duplicate resource {}",
                        operation.address()
                    )));
                }
                if !resources.contains_key(&address[..address.len().saturating_sub(1)]) {
                    return Err(not_found(&operation.address().parent()));
                }
                resources.insert(address, operation.params().clone());
                Ok(Value::Null)
            }
            REMOVE => {
                require(resources, operation.address())?;
                resources.retain(|existing, _| !existing.starts_with(&address));
                Ok(Value::Null)
            }
            WRITE_ATTRIBUTE_OPERATION => {
                let name = param_str(operation, NAME)?.to_string();
                let value = operation.param(VALUE).cloned().unwrap_or(Value::Null);
                resources
                    .get_mut(&address)
                    .ok_or_else(|| not_found(operation.address()))?
                    .insert(name, value);
                Ok(Value::Null)
            }
            UNDEFINE_ATTRIBUTE_OPERATION => {
                let name = param_str(operation, NAME)?.to_string();
                resources
                    .get_mut(&address)
                    .ok_or_else(|| not_found(operation.address()))?
                    .insert(name, Value::Null);
                Ok(Value::Null)
            }
            RELOAD | SHUTDOWN => {
                require(resources, operation.address())?;
                self.remaining_outage
                    .store(self.outage.load(Ordering::SeqCst), Ordering::SeqCst);
                Ok(Value::Null)
            }
            other => Err(ConsoleError::operation(format!(
                "WFLYCTL0031: No operation named '{}' exists",
                other
            ))),
        }
    }

    /// Consume one failed read while the target is down
    fn in_outage(&self, operation: &Operation) -> bool {
        if operation.name() != READ_RESOURCE_OPERATION {
            return false;
        }
        self.remaining_outage
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

impl Default for ManagementModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for ManagementModel {
    async fn execute(&self, operation: Operation) -> Result<Value> {
        self.requests.lock().push(operation.clone());
        if self.in_outage(&operation) {
            return Err(ConsoleError::dispatch("Connection refused"));
        }
        let mut resources = self.resources.lock();
        self.apply(&mut resources, &operation)
    }

    async fn execute_composite(&self, composite: Composite) -> Result<CompositeResult> {
        self.composites.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().extend(composite.iter().cloned());
        if composite.iter().any(|operation| self.in_outage(operation)) {
            return Err(ConsoleError::dispatch("Connection refused"));
        }

        let mut resources = self.resources.lock();
        let before = resources.clone();
        let mut steps = Vec::with_capacity(composite.len());
        for (index, operation) in composite.iter().enumerate() {
            match self.apply(&mut resources, operation) {
                Ok(result) => steps.push(OperationResult::success(result)),
                Err(e) => {
                    *resources = before;
                    return Err(ConsoleError::operation(format!(
                        "WFLYCTL0062: Composite operation failed and was rolled back. \
                         Steps that failed: step-{}: {}",
                        index + 1,
                        e.user_message()
                    )));
                }
            }
        }
        Ok(CompositeResult::new(steps))
    }
}

fn parse(address: &str) -> ResourceAddress {
    ResourceAddress::from_str(address).unwrap_or_else(|e| panic!("Bad address {}: {}", address, e))
}

fn not_found(address: &ResourceAddress) -> ConsoleError {
    ConsoleError::operation(format!(
        "WFLYCTL0216: Management resource '{}' not found",
        address
    ))
}

fn require(resources: &BTreeMap<Key, Map<String, Value>>, address: &ResourceAddress) -> Result<()> {
    if resources.contains_key(&key(address)) {
        Ok(())
    } else {
        Err(not_found(address))
    }
}

fn param_str<'a>(operation: &'a Operation, name: &str) -> Result<&'a str> {
    operation
        .param(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ConsoleError::operation(format!("WFLYCTL0155: '{}' may not be null", name)))
}

/// Direct children of `parent` with the given type, by name
fn children(
    resources: &BTreeMap<Key, Map<String, Value>>,
    parent: &Key,
    child_type: &str,
) -> Vec<(String, Key)> {
    resources
        .keys()
        .filter(|candidate| {
            candidate.len() == parent.len() + 1
                && candidate.starts_with(parent)
                && candidate[parent.len()].0 == child_type
        })
        .map(|candidate| (candidate[parent.len()].1.clone(), candidate.clone()))
        .collect()
}

/// Attributes of a resource, plus its children grouped by type when `recursive`
fn describe(resources: &BTreeMap<Key, Map<String, Value>>, address: &Key, recursive: bool) -> Value {
    let mut node = resources.get(address).cloned().unwrap_or_default();
    if recursive {
        let child_types: Vec<String> = resources
            .keys()
            .filter(|candidate| candidate.len() == address.len() + 1 && candidate.starts_with(address))
            .map(|candidate| candidate[address.len()].0.clone())
            .collect();
        for child_type in child_types {
            let mut grouped = Map::new();
            for (name, child) in children(resources, address, &child_type) {
                grouped.insert(name, describe(resources, &child, true));
            }
            node.insert(child_type, Value::Object(grouped));
        }
    }
    Value::Object(node)
}
