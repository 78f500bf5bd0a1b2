//! Operation results

use super::constants::{FAILED, FAILURE_DESCRIPTION, OUTCOME, RESULT, SUCCESS};
use crate::utils::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

static UNDEFINED: Value = Value::Null;

/// Outcome flag of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failed,
}

/// Result of a single operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub outcome: Outcome,
    pub result: Value,
    pub failure_description: Option<String>,
}

impl OperationResult {
    pub fn success(result: Value) -> Self {
        Self {
            outcome: Outcome::Success,
            result,
            failure_description: None,
        }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            result: Value::Null,
            failure_description: Some(description.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failed
    }

    /// Parse a response envelope (`outcome`, `result`, `failure-description`)
    pub fn from_model(node: &Value) -> Result<Self> {
        let outcome = match node.get(OUTCOME).and_then(Value::as_str) {
            Some(SUCCESS) => Outcome::Success,
            Some(FAILED) => Outcome::Failed,
            other => {
                return Err(ConsoleError::parsing(format!(
                    "Missing or unknown outcome: {:?}",
                    other
                )));
            }
        };

        let failure_description = node.get(FAILURE_DESCRIPTION).map(|description| {
            description
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| description.to_string())
        });

        Ok(Self {
            outcome,
            result: node.get(RESULT).cloned().unwrap_or(Value::Null),
            failure_description,
        })
    }

    /// The payload on success, an operation error otherwise
    pub fn into_result(self) -> Result<Value> {
        match self.outcome {
            Outcome::Success => Ok(self.result),
            Outcome::Failed => Err(ConsoleError::operation(
                self.failure_description
                    .unwrap_or_else(|| "Operation failed".to_string()),
            )),
        }
    }
}

/// Results of a composite, positionally indexed like its operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeResult {
    steps: Vec<OperationResult>,
}

impl CompositeResult {
    pub fn new(steps: Vec<OperationResult>) -> Self {
        Self { steps }
    }

    /// Payload of the step at `index`; undefined when out of range
    pub fn step(&self, index: usize) -> &Value {
        self.steps
            .get(index)
            .map(|step| &step.result)
            .unwrap_or(&UNDEFINED)
    }

    pub fn get(&self, index: usize) -> Option<&OperationResult> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperationResult> {
        self.steps.iter()
    }

    /// Parse the payload of a composite response (`step-1`, `step-2`, ...)
    pub fn from_model(result: &Value) -> Result<Self> {
        let Some(object) = result.as_object() else {
            return Ok(Self::default());
        };

        let mut steps = Vec::with_capacity(object.len());
        let mut index = 1;
        while let Some(step) = object.get(&format!("step-{}", index)) {
            steps.push(OperationResult::from_model(step)?);
            index += 1;
        }
        Ok(Self { steps })
    }
}

impl From<Vec<OperationResult>> for CompositeResult {
    fn from(steps: Vec<OperationResult>) -> Self {
        Self { steps }
    }
}
