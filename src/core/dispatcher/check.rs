//! Resource existence probe

use super::Dispatcher;
use crate::core::dmr::constants::READ_RESOURCE_OPERATION;
use crate::core::dmr::{Operation, ResourceAddress};
use crate::utils::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a resource exists, as reported by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    Exists,
    Absent,
}

impl ResourceStatus {
    /// HTTP-like status code of the probe (200 or 404)
    pub fn code(self) -> u16 {
        match self {
            Self::Exists => 200,
            Self::Absent => 404,
        }
    }

    pub fn exists(self) -> bool {
        self == Self::Exists
    }
}

/// Probe `address` with a read-resource
///
/// A failed outcome means the resource is absent. Transport errors propagate.
pub async fn check_resource(
    dispatcher: &dyn Dispatcher,
    address: &ResourceAddress,
) -> Result<ResourceStatus> {
    let operation = Operation::new(address.clone(), READ_RESOURCE_OPERATION);
    let status = match dispatcher.execute(operation).await {
        Ok(_) => ResourceStatus::Exists,
        Err(ConsoleError::Operation(_)) => ResourceStatus::Absent,
        Err(e) => return Err(e),
    };

    debug!("Checked {}: {}", address, status.code());
    Ok(status)
}
