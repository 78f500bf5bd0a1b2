//! Confirmation seam

use async_trait::async_trait;
use tracing::debug;

/// Asks the user before a mutating action is fired
#[async_trait]
pub trait Confirmation: Send + Sync {
    /// `true` if the user confirmed
    async fn confirm(&self, title: &str, question: &str) -> bool;
}

/// Confirms everything, for headless sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, title: &str, _question: &str) -> bool {
        debug!("Auto confirming '{}'", title);
        true
    }
}
