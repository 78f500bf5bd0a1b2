//! Polling until a host answers again

use crate::core::dispatcher::Dispatcher;
use crate::core::dmr::{Composite, Operation};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

/// A lightweight read that succeeds once the target is reachable
#[derive(Debug, Clone)]
pub enum Ping {
    Single(Operation),
    Composite(Composite),
}

impl Ping {
    async fn send(&self, dispatcher: &dyn Dispatcher) -> Result<()> {
        match self {
            Self::Single(operation) => dispatcher.execute(operation.clone()).await.map(|_| ()),
            Self::Composite(composite) => dispatcher
                .execute_composite(composite.clone())
                .await
                .map(|_| ()),
        }
    }
}

/// How polling ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded,
    TimedOut,
}

/// Repeats a ping every interval until it succeeds or the budget is used up
pub struct TimeoutHandler {
    dispatcher: Arc<dyn Dispatcher>,
    budget: Duration,
    interval: Duration,
}

impl TimeoutHandler {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, budget: Duration, interval: Duration) -> Self {
        Self {
            dispatcher,
            budget,
            interval,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Poll with `ping`; the first ping is sent one interval after the start
    pub async fn execute(&self, ping: &Ping) -> PollOutcome {
        let started = Instant::now();
        let poll = async {
            let mut attempts = 0u32;
            loop {
                sleep(self.interval).await;
                attempts += 1;
                match ping.send(self.dispatcher.as_ref()).await {
                    Ok(()) => return attempts,
                    Err(e) => debug!("Ping {} failed: {}", attempts, e),
                }
            }
        };

        match timeout(self.budget, poll).await {
            Ok(attempts) => {
                info!(
                    "Target answered after {} pings in {:?}",
                    attempts,
                    started.elapsed()
                );
                PollOutcome::Succeeded
            }
            Err(_) => {
                warn!("No answer within {:?}", self.budget);
                PollOutcome::TimedOut
            }
        }
    }
}
