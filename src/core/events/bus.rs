//! Broadcast event bus

use super::types::{ConsoleEvent, Message};
use tokio::sync::broadcast;
use tracing::debug;

/// Broadcasts console events to every subscriber
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ConsoleEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish an event; having no subscribers is fine
    pub fn publish(&self, event: ConsoleEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            debug!("No subscribers for event {:?}", event);
        }
    }

    pub fn notify(&self, message: Message) {
        self.publish(ConsoleEvent::Message(message));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.notify(Message::success(text));
    }

    pub fn info(&self, text: impl Into<String>) {
        self.notify(Message::info(text));
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.notify(Message::warning(text));
    }

    pub fn error(&self, text: impl Into<String>, details: Option<String>) {
        let mut message = Message::error(text);
        message.details = details;
        self.notify(message);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
