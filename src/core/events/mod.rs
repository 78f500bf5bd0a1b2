//! Console events and notifications
//!
//! Components never call back into the UI directly. They publish
//! [`ConsoleEvent`]s on the [`EventBus`]; the UI layer subscribes and renders
//! messages, dialogs and progress markers.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{Action, ActionResult, ConsoleEvent, Level, Message};
