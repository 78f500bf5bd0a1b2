//! Runtime operations against hosts
//!
//! ## Module Structure
//!
//! - `pending`: Hosts and servers with an action in flight
//! - `dialog`: The [`Confirmation`] seam asked before every action
//! - `timeout`: [`TimeoutHandler`], pinging until a target answers again
//! - `host_actions`: [`HostActions`], reload and restart of hosts

mod dialog;
mod host_actions;
mod pending;
mod timeout;

pub use dialog::{AutoConfirm, Confirmation};
pub use host_actions::{
    ActionCallbacks, AfterAction, BeforeAction, HostActionOutcome, HostActions, host_timeout, ping,
};
pub use pending::PendingActions;
pub use timeout::{Ping, PollOutcome, TimeoutHandler};
