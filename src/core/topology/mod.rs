//! Runtime topology of a managed domain
//!
//! Hosts, server groups and servers are read from the management model and
//! rendered as a table of hosts by server groups. Updates rebuild the table
//! and keep the selected element; single entities can be swapped in place.
//!
//! ## Module Structure
//!
//! - `model`: Hosts, server groups, servers and their states
//! - `status`: Server status classification and its markers
//! - `reader`: [`TopologyReader`] and the [`Topology`] it returns
//! - `view`: The element tree standing in for the rendered table
//! - `preview`: [`TopologyPreview`], fetch, render and event handling

pub mod model;
mod preview;
mod reader;
pub mod status;
pub mod view;

pub use model::{
    Host, RunningMode, RunningState, Server, ServerConfigStatus, ServerGroup, SuspendState,
};
pub use preview::TopologyPreview;
pub use reader::{Topology, TopologyReader};
pub use status::ServerStatus;
pub use view::{Element, Selector, TopologyView};
