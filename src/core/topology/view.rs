//! Element tree of the topology table
//!
//! Rows are hosts, columns server groups and cells the servers of a host in
//! a group. Elements are located through their data attributes, the same way
//! the rendered table is queried.

use super::model::{Host, Server, ServerGroup};
use super::reader::Topology;
use super::status::{status_css, WITH_PROGRESS};
use crate::core::access_control::ids::build_id;
use crate::core::runtime::PendingActions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DATA_HOST: &str = "data-host";
pub const DATA_SERVER_GROUP: &str = "data-server-group";
pub const DATA_SERVERS: &str = "data-servers";
pub const DATA_SERVER: &str = "data-server";

pub const SELECTED: &str = "selected";
pub const DISCONNECTED: &str = "disconnected";
pub const DOMAIN_CONTROLLER: &str = "domain-controller";
pub const EMPTY: &str = "empty";
pub const ROW_HEADER: &str = "row-header";
pub const SERVER: &str = "server";
pub const SERVERS: &str = "servers";
pub const TOPOLOGY: &str = "topology";

/// A node of the rendered table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    tag: String,
    classes: BTreeSet<String>,
    data: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn data_value(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First element in document order matching `predicate`
    pub fn find<P: Fn(&Element) -> bool>(&self, predicate: &P) -> Option<&Element> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    /// Every element in document order matching `predicate`
    pub fn find_all<P: Fn(&Element) -> bool>(&self, predicate: &P) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(predicate, &mut found);
        found
    }

    fn collect<'a, P: Fn(&Element) -> bool>(&'a self, predicate: &P, found: &mut Vec<&'a Element>) {
        if predicate(self) {
            found.push(self);
        }
        for child in &self.children {
            child.collect(predicate, found);
        }
    }

    /// Apply `f` to every element matching `predicate`
    pub fn for_each_mut<P, F>(&mut self, predicate: &P, f: &mut F)
    where
        P: Fn(&Element) -> bool,
        F: FnMut(&mut Element),
    {
        if predicate(self) {
            f(self);
        }
        for child in &mut self.children {
            child.for_each_mut(predicate, f);
        }
    }

    /// Swap the first child matching `predicate` for `replacement`, keeping its position
    ///
    /// Returns the replaced element.
    pub fn replace_child<P: Fn(&Element) -> bool>(
        &mut self,
        predicate: &P,
        replacement: Element,
    ) -> Option<Element> {
        let mut replacement = Some(replacement);
        self.replace_inner(predicate, &mut replacement)
    }

    fn replace_inner<P: Fn(&Element) -> bool>(
        &mut self,
        predicate: &P,
        replacement: &mut Option<Element>,
    ) -> Option<Element> {
        for child in &mut self.children {
            if predicate(child) {
                let new = replacement.take()?;
                return Some(std::mem::replace(child, new));
            }
            if let Some(old) = child.replace_inner(predicate, replacement) {
                return Some(old);
            }
        }
        None
    }
}

/// Stable lookup of a rendered entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Host(String),
    ServerGroup(String),
    /// The cell of a host and server group
    Servers { host: String, server_group: String },
    /// A server by id
    Server(String),
}

impl Selector {
    pub fn host(host: &Host) -> Self {
        Self::Host(host.name().to_string())
    }

    pub fn server_group(group: &ServerGroup) -> Self {
        Self::ServerGroup(group.name().to_string())
    }

    pub fn server(server: &Server) -> Self {
        Self::Server(server.id())
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Host(name) => element.data_value(DATA_HOST) == Some(name.as_str()),
            Self::ServerGroup(name) => element.data_value(DATA_SERVER_GROUP) == Some(name.as_str()),
            Self::Servers { host, server_group } => {
                element.data_value(DATA_SERVERS) == Some(servers_id(host, server_group).as_str())
            }
            Self::Server(id) => element.data_value(DATA_SERVER) == Some(id.as_str()),
        }
    }

    /// The selector an element was rendered for
    pub fn of(element: &Element) -> Option<Self> {
        if let Some(id) = element.data_value(DATA_SERVER) {
            Some(Self::Server(id.to_string()))
        } else if let Some(name) = element.data_value(DATA_HOST) {
            Some(Self::Host(name.to_string()))
        } else {
            element
                .data_value(DATA_SERVER_GROUP)
                .map(|name| Self::ServerGroup(name.to_string()))
        }
    }
}

fn servers_id(host: &str, server_group: &str) -> String {
    build_id(&[host, server_group])
}

/// The rendered topology plus loading state
#[derive(Debug, Clone, Default)]
pub struct TopologyView {
    table: Option<Element>,
    loading: bool,
    visible: bool,
}

impl TopologyView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&Element> {
        self.table.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible && self.table.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn show_loading(&mut self) {
        self.loading = true;
    }

    pub fn hide_loading(&mut self) {
        self.loading = false;
    }

    /// Replace the whole table
    pub fn render(&mut self, topology: &Topology, pending: &PendingActions) {
        self.table = Some(table_element(topology, pending));
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn lookup(&self, selector: &Selector) -> Option<&Element> {
        self.table
            .as_ref()
            .and_then(|table| table.find(&|element: &Element| selector.matches(element)))
    }

    /// The currently selected entity
    pub fn selection(&self) -> Option<Selector> {
        self.table
            .as_ref()
            .and_then(|table| table.find(&|element: &Element| element.has_class(SELECTED)))
            .and_then(Selector::of)
    }

    pub fn clear_selection(&mut self) {
        if let Some(table) = self.table.as_mut() {
            table.for_each_mut(&|element: &Element| element.has_class(SELECTED), &mut |element: &mut Element| {
                element.remove_class(SELECTED)
            });
        }
    }

    /// Select the element of `selector`; returns `false` if it is not rendered
    pub fn select(&mut self, selector: &Selector) -> bool {
        self.clear_selection();
        let mut found = false;
        if let Some(table) = self.table.as_mut() {
            table.for_each_mut(&|element: &Element| selector.matches(element), &mut |element: &mut Element| {
                if !found {
                    element.add_class(SELECTED);
                    found = true;
                }
            });
        }
        found
    }

    /// Swap the element of `selector` for `replacement`, keeping its selection
    pub fn replace(&mut self, selector: &Selector, mut replacement: Element) -> bool {
        let Some(table) = self.table.as_mut() else {
            return false;
        };
        let Some(existing) = table.find(&|element: &Element| selector.matches(element)) else {
            return false;
        };
        if existing.has_class(SELECTED) {
            replacement.add_class(SELECTED);
        }
        table
            .replace_child(&|element: &Element| selector.matches(element), replacement)
            .is_some()
    }

    pub fn start_progress(&mut self, selector: &Selector) {
        self.update_matching(selector, |element| element.add_class(WITH_PROGRESS));
    }

    pub fn stop_progress(&mut self, selector: &Selector) {
        self.update_matching(selector, |element| element.remove_class(WITH_PROGRESS));
    }

    fn update_matching<F: FnMut(&mut Element)>(&mut self, selector: &Selector, mut f: F) {
        if let Some(table) = self.table.as_mut() {
            table.for_each_mut(&|element: &Element| selector.matches(element), &mut f);
        }
    }
}

fn table_element(topology: &Topology, pending: &PendingActions) -> Element {
    let mut header = Element::new("tr").child(Element::new("th").class(EMPTY));
    for group in &topology.server_groups {
        header = header.child(server_group_element(group));
    }

    let mut body = Element::new("tbody");
    for host in &topology.hosts {
        let mut row = Element::new("tr").child(host_element(host, pending));
        for group in &topology.server_groups {
            row = row.child(servers_element(host, group, pending));
        }
        body = body.child(row);
    }

    Element::new("table")
        .class(TOPOLOGY)
        .child(Element::new("thead").child(header))
        .child(body)
}

pub fn host_element(host: &Host, pending: &PendingActions) -> Element {
    let mut element = Element::new("th")
        .class(ROW_HEADER)
        .data(DATA_HOST, host.name())
        .text(host.name());
    if pending.is_pending(host.name()) {
        element.add_class(WITH_PROGRESS);
    }
    if !host.is_connected() {
        element.add_class(DISCONNECTED);
    }
    if host.is_domain_controller() {
        element.add_class(DOMAIN_CONTROLLER);
    }
    element
}

pub fn server_group_element(group: &ServerGroup) -> Element {
    Element::new("th")
        .data(DATA_SERVER_GROUP, group.name())
        .text(group.name())
}

pub fn server_element(server: &Server, pending: &PendingActions) -> Element {
    let mut element = Element::new("div")
        .class(SERVER)
        .data(DATA_SERVER, server.id())
        .text(server.name());
    for class in status_css(server, pending.is_server_pending(&server.id())) {
        element.add_class(class);
    }
    element
}

fn servers_element(host: &Host, group: &ServerGroup, pending: &PendingActions) -> Element {
    let cell = Element::new("td").data(DATA_SERVERS, servers_id(host.name(), group.name()));
    let servers = group.servers_of(host.name());
    if servers.is_empty() {
        return cell.class(EMPTY);
    }

    let mut container = Element::new("div").class(SERVERS);
    for server in servers {
        container = container.child(server_element(server, pending));
    }
    cell.child(container)
}
