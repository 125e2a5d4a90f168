//! Shared fixtures for the widget integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use eva_components::define_all;
use eva_runtime::dom::{EventDetail, EventName, NodeId};
use eva_runtime::{Config, Runtime};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (`RUST_LOG=eva=debug`)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Runtime with every EVA element defined
pub fn runtime() -> Runtime {
    init_tracing();
    let mut rt = Runtime::new(Config::default());
    define_all(&mut rt).unwrap();
    rt
}

/// Detached element with attributes
pub fn create(rt: &mut Runtime, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let node = rt.create_element(tag);
    for (name, value) in attrs {
        rt.set_attribute(node, name, value).unwrap();
    }
    node
}

/// Element with attributes and optional text, appended to `parent`
pub fn child(rt: &mut Runtime, parent: NodeId, tag: &str, attrs: &[(&str, &str)], label: &str) -> NodeId {
    let node = create(rt, tag, attrs);
    if !label.is_empty() {
        let text = rt.create_text(label);
        rt.append_child(node, text).unwrap();
    }
    rt.append_child(parent, node).unwrap();
    node
}

pub fn attach(rt: &mut Runtime, node: NodeId) {
    let body = rt.body();
    rt.append_child(body, node).unwrap();
}

pub fn has(rt: &Runtime, node: NodeId, attr: &str) -> bool {
    rt.has_attribute(node, attr)
}

pub fn attr(rt: &Runtime, node: NodeId, name: &str) -> Option<String> {
    rt.get_attribute(node, name).map(str::to_string)
}

pub fn part(rt: &Runtime, host: NodeId, name: &str) -> NodeId {
    rt.query_part(host, name)
        .unwrap_or_else(|| panic!("no part {name:?} on {host:?}"))
}

/// Collect the payload of every `name` event reaching `node`
pub fn record(rt: &mut Runtime, node: NodeId, name: EventName) -> Rc<RefCell<Vec<EventDetail>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    rt.add_event_listener(node, name, move |event| sink.borrow_mut().push(event.detail.clone()));
    log
}

/// Values carried by recorded `Value` payloads
pub fn values(log: &Rc<RefCell<Vec<EventDetail>>>) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(|detail| detail.value().map(str::to_string))
        .collect()
}

/// Nodes among `nodes` carrying `attr`
pub fn with_attr(rt: &Runtime, nodes: &[NodeId], attr: &str) -> Vec<NodeId> {
    nodes.iter().copied().filter(|&n| rt.has_attribute(n, attr)).collect()
}
