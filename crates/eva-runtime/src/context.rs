//! Callback context
//!
//! What a component sees while one of its callbacks runs: its host, the
//! document, and the runtime services (events, timers, listeners, locale).

use std::str::FromStr;

use eva_dom::{Document, DomTree, Event, EventDetail, EventName, NodeId, Rect, Size, assigned_nodes, slot_name};

use crate::component::{base_id, parse_or, translate_or};
use crate::{Config, DocumentListener, Runtime, TimerGuard};

/// Mutable view of the runtime scoped to one host
pub struct Context<'a> {
    rt: &'a mut Runtime,
    host: NodeId,
}

impl<'a> Context<'a> {
    pub(crate) fn new(rt: &'a mut Runtime, host: NodeId) -> Self {
        Self { rt, host }
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn document(&self) -> &Document {
        self.rt.document()
    }

    pub fn tree(&self) -> &DomTree {
        self.rt.tree()
    }

    pub fn config(&self) -> &Config {
        self.rt.config()
    }

    // =========================================================================
    // Host attributes
    // =========================================================================

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.tree().get_attr(self.host, name)
    }

    /// Literal attribute value or `default`
    pub fn get_attr(&self, name: &str, default: &str) -> String {
        self.attr(name).unwrap_or(default).to_string()
    }

    /// Presence as boolean (any value, including empty, is true)
    pub fn get_bool_attr(&self, name: &str) -> bool {
        self.tree().has_attr(self.host, name)
    }

    /// Parse an attribute, logging and using `default` when malformed
    pub fn parse_attr<T: FromStr>(&self, name: &str, default: T) -> T {
        parse_or(self.attr(name), name, default)
    }

    pub fn base_id(&self) -> String {
        base_id(self.tree(), self.host)
    }

    // =========================================================================
    // Attribute writes (any node)
    // =========================================================================

    pub fn attr_of(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree().get_attr(node, name)
    }

    pub fn has_attr_of(&self, node: NodeId, name: &str) -> bool {
        self.tree().has_attr(node, name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Err(err) = self.rt.set_attribute(node, name, value) {
            tracing::debug!("Cannot set {} on {:?}: {}", name, node, err);
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.rt.remove_attribute(node, name);
    }

    /// Add (empty) or remove a boolean attribute; an existing value is kept
    pub fn toggle_attr(&mut self, node: NodeId, name: &str, on: bool) {
        match (on, self.has_attr_of(node, name)) {
            (true, false) => self.set_attr(node, name, ""),
            (false, true) => self.remove_attr(node, name),
            _ => {}
        }
    }

    // =========================================================================
    // Events & rendering
    // =========================================================================

    /// Fire a bubbling, composed event from the host
    pub fn emit(&mut self, name: EventName, detail: EventDetail) {
        self.rt.dispatch(Event::custom(name, self.host, detail));
    }

    /// Queue a render of the host; it runs once the callback returns
    pub fn request_render(&mut self) {
        self.rt.request_render(self.host);
    }

    // =========================================================================
    // Locale
    // =========================================================================

    pub fn t_or(&self, key: &str, fallback: &str, params: &[(&str, &str)]) -> String {
        translate_or(self.rt.locale(), key, fallback, params)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focus(&mut self, node: NodeId) -> bool {
        self.rt.focus(node)
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.rt.active_element()
    }

    /// Composed containment: `node` is `ancestor` or inside it, across render roots
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree().is_inclusive_ancestor(ancestor, node, true)
    }

    /// Check if focus is on or inside `node`
    pub fn has_focus_within(&self, node: NodeId) -> bool {
        self.active_element().is_some_and(|focused| self.contains(node, focused))
    }

    pub fn is_focusable(&self, node: NodeId) -> bool {
        self.document().is_focusable(node)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn render_root(&self) -> Option<NodeId> {
        self.tree().render_root(self.host)
    }

    /// Part in the host's own render root
    pub fn query_part(&self, part: &str) -> Option<NodeId> {
        self.query_part_of(self.host, part)
    }

    /// Part in another element's render root
    pub fn query_part_of(&self, host: NodeId, part: &str) -> Option<NodeId> {
        self.rt.query_part(host, part)
    }

    pub fn query_parts(&self, part: &str) -> Vec<NodeId> {
        self.rt.query_parts(self.host, part)
    }

    /// Parts of the host's render root on the event path, innermost first
    pub fn parts_in_path(&self, event: &Event) -> Vec<String> {
        let Some(root) = self.render_root() else {
            return Vec::new();
        };
        let tree = self.tree();
        event
            .composed_path()
            .iter()
            .filter(|&&node| tree.is_inclusive_ancestor(root, node, false))
            .filter_map(|&node| tree.get_attr(node, "part"))
            .map(str::to_string)
            .collect()
    }

    /// Innermost part of the host's render root the event passed through
    pub fn part_of(&self, event: &Event) -> Option<String> {
        self.parts_in_path(event).into_iter().next()
    }

    /// Node of the host's render root with `part="<part>"` on the event path
    pub fn part_in_path(&self, event: &Event, part: &str) -> Option<NodeId> {
        let root = self.render_root()?;
        let tree = self.tree();
        event
            .composed_path()
            .iter()
            .copied()
            .filter(|&node| tree.is_inclusive_ancestor(root, node, false))
            .find(|&node| tree.get_attr(node, "part") == Some(part))
    }

    /// Slot of the host's light child the event came through, if any
    pub fn slot_in_path(&self, event: &Event) -> Option<String> {
        let tree = self.tree();
        event
            .composed_path()
            .iter()
            .copied()
            .find(|&node| tree.parent(node) == Some(self.host))
            .map(|child| slot_name(tree, child).to_string())
    }

    /// Items owned by the host, in document order (nested groups keep theirs)
    pub fn items(&self, item_tag: &str, group_tag: &str) -> Vec<NodeId> {
        self.tree().owned_by(self.host, item_tag, group_tag)
    }

    /// Light children assigned to slot `name` ("" for the default slot)
    pub fn slotted(&self, name: &str) -> Vec<NodeId> {
        assigned_nodes(self.tree(), self.host, name)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree().text_content(node)
    }

    // =========================================================================
    // Document listeners, timers, frames
    // =========================================================================

    /// Listen for `name` at document level until the guard drops
    pub fn listen_document(&mut self, name: EventName) -> DocumentListener {
        self.rt.listen_document(self.host, name)
    }

    /// One-shot timer delivered to `handle_timer(name)`
    pub fn set_timer(&mut self, name: &'static str, delay_ms: u64) -> TimerGuard {
        self.rt.schedule(self.host, name, delay_ms, false)
    }

    /// Repeating timer delivered to `handle_timer(name)`
    pub fn set_interval(&mut self, name: &'static str, period_ms: u64) -> TimerGuard {
        self.rt.schedule(self.host, name, period_ms, true)
    }

    /// Call `handle_frame` once the current synchronous work settles
    pub fn request_frame(&mut self) {
        self.rt.request_frame(self.host);
    }

    // =========================================================================
    // Geometry & scroll
    // =========================================================================

    pub fn bounding_rect(&self, node: NodeId) -> Rect {
        self.document().bounding_rect(node)
    }

    pub fn viewport(&self) -> Size {
        self.document().viewport()
    }

    pub fn lock_scroll(&mut self) {
        self.rt.document_mut().lock_scroll();
    }

    pub fn unlock_scroll(&mut self) {
        self.rt.document_mut().unlock_scroll();
    }
}
