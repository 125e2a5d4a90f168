//! Document - High-level document API
//!
//! Owns the tree plus the page-wide state components share: the focused
//! node, layout rectangles fed in by an external layout pass, the viewport,
//! and the body scroll lock.

use std::collections::HashMap;

use crate::{DomTree, NodeId, Rect, Size};

/// Tags that take focus without a `tabindex`
const NATIVE_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea"];

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    html_element: NodeId,
    body_element: NodeId,
    focused: Option<NodeId>,
    layout: HashMap<NodeId, Rect>,
    viewport: Size,
}

impl Document {
    /// Create a document with `<html><body>` structure
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        // Both nodes are fresh elements, so these inserts cannot fail
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            body_element: body,
            focused: None,
            layout: HashMap::new(),
            viewport: Size::new(1280.0, 800.0),
        }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Deepest focused node, if it is still attached
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
            .filter(|&id| self.tree.contains(id) && self.tree.is_connected(id))
    }

    /// Check whether `id` can receive focus
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(elem) = self.tree.element(id) else {
            return false;
        };
        if !self.tree.is_connected(id) || self.is_hidden(id) {
            return false;
        }
        if elem.get_attr("tabindex").is_some_and(|v| v.trim().parse::<i32>().is_ok()) {
            return true;
        }
        NATIVE_FOCUSABLE.contains(&elem.tag.as_str()) && !elem.has_attr("disabled")
    }

    fn is_hidden(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if self.tree.has_attr(n, "hidden") {
                return true;
            }
            current = self.tree.composed_parent(n);
        }
        false
    }

    /// Move focus to `id`; returns false if it is not focusable
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            tracing::trace!("Refusing focus on {:?}", id);
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Drop focus back to the document
    pub fn blur(&mut self) {
        self.focused = None;
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Record the layout box of a node
    pub fn set_layout_rect(&mut self, id: NodeId, rect: Rect) {
        self.layout.insert(id, rect);
    }

    /// Bounding client rect (zero-sized until layout reports one)
    pub fn bounding_rect(&self, id: NodeId) -> Rect {
        self.layout.get(&id).copied().unwrap_or_default()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Free the contents of a render root, pruning per-node state
    pub fn clear_render_root(&mut self, root: NodeId) {
        for id in self.tree.clear_children(root) {
            self.layout.remove(&id);
            if self.focused == Some(id) {
                self.focused = None;
            }
        }
    }

    // =========================================================================
    // Scroll lock
    // =========================================================================

    /// Stop the page from scrolling behind an overlay
    pub fn lock_scroll(&mut self) {
        let body = self.body_element;
        let locked = self.tree
            .set_attr(body, "style", "overflow: hidden")
            .and_then(|_| self.tree.set_attr(body, "data-scroll-locked", ""));
        match locked {
            Ok(_) => tracing::debug!("Body scroll locked"),
            Err(err) => tracing::warn!("Cannot lock body scroll: {}", err),
        }
    }

    /// Restore page scrolling.
    ///
    /// Not reference counted: the first overlay to close unlocks the page
    /// even if another one is still open.
    pub fn unlock_scroll(&mut self) {
        let body = self.body_element;
        self.tree.remove_attr(body, "style");
        self.tree.remove_attr(body, "data-scroll-locked");
        tracing::debug!("Body scroll unlocked");
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.tree.has_attr(self.body_element, "data-scroll-locked")
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First element under `root` with `part="<part>"`
    pub fn query_part(&self, root: NodeId, part: &str) -> Option<NodeId> {
        self.tree.descendants(root)
            .into_iter()
            .find(|&id| self.tree.get_attr(id, "part") == Some(part))
    }

    /// Every element under `root` with `part="<part>"`, in tree order
    pub fn query_parts(&self, root: NodeId, part: &str) -> Vec<NodeId> {
        self.tree.descendants(root)
            .into_iter()
            .filter(|&id| self.tree.get_attr(id, "part") == Some(part))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let doc = Document::new();
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert!(doc.tree().is_connected(doc.body()));
    }

    #[test]
    fn test_focus_rules() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = doc.tree_mut().create_element("button");
        let div = doc.tree_mut().create_element("div");
        let roving = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attr(roving, "tabindex", "-1").unwrap();
        for id in [button, div, roving] {
            doc.tree_mut().append_child(body, id).unwrap();
        }

        assert!(doc.focus(button));
        assert!(!doc.focus(div));
        assert_eq!(doc.active_element(), Some(button));
        assert!(doc.focus(roving));

        doc.tree_mut().set_attr(button, "disabled", "").unwrap();
        assert!(!doc.focus(button));
    }

    #[test]
    fn test_hidden_ancestor_blocks_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        let panel = doc.tree_mut().create_element("div");
        let button = doc.tree_mut().create_element("button");
        doc.tree_mut().append_child(body, panel).unwrap();
        doc.tree_mut().append_child(panel, button).unwrap();
        doc.tree_mut().set_attr(panel, "hidden", "").unwrap();

        assert!(!doc.focus(button));
    }

    #[test]
    fn test_scroll_lock() {
        let mut doc = Document::new();
        doc.lock_scroll();
        assert!(doc.is_scroll_locked());
        assert_eq!(doc.tree().get_attr(doc.body(), "style"), Some("overflow: hidden"));

        doc.unlock_scroll();
        assert!(!doc.is_scroll_locked());
        assert_eq!(doc.tree().get_attr(doc.body(), "style"), None);
    }

    #[test]
    fn test_clear_render_root_drops_focus() {
        let mut doc = Document::new();
        let body = doc.body();
        let host = doc.tree_mut().create_element("eva-button");
        doc.tree_mut().append_child(body, host).unwrap();
        let root = doc.tree_mut().attach_render_root(host).unwrap();
        let button = doc.tree_mut().create_element("button");
        doc.tree_mut().append_child(root, button).unwrap();

        assert!(doc.focus(button));
        doc.clear_render_root(root);
        assert_eq!(doc.active_element(), None);
    }
}
