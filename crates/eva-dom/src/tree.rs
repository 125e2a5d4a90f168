//! DOM Tree (arena-based allocation)
//!
//! Freed subtrees go on a free list and their slots are reused, so
//! repeated render passes do not grow the arena.

use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            free: Vec::new(),
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0 as usize] = node;
            return id;
        }
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::text(text.to_string()))
    }

    /// Attach (or return the existing) render root of `host`
    pub fn attach_render_root(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        let existing = self.element(host).ok_or(DomError::UnknownNode(host))?.render_root;
        if existing.is_valid() {
            return Ok(existing);
        }
        let root = self.alloc(Node::render_root(host));
        if let Some(elem) = self.element_mut(host) {
            elem.render_root = root;
        }
        Ok(root)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).filter(|n| !n.is_vacant())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).filter(|n| !n.is_vacant())
    }

    /// Check if the id points at a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    /// Tag name of an element
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<Option<String>, DomError> {
        let elem = self.element_mut(id).ok_or(DomError::UnknownNode(id))?;
        Ok(elem.set_attr(name, value))
    }

    /// Remove an attribute, returning the previous value
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attr(name)
    }

    /// Render root attached to `host`
    pub fn render_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)?.render_root.some()
    }

    /// Light-tree parent
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.some()
    }

    /// Parent that crosses render-root boundaries (render root -> host)
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        node.parent.some().or_else(|| node.render_root_host())
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Direct children that are elements
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if let Some(r) = reference {
            if r == child {
                return Ok(());
            }
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild(r));
            }
        }

        self.detach(child);

        match reference {
            None => {
                let last = self.node_mut(parent).last_child;
                {
                    let c = self.node_mut(child);
                    c.parent = parent;
                    c.prev_sibling = last;
                }
                if last.is_valid() {
                    self.node_mut(last).next_sibling = child;
                } else {
                    self.node_mut(parent).first_child = child;
                }
                self.node_mut(parent).last_child = child;
            }
            Some(r) => {
                let prev = self.node_mut(r).prev_sibling;
                {
                    let c = self.node_mut(child);
                    c.parent = parent;
                    c.prev_sibling = prev;
                    c.next_sibling = r;
                }
                self.node_mut(r).prev_sibling = child;
                if prev.is_valid() {
                    self.node_mut(prev).next_sibling = child;
                } else {
                    self.node_mut(parent).first_child = child;
                }
            }
        }
        Ok(())
    }

    /// Validate that `child` may be inserted under `parent`
    pub fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let p = self.get(parent).ok_or(DomError::UnknownNode(parent))?;
        let c = self.get(child).ok_or(DomError::UnknownNode(child))?;
        let parent_ok = !p.is_text();
        let child_ok = c.is_element() || c.is_text();
        // A node may not be moved under itself or one of its descendants
        if !parent_ok || !child_ok || self.is_inclusive_ancestor(child, parent, true) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Unlink a node from its parent, keeping its subtree intact
    pub fn detach(&mut self, child: NodeId) {
        let Some(node) = self.get(child) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        if prev.is_valid() {
            self.node_mut(prev).next_sibling = next;
        } else if parent.is_valid() {
            self.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = prev;
        } else if parent.is_valid() {
            self.node_mut(parent).last_child = prev;
        }

        let c = self.node_mut(child);
        c.parent = NodeId::NONE;
        c.prev_sibling = NodeId::NONE;
        c.next_sibling = NodeId::NONE;
    }

    /// Remove and free every child of `parent`, returning the freed ids
    pub fn clear_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.children(parent).collect();
        let mut freed = Vec::new();
        for child in children {
            self.detach(child);
            self.free_subtree(child, &mut freed);
        }
        freed
    }

    fn free_subtree(&mut self, id: NodeId, freed: &mut Vec<NodeId>) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.get(current).is_none() {
                continue;
            }
            stack.extend(self.children(current));
            if let Some(root) = self.render_root(current) {
                stack.push(root);
            }
            *self.node_mut(current) = Node::vacant();
            self.free.push(current);
            freed.push(current);
        }
    }

    /// Light-tree descendants of `id` in pre-order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let mut kids: Vec<NodeId> = self.children(current).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Check if `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId, composed: bool) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = if composed { self.composed_parent(id) } else { self.parent(id) };
        }
        false
    }

    /// Closest inclusive light-tree ancestor matching `pred`
    pub fn closest(&self, id: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(n) = current {
            if pred(n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Items of a composite group, in document order.
    ///
    /// An item belongs to the closest ancestor with `group_tag`, so a nested
    /// group keeps its own items.
    pub fn owned_by(&self, group: NodeId, item_tag: &str, group_tag: &str) -> Vec<NodeId> {
        self.descendants(group)
            .into_iter()
            .filter(|&id| self.tag(id) == Some(item_tag))
            .filter(|&id| self.owner_group(id, group_tag) == Some(group))
            .collect()
    }

    /// Closest strict ancestor of `item` with `group_tag`
    pub fn owner_group(&self, item: NodeId, group_tag: &str) -> Option<NodeId> {
        let parent = self.parent(item)?;
        self.closest(parent, |n| self.tag(n) == Some(group_tag))
    }

    /// Concatenated text of all light-tree text descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Check if the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, id, true)
    }

    /// Child-index path from `ancestor` down to `node` (light tree only)
    pub fn path_from(&self, ancestor: NodeId, node: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = node;
        while current != ancestor {
            let parent = self.parent(current)?;
            let index = self.children(parent).position(|c| c == current)?;
            path.push(index);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Resolve a child-index path produced by [`DomTree::path_from`]
    pub fn node_at_path(&self, ancestor: NodeId, path: &[usize]) -> Option<NodeId> {
        let mut current = ancestor;
        for &index in path {
            current = self.children(current).nth(index)?;
        }
        Some(current)
    }

    /// Number of live nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Check if tree holds only the document node
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.some()?;
        self.next = self.tree.get(id).map(|n| n.next_sibling).unwrap_or(NodeId::NONE);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("span");
        let b = tree.create_text("hi");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(tree.element_children(div), vec![a]);
        assert_eq!(tree.parent(a), Some(div));
        assert!(tree.is_connected(b));
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let first = tree.create_element("li");
        let last = tree.create_element("li");
        tree.append_child(ul, last).unwrap();
        tree.insert_before(ul, first, Some(last)).unwrap();

        assert_eq!(tree.children(ul).collect::<Vec<_>>(), vec![first, last]);
    }

    #[test]
    fn test_hierarchy_request() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { parent: inner, child: outer })
        );
    }

    #[test]
    fn test_clear_children_reuses_slots() {
        let mut tree = DomTree::new();
        let host = tree.create_element("eva-card");
        let root = tree.attach_render_root(host).unwrap();
        for _ in 0..3 {
            let p = tree.create_element("p");
            tree.append_child(root, p).unwrap();
        }
        let before = tree.len();

        assert_eq!(tree.clear_children(root).len(), 3);
        assert_eq!(tree.len(), before - 3);

        let p = tree.create_element("p");
        tree.append_child(root, p).unwrap();
        assert_eq!(tree.len(), before - 2);
    }

    #[test]
    fn test_composed_parent_crosses_render_root() {
        let mut tree = DomTree::new();
        let host = tree.create_element("eva-button");
        let root = tree.attach_render_root(host).unwrap();
        let button = tree.create_element("button");
        tree.append_child(root, button).unwrap();

        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.composed_parent(root), Some(host));
        assert!(tree.is_inclusive_ancestor(host, button, true));
        assert!(!tree.is_inclusive_ancestor(host, button, false));
    }

    #[test]
    fn test_owned_by_skips_nested_groups() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("eva-accordion");
        let item = tree.create_element("eva-accordion-item");
        let inner = tree.create_element("eva-accordion");
        let nested_item = tree.create_element("eva-accordion-item");
        tree.append_child(outer, item).unwrap();
        tree.append_child(item, inner).unwrap();
        tree.append_child(inner, nested_item).unwrap();

        assert_eq!(tree.owned_by(outer, "eva-accordion-item", "eva-accordion"), vec![item]);
        assert_eq!(tree.owned_by(inner, "eva-accordion-item", "eva-accordion"), vec![nested_item]);
    }

    #[test]
    fn test_path_roundtrip() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let a = tree.create_element("div");
        let b = tree.create_element("button");
        let c = tree.create_element("button");
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(a, c).unwrap();

        let path = tree.path_from(root, c).unwrap();
        assert_eq!(path, vec![0, 1]);
        assert_eq!(tree.node_at_path(root, &path), Some(c));
    }
}
