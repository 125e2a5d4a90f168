//! Slots
//!
//! Light-DOM children are projected into `<slot>` elements of the host's
//! render root by name. Assignment is computed on demand, never stored.

use crate::{DomTree, NodeId};

/// Slot a light-DOM child is assigned to ("" for the default slot)
pub fn slot_name(tree: &DomTree, node: NodeId) -> &str {
    tree.get_attr(node, "slot").unwrap_or("")
}

/// Light-DOM children of `host` assigned to the slot called `name`
pub fn assigned_nodes(tree: &DomTree, host: NodeId, name: &str) -> Vec<NodeId> {
    tree.children(host)
        .filter(|&child| {
            if tree.element(child).is_some() {
                slot_name(tree, child) == name
            } else {
                // Text only ever lands in the default slot
                name.is_empty() && tree.get(child).is_some_and(|n| n.is_text())
            }
        })
        .collect()
}
