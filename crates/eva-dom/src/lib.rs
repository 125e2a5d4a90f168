//! EVA DOM - Headless document model
//!
//! Arena-backed node tree used by the component runtime:
//! - Elements with ordered string attributes
//! - Render roots (isolated subtrees owned by a host element)
//! - Named slots resolved against light-DOM children
//! - Composed event paths that cross render-root boundaries

mod node;
mod tree;
mod document;
mod shadow;
mod serialize;
pub mod events;
pub mod geometry;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children};
pub use document::Document;
pub use shadow::{assigned_nodes, slot_name};
pub use serialize::{inner_html, outer_html};
pub use events::{Event, EventName, EventDetail, Key, Phase};
pub use geometry::{Rect, Size, Side, Placement, place};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" links inside the arena
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index, stable for the node's lifetime
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn some(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

/// DOM errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Node {child:?} cannot be inserted under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Reference node {0:?} is not a child of the parent")]
    NotAChild(NodeId),
}
