//! sprig DOM - arena document tree
//!
//! The "native" substrate the sprig handle layer passes through to:
//! node tree, attributes, selector matching, traversal, child-list
//! mutation records, geometry and form values.

mod document;
mod forms;
mod geometry;
mod mutation;
mod node;
mod selector;
pub mod style;
mod traverse;
mod tree;

pub use document::Document;
pub use forms::{control_value, set_control_value};
pub use geometry::{DOMRect, ElementGeometry};
pub use mutation::{ChildListScope, MutationLog, MutationRecord};
pub use node::{Attr, ElementData, Node, NodeData, TextData};
pub use selector::{ElementQuery, SelectorList};
pub use traverse::TreeWalker;
pub use tree::{ChildIter, DomError, DomResult, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw index value
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}
