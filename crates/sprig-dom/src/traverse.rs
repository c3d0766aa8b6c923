//! Subtree traversal
//!
//! A reusable depth-first, element-only cursor. One instance can serve
//! many walks; `begin` rewinds it onto a new subtree and keeps the stack
//! allocation. The walk never leaves the subtree it was started on: the
//! stack is seeded with the root's children and only ever grows downward.

use crate::tree::DomTree;
use crate::NodeId;

/// Reusable depth-first element cursor over one subtree
#[derive(Debug, Default)]
pub struct TreeWalker {
    stack: Vec<NodeId>,
}

impl TreeWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind the cursor onto the descendants of `root`.
    ///
    /// The root itself is not yielded.
    pub fn begin(&mut self, tree: &DomTree, root: NodeId) {
        self.stack.clear();
        self.push_children(tree, root);
    }

    /// Next element in document order, or `None` when the subtree is done
    pub fn next_element(&mut self, tree: &DomTree) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            self.push_children(tree, id);
            if tree.get(id).is_some_and(|n| n.is_element()) {
                return Some(id);
            }
        }
        None
    }

    fn push_children(&mut self, tree: &DomTree, parent: NodeId) {
        let from = self.stack.len();
        let mut child = tree.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        while child.is_valid() {
            self.stack.push(child);
            child = tree.get(child).map_or(NodeId::NONE, |n| n.next_sibling);
        }
        // Reverse the slice we just pushed so pops come out in order.
        self.stack[from..].reverse();
    }
}
