//! DOM Tree (arena-based allocation)
//!
//! All structural mutation goes through the tree so that child-list
//! mutation records stay faithful to what actually happened. A node that
//! is re-inserted while it already has a parent is detached first; the
//! observer therefore sees a removal plus an addition for every move.

use crate::mutation::{MutationLog, MutationRecord};
use crate::node::Node;
use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node not found")]
    NotFound,
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,
    /// Node is not a child of the given parent
    #[error("node is not a child")]
    NotAChild,
    /// Operation requires a different node type
    #[error("invalid node type")]
    InvalidNodeType,
    /// Selector text could not be parsed
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    log: MutationLog,
}

impl DomTree {
    /// Create a new tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            log: MutationLog::default(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena holds only the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Iterate direct children of a node
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Collect direct child IDs
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Check if `ancestor` is a strict ancestor of `node`
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.get(node).map_or(NodeId::NONE, |n| n.parent);
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map_or(NodeId::NONE, |n| n.parent);
        }
        false
    }

    /// Check if a node is part of the document tree
    pub fn is_connected(&self, node: NodeId) -> bool {
        if self.get(node).is_none() {
            return false;
        }
        node == NodeId::ROOT || self.is_ancestor_of(NodeId::ROOT, node)
    }

    /// Append a child as the last child of `parent`.
    ///
    /// A child that already sits in the tree is detached from its old
    /// parent first, so the operation doubles as "move".
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` under `parent`; `None` appends.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.get(parent).ok_or(DomError::NotFound)?;
        self.get(child).ok_or(DomError::NotFound)?;
        if child == parent || child == NodeId::ROOT || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(r) = reference {
            if r == child {
                return Ok(child);
            }
            let ref_node = self.get(r).ok_or(DomError::NotFound)?;
            if ref_node.parent != parent {
                return Err(DomError::NotAChild);
            }
        }

        if self.get(child).map_or(NodeId::NONE, |n| n.parent).is_valid() {
            self.unlink(child);
        }

        match reference {
            None => {
                let old_last = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);
                {
                    let node = self.get_mut(child).ok_or(DomError::NotFound)?;
                    node.parent = parent;
                    node.prev_sibling = old_last;
                    node.next_sibling = NodeId::NONE;
                }
                if old_last.is_valid() {
                    self.get_mut(old_last).ok_or(DomError::NotFound)?.next_sibling = child;
                } else {
                    self.get_mut(parent).ok_or(DomError::NotFound)?.first_child = child;
                }
                self.get_mut(parent).ok_or(DomError::NotFound)?.last_child = child;
            }
            Some(r) => {
                let prev = self.get(r).map_or(NodeId::NONE, |n| n.prev_sibling);
                {
                    let node = self.get_mut(child).ok_or(DomError::NotFound)?;
                    node.parent = parent;
                    node.prev_sibling = prev;
                    node.next_sibling = r;
                }
                self.get_mut(r).ok_or(DomError::NotFound)?.prev_sibling = child;
                if prev.is_valid() {
                    self.get_mut(prev).ok_or(DomError::NotFound)?.next_sibling = child;
                } else {
                    self.get_mut(parent).ok_or(DomError::NotFound)?.first_child = child;
                }
            }
        }

        self.record_added(parent, child);
        Ok(child)
    }

    /// Remove a child from its parent
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let node = self.get(child).ok_or(DomError::NotFound)?;
        if node.parent != parent {
            return Err(DomError::NotAChild);
        }
        self.unlink(child);
        Ok(child)
    }

    /// Detach a node from its parent; no-op for already-detached nodes
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        self.get(node).ok_or(DomError::NotFound)?;
        if self.get(node).map_or(NodeId::NONE, |n| n.parent).is_valid() {
            self.unlink(node);
        }
        Ok(())
    }

    /// Replace all children of `parent` with `new_children`
    pub fn replace_children(&mut self, parent: NodeId, new_children: &[NodeId]) -> DomResult<()> {
        self.get(parent).ok_or(DomError::NotFound)?;
        loop {
            let first = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
            if !first.is_valid() {
                break;
            }
            self.unlink(first);
        }
        for &child in new_children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.get(node) else { return };
        if let Some(text) = n.as_text() {
            out.push_str(text);
        }
        let mut child = n.first_child;
        while child.is_valid() {
            self.collect_text(child, out);
            child = self.get(child).map_or(NodeId::NONE, |n| n.next_sibling);
        }
    }

    /// Tag name of an element node
    pub fn tag_of(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.as_element().map(|e| e.tag.as_str())
    }

    /// Access to the mutation log
    pub fn log(&self) -> &MutationLog {
        &self.log
    }

    /// Mutable access to the mutation log (observe / take records)
    pub fn log_mut(&mut self) -> &mut MutationLog {
        &mut self.log
    }

    /// Unlink a node from its parent, recording the removal when the old
    /// parent sits inside the observed scope.
    fn unlink(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let n = &self.nodes[node.0 as usize];
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }
        {
            let n = &mut self.nodes[node.0 as usize];
            n.parent = NodeId::NONE;
            n.prev_sibling = NodeId::NONE;
            n.next_sibling = NodeId::NONE;
        }

        if self.in_observed_scope(parent) {
            self.log.record(MutationRecord::removal(parent, node));
        }
    }

    fn record_added(&mut self, parent: NodeId, child: NodeId) {
        if self.in_observed_scope(parent) {
            self.log.record(MutationRecord::addition(parent, child));
        }
    }

    fn in_observed_scope(&self, parent: NodeId) -> bool {
        match self.log.scope() {
            Some(scope) => {
                parent == scope.root || (scope.subtree && self.is_ancestor_of(scope.root, parent))
            }
            None => false,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the direct children of one node
pub struct ChildIter<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
