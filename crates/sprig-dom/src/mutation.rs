//! Child-list mutation records
//!
//! One scoped observation at a time; structural tree operations append a
//! record per change and the consumer drains them in batches.

use crate::NodeId;

/// One recorded child-list change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Parent whose child list changed
    pub target: NodeId,
    /// Nodes inserted under `target`
    pub added: Vec<NodeId>,
    /// Nodes removed from under `target`
    pub removed: Vec<NodeId>,
}

impl MutationRecord {
    /// Record for a single insertion
    pub fn addition(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added: vec![node],
            removed: Vec::new(),
        }
    }

    /// Record for a single removal
    pub fn removal(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed: vec![node],
        }
    }
}

/// Where the observation looks
#[derive(Debug, Clone, Copy)]
pub struct ChildListScope {
    /// Subtree root whose mutations are recorded
    pub root: NodeId,
    /// Whether changes below direct children are recorded too
    pub subtree: bool,
}

/// Pending mutation records plus the active observation scope
#[derive(Debug, Default)]
pub struct MutationLog {
    scope: Option<ChildListScope>,
    records: Vec<MutationRecord>,
}

impl MutationLog {
    /// Start observing child-list changes under `root`.
    ///
    /// Replaces any previous observation; already-queued records are kept.
    pub fn observe(&mut self, root: NodeId, subtree: bool) {
        tracing::debug!(root = root.index(), subtree, "observing child-list changes");
        self.scope = Some(ChildListScope { root, subtree });
    }

    /// Stop observing; queued records remain takeable
    pub fn disconnect(&mut self) {
        self.scope = None;
    }

    /// Active observation scope, if any
    pub fn scope(&self) -> Option<ChildListScope> {
        self.scope
    }

    /// Whether an observation is active
    pub fn is_active(&self) -> bool {
        self.scope.is_some()
    }

    /// Queue a record
    pub fn record(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    /// Whether records await delivery
    pub fn has_pending(&self) -> bool {
        !self.records.is_empty()
    }

    /// Take all pending records, clearing the queue
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }
}
