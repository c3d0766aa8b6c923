//! Identity registry
//!
//! One live handle per node, globally. Handles are indices into a slot
//! arena; a destroyed handle's slot turns into a tombstone so the id
//! stays valid-but-failing forever and is never resurrected. The
//! node-to-handle map is the only way in; there is no enumeration, so
//! membership is probed node by node during tree walks.

use std::collections::HashMap;

use sprig_dom::NodeId;

use crate::handle::HandleState;

/// Handle to one element (or the document)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    /// Raw slot index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
enum Slot {
    Live(HandleState),
    Dead,
}

/// Node→handle association plus the handle slot arena
#[derive(Debug, Default)]
pub(crate) struct Registry {
    slots: Vec<Slot>,
    by_node: HashMap<NodeId, Handle>,
}

impl Registry {
    /// Probe for the live handle of a node
    pub fn handle_for(&self, node: NodeId) -> Option<Handle> {
        self.by_node.get(&node).copied()
    }

    /// Register a fresh handle for `state.node`
    pub fn insert(&mut self, state: HandleState) -> Handle {
        debug_assert!(!self.by_node.contains_key(&state.node));
        let handle = Handle(self.slots.len() as u32);
        self.by_node.insert(state.node, handle);
        self.slots.push(Slot::Live(state));
        handle
    }

    /// State of a live handle
    pub fn live(&self, handle: Handle) -> Option<&HandleState> {
        match self.slots.get(handle.0 as usize) {
            Some(Slot::Live(state)) => Some(state),
            _ => None,
        }
    }

    /// Mutable state of a live handle
    pub fn live_mut(&mut self, handle: Handle) -> Option<&mut HandleState> {
        match self.slots.get_mut(handle.0 as usize) {
            Some(Slot::Live(state)) => Some(state),
            _ => None,
        }
    }

    /// Drop the node-to-handle mapping (teardown only)
    pub fn forget_node(&mut self, node: NodeId) {
        self.by_node.remove(&node);
    }

    /// Turn a slot into a tombstone
    pub fn kill(&mut self, handle: Handle) {
        if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
            *slot = Slot::Dead;
        }
    }

    /// Number of live handles
    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Live(_)))
            .count()
    }
}
