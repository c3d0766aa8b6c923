//! Handle state
//!
//! The per-element state the library manages on behalf of a handle:
//! listener bookkeeping, detach hooks, the lazily-created revocation
//! token and the lazily-created data store. A destroyed handle keeps
//! none of it.

use std::collections::HashMap;

use serde_json::Value;
use sprig_dom::NodeId;
use sprig_runtime::{AbortToken, ListenerId};

/// Reserved pseudo-event name routing unbind calls to the detach-hook
/// bucket instead of the native listener table.
pub const DETACH: &str = "detach";

/// Library-side state for one live handle
#[derive(Debug)]
pub(crate) struct HandleState {
    /// The wrapped element (or document) node
    pub node: NodeId,
    /// Listener identities per event type, in registration order
    pub listeners: HashMap<String, Vec<ListenerId>>,
    /// Detach hooks, in registration order
    pub hooks: Vec<ListenerId>,
    /// Revocation token shared by all native registrations; created on
    /// first bind, gone after teardown
    pub token: Option<AbortToken>,
    /// In-memory data store; created on first use, gone after teardown
    pub data: Option<HashMap<String, Value>>,
}

impl HandleState {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            listeners: HashMap::new(),
            hooks: Vec::new(),
            token: None,
            data: None,
        }
    }
}
