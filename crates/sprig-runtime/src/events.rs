//! Native listener registry
//!
//! Bookkeeping for listener registrations keyed by (node, event type).
//! The table stores identities only; the callbacks themselves live with
//! the layer that owns them. One registration call may cover several
//! types with a single shared listener identity, and registrations
//! tagged with an AbortToken are removed together when it is revoked.

use std::collections::HashMap;

use sprig_dom::NodeId;

use crate::abort::{AbortToken, TokenSource};

/// Identity of one registered listener (shared across its types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

#[derive(Debug, Clone)]
struct Registration {
    id: ListenerId,
    token: Option<AbortToken>,
    once: bool,
}

/// The ordered invocation plan for one dispatch
#[derive(Debug, Default)]
pub struct DispatchPlan {
    /// Listener identities to invoke, in registration order
    pub run: Vec<ListenerId>,
    /// `once` registrations consumed by this dispatch; the owner should
    /// drop their callbacks if no other type still references them
    pub expired: Vec<ListenerId>,
}

/// Listener table
#[derive(Debug, Default)]
pub struct EventTable {
    next_listener: u32,
    tokens: TokenSource,
    targets: HashMap<NodeId, HashMap<String, Vec<Registration>>>,
    by_token: HashMap<AbortToken, Vec<(NodeId, String, ListenerId)>>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a listener identity without registering anything.
    ///
    /// Used for pseudo-listeners that share the identity space but never
    /// reach the native table.
    pub fn alloc_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    /// Issue a fresh revocation token
    pub fn create_token(&mut self) -> AbortToken {
        self.tokens.issue()
    }

    /// Register one listener identity under every given type
    pub fn register(
        &mut self,
        node: NodeId,
        types: &[&str],
        token: Option<AbortToken>,
        once: bool,
    ) -> ListenerId {
        let id = self.alloc_id();
        let by_type = self.targets.entry(node).or_default();
        for &ty in types {
            by_type
                .entry(ty.to_string())
                .or_default()
                .push(Registration { id, token, once });
            if let Some(token) = token {
                self.by_token
                    .entry(token)
                    .or_default()
                    .push((node, ty.to_string(), id));
            }
        }
        id
    }

    /// Plan a dispatch: listener ids in registration order, with `once`
    /// registrations consumed.
    pub fn take_plan(&mut self, node: NodeId, event_type: &str) -> DispatchPlan {
        let mut plan = DispatchPlan::default();
        let Some(regs) = self
            .targets
            .get_mut(&node)
            .and_then(|by_type| by_type.get_mut(event_type))
        else {
            return plan;
        };

        plan.run = regs.iter().map(|r| r.id).collect();
        let consumed: Vec<Registration> = regs.iter().filter(|r| r.once).cloned().collect();
        regs.retain(|r| !r.once);
        for reg in consumed {
            plan.expired.push(reg.id);
            if let Some(token) = reg.token {
                self.forget_token_entry(token, node, event_type, reg.id);
            }
        }
        plan
    }

    /// Remove one (node, type, id) registration
    pub fn remove(&mut self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        let Some(regs) = self
            .targets
            .get_mut(&node)
            .and_then(|by_type| by_type.get_mut(event_type))
        else {
            return false;
        };
        let Some(idx) = regs.iter().position(|r| r.id == id) else {
            return false;
        };
        let reg = regs.remove(idx);
        if let Some(token) = reg.token {
            self.forget_token_entry(token, node, event_type, id);
        }
        true
    }

    /// Remove every registration of one type on one node
    pub fn remove_type(&mut self, node: NodeId, event_type: &str) -> Vec<ListenerId> {
        let Some(regs) = self
            .targets
            .get_mut(&node)
            .and_then(|by_type| by_type.remove(event_type))
        else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        for reg in regs {
            if let Some(token) = reg.token {
                self.forget_token_entry(token, node, event_type, reg.id);
            }
            removed.push(reg.id);
        }
        removed
    }

    /// Revoke a token: remove every registration tagged with it, in one
    /// operation. A second revoke of the same token removes nothing.
    pub fn revoke(&mut self, token: AbortToken) -> Vec<ListenerId> {
        let Some(entries) = self.by_token.remove(&token) else {
            return Vec::new();
        };
        tracing::trace!(entries = entries.len(), "revoking listener token");
        let mut removed = Vec::new();
        for (node, ty, id) in entries {
            if let Some(regs) = self
                .targets
                .get_mut(&node)
                .and_then(|by_type| by_type.get_mut(&ty))
            {
                regs.retain(|r| r.id != id);
            }
            if !removed.contains(&id) {
                removed.push(id);
            }
        }
        removed
    }

    /// Whether any listener is registered for (node, type)
    pub fn has_listeners(&self, node: NodeId, event_type: &str) -> bool {
        self.targets
            .get(&node)
            .and_then(|by_type| by_type.get(event_type))
            .is_some_and(|regs| !regs.is_empty())
    }

    fn forget_token_entry(&mut self, token: AbortToken, node: NodeId, ty: &str, id: ListenerId) {
        if let Some(entries) = self.by_token.get_mut(&token) {
            entries.retain(|(n, t, i)| !(*n == node && t == ty && *i == id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE: NodeId = NodeId::ROOT;

    #[test]
    fn test_plan_preserves_registration_order() {
        let mut table = EventTable::new();
        let a = table.register(NODE, &["click"], None, false);
        let b = table.register(NODE, &["click"], None, false);

        let plan = table.take_plan(NODE, "click");
        assert_eq!(plan.run, vec![a, b]);
        assert!(plan.expired.is_empty());
        // Non-once registrations survive the dispatch.
        assert_eq!(table.take_plan(NODE, "click").run, vec![a, b]);
    }

    #[test]
    fn test_once_is_consumed_at_plan_time() {
        let mut table = EventTable::new();
        let a = table.register(NODE, &["click"], None, true);
        let b = table.register(NODE, &["click"], None, false);

        let plan = table.take_plan(NODE, "click");
        assert_eq!(plan.run, vec![a, b]);
        assert_eq!(plan.expired, vec![a]);

        let plan = table.take_plan(NODE, "click");
        assert_eq!(plan.run, vec![b]);
    }

    #[test]
    fn test_shared_identity_across_types() {
        let mut table = EventTable::new();
        let id = table.register(NODE, &["mouseenter", "mouseleave"], None, false);

        assert_eq!(table.take_plan(NODE, "mouseenter").run, vec![id]);
        assert_eq!(table.take_plan(NODE, "mouseleave").run, vec![id]);
    }

    #[test]
    fn test_remove_exact() {
        let mut table = EventTable::new();
        let a = table.register(NODE, &["click"], None, false);
        let b = table.register(NODE, &["click"], None, false);

        assert!(table.remove(NODE, "click", a));
        assert!(!table.remove(NODE, "click", a));
        assert_eq!(table.take_plan(NODE, "click").run, vec![b]);
    }

    #[test]
    fn test_revoke_removes_everything_tagged() {
        let mut table = EventTable::new();
        let token = table.create_token();
        let a = table.register(NODE, &["click", "keydown"], Some(token), false);
        let b = table.register(NODE, &["click"], Some(token), false);
        let untagged = table.register(NODE, &["click"], None, false);

        let removed = table.revoke(token);
        assert_eq!(removed.len(), 2);
        assert!(removed.contains(&a));
        assert!(removed.contains(&b));

        assert_eq!(table.take_plan(NODE, "click").run, vec![untagged]);
        assert!(!table.has_listeners(NODE, "keydown"));
        // One-shot: a second revoke is empty.
        assert!(table.revoke(token).is_empty());
    }
}
