//! Detachment watching and teardown
//!
//! The watcher observes child-list changes under body, walks removed
//! subtrees for registered handles, and defers the authoritative
//! "still detached?" check one microtask so that remove-then-reinsert
//! within a turn is seen as a move, not a removal. Teardown releases
//! everything a handle owns, exactly once.

use crate::dom::Dom;
use crate::error::Result;
use crate::registry::Handle;

/// Watcher lifecycle; `Started` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatcherState {
    NotStarted,
    Started,
}

impl Dom {
    /// Explicitly remove an element: detach it natively, then tear the
    /// handle down. Fails with the lifecycle error when called twice.
    pub fn destroy(&mut self, handle: Handle) -> Result<()> {
        let node = self.live_node(handle)?;
        self.document.tree_mut().detach(node)?;
        self.note_structure_changed();
        self.teardown(handle);
        Ok(())
    }

    /// Start observing; no-op once started, deferred while the document
    /// has no body. Flips the ready flag and flushes the ready queue.
    pub(crate) fn start_watcher(&mut self) {
        if self.watcher == WatcherState::Started {
            return;
        }
        let Some(body) = self.document.body() else {
            return;
        };

        self.document.tree_mut().log_mut().observe(body, true);
        self.watcher = WatcherState::Started;
        tracing::debug!("mutation watcher started");

        let queued = self.ready.mark_ready();
        for callback in queued {
            callback(self);
        }
    }

    /// Schedule one delivery task when records are pending.
    ///
    /// Called after the library's own structural mutations and at every
    /// flush step, so out-of-band tree changes are picked up too.
    pub(crate) fn note_structure_changed(&mut self) {
        if self.watcher != WatcherState::Started || self.delivery_scheduled {
            return;
        }
        if !self.document.tree().log().has_pending() {
            return;
        }
        self.delivery_scheduled = true;
        self.tasks.schedule(|dom: &mut Dom| dom.deliver_mutations());
    }

    /// Assemble the batch of possibly-detached handles from the pending
    /// records and defer the connectivity check one more microtask.
    pub(crate) fn deliver_mutations(&mut self) {
        self.delivery_scheduled = false;
        let records = self.document.tree_mut().log_mut().take_records();
        if records.is_empty() {
            return;
        }

        let mut batch: Vec<Handle> = Vec::new();
        for record in &records {
            for &removed in &record.removed {
                let is_element = self
                    .document
                    .tree()
                    .get(removed)
                    .is_some_and(|n| n.is_element());
                if !is_element {
                    continue;
                }
                if let Some(handle) = self.registry.handle_for(removed) {
                    if !batch.contains(&handle) {
                        batch.push(handle);
                    }
                }
                // The record names only the removed root; every handle
                // below it would leak without the subtree walk.
                self.walker.begin(self.document.tree(), removed);
                while let Some(el) = self.walker.next_element(self.document.tree()) {
                    if let Some(handle) = self.registry.handle_for(el) {
                        if !batch.contains(&handle) {
                            batch.push(handle);
                        }
                    }
                }
            }
        }

        if batch.is_empty() {
            return;
        }
        tracing::debug!(candidates = batch.len(), "deferring detachment check");
        self.tasks.schedule(move |dom: &mut Dom| dom.reconcile(batch));
    }

    /// The deferred check: tear down batch members whose elements are
    /// still detached; reconnected ones are silently skipped.
    pub(crate) fn reconcile(&mut self, batch: Vec<Handle>) {
        for handle in batch {
            let Some(node) = self.registry.live(handle).map(|s| s.node) else {
                continue;
            };
            if self.document.is_connected(node) {
                continue;
            }
            self.teardown(handle);
        }
    }

    /// Release everything one handle owns. No-op on a dead handle, so
    /// concurrent removal triggers collapse to exactly one teardown.
    ///
    /// Order matters: native listeners and data go first, the registry
    /// entry next, hooks after that (a hook re-resolving the element
    /// gets a fresh handle), and only then does the slot die.
    pub(crate) fn teardown(&mut self, handle: Handle) {
        let (node, token, hooks) = {
            let Some(state) = self.registry.live_mut(handle) else {
                return;
            };
            let token = state.token.take();
            if let Some(store) = state.data.as_mut() {
                store.clear();
            }
            state.data = None;
            let hooks = std::mem::take(&mut state.hooks);
            state.listeners.clear();
            (state.node, token, hooks)
        };
        tracing::debug!(handle = handle.index(), "tearing down handle");

        if let Some(token) = token {
            for id in self.events.revoke(token) {
                self.handlers.remove(&id);
            }
        }

        self.registry.forget_node(node);

        for id in hooks {
            if let Some(hook) = self.hooks.remove(&id) {
                (*hook.borrow_mut())(self, handle);
            }
        }

        self.registry.kill(handle);
    }
}
