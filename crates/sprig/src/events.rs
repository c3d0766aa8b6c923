//! Event binding
//!
//! Wires the native listener table to per-handle state: one revocation
//! token per handle created on first bind, one listener identity shared
//! by all types of a bind call, and the three unbind shapes. Dispatch
//! invokes callbacks with the owning handle bound as first argument.

use std::cell::RefCell;
use std::rc::Rc;

use sprig_dom::NodeId;
use sprig_runtime::{is_pointer_event_type, Event, ListenerId};

use crate::dom::Dom;
use crate::error::{Error, Result};
use crate::handle::DETACH;
use crate::registry::Handle;

/// Callback invoked on dispatch; the handle is the bound first argument
pub type EventHandler = Box<dyn FnMut(&mut Dom, Handle, &mut Event)>;

/// Callback invoked once during handle teardown
pub type DetachHook = Box<dyn FnMut(&mut Dom, Handle)>;

/// Listener registration options
#[derive(Debug, Clone, Copy, Default)]
pub struct BindOptions {
    /// Remove the registration after its first invocation
    pub once: bool,
}

fn validate_event_type(event_type: &str) -> Result<()> {
    if event_type.is_empty()
        || event_type.contains(char::is_whitespace)
        || event_type == DETACH
    {
        return Err(Error::InvalidEventType(event_type.to_string()));
    }
    Ok(())
}

impl Dom {
    /// Bind `handler` to every type in `types` on one handle.
    ///
    /// Requires the handle to be live and connected, and the document
    /// ready. The handler identity is shared across the given types; the
    /// returned id works with [`Dom::off`] for any of them. All of a
    /// handle's registrations share its revocation token, so teardown
    /// removes them in one operation.
    pub fn on(
        &mut self,
        handle: Handle,
        types: &[&str],
        handler: impl FnMut(&mut Dom, Handle, &mut Event) + 'static,
        options: BindOptions,
    ) -> Result<ListenerId> {
        if types.is_empty() {
            return Err(Error::InvalidEventType(String::new()));
        }
        for ty in types {
            validate_event_type(ty)?;
        }
        let node = self.live_node(handle)?;
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        if !self.document().is_connected(node) {
            return Err(Error::NotConnected);
        }

        let token = match self.registry.live(handle).and_then(|s| s.token) {
            Some(token) => token,
            None => {
                let token = self.events.create_token();
                if let Some(state) = self.registry.live_mut(handle) {
                    state.token = Some(token);
                }
                token
            }
        };

        let id = self.events.register(node, types, Some(token), options.once);
        if let Some(state) = self.registry.live_mut(handle) {
            for ty in types {
                state
                    .listeners
                    .entry((*ty).to_string())
                    .or_default()
                    .push(id);
            }
        }
        let slot: Rc<RefCell<EventHandler>> = Rc::new(RefCell::new(Box::new(handler)));
        self.handlers.insert(id, slot);
        Ok(id)
    }

    /// Register a hook invoked exactly once during teardown.
    ///
    /// Hooks run after the handle's listeners, data and registry entry
    /// are gone, in registration order. The returned id can be removed
    /// again with [`Dom::off`] under the reserved [`DETACH`] type.
    pub fn on_detach(
        &mut self,
        handle: Handle,
        hook: impl FnMut(&mut Dom, Handle) + 'static,
    ) -> Result<ListenerId> {
        let node = self.live_node(handle)?;
        if !self.document().is_connected(node) {
            return Err(Error::NotConnected);
        }
        let id = self.events.alloc_id();
        let slot: Rc<RefCell<DetachHook>> = Rc::new(RefCell::new(Box::new(hook)));
        self.hooks.insert(id, slot);
        if let Some(state) = self.registry.live_mut(handle) {
            state.hooks.push(id);
        }
        Ok(id)
    }

    /// Remove every listener of every type, and the detach hooks
    pub fn off_all(&mut self, handle: Handle) -> Result<()> {
        let node = self.live_node(handle)?;
        let (listeners, hooks) = match self.registry.live_mut(handle) {
            Some(state) => (
                std::mem::take(&mut state.listeners),
                std::mem::take(&mut state.hooks),
            ),
            None => return Err(Error::Removed),
        };
        for (ty, ids) in listeners {
            for id in ids {
                self.events.remove(node, &ty, id);
                self.handlers.remove(&id);
            }
        }
        for id in hooks {
            self.hooks.remove(&id);
        }
        Ok(())
    }

    /// Remove every listener of one type; the reserved [`DETACH`] type
    /// clears the hook bucket instead.
    pub fn off_type(&mut self, handle: Handle, event_type: &str) -> Result<()> {
        let node = self.live_node(handle)?;
        if event_type == DETACH {
            let hooks = match self.registry.live_mut(handle) {
                Some(state) => std::mem::take(&mut state.hooks),
                None => return Err(Error::Removed),
            };
            for id in hooks {
                self.hooks.remove(&id);
            }
            return Ok(());
        }

        let ids = self
            .registry
            .live_mut(handle)
            .and_then(|state| state.listeners.remove(event_type))
            .unwrap_or_default();
        for id in ids {
            self.events.remove(node, event_type, id);
            if !self.id_still_referenced(handle, id) {
                self.handlers.remove(&id);
            }
        }
        Ok(())
    }

    /// Remove exactly one registration
    pub fn off(&mut self, handle: Handle, event_type: &str, id: ListenerId) -> Result<()> {
        let node = self.live_node(handle)?;
        if event_type == DETACH {
            if let Some(state) = self.registry.live_mut(handle) {
                state.hooks.retain(|&hook| hook != id);
            }
            self.hooks.remove(&id);
            return Ok(());
        }

        if let Some(state) = self.registry.live_mut(handle) {
            if let Some(ids) = state.listeners.get_mut(event_type) {
                ids.retain(|&x| x != id);
                if ids.is_empty() {
                    state.listeners.remove(event_type);
                }
            }
        }
        self.events.remove(node, event_type, id);
        if !self.id_still_referenced(handle, id) {
            self.handlers.remove(&id);
        }
        Ok(())
    }

    /// Synthesize pointer events on a handle.
    ///
    /// Every type must be in the pointer/click family; one synthetic
    /// event per type is dispatched synchronously, in order.
    pub fn fire(&mut self, handle: Handle, types: &[&str]) -> Result<()> {
        let node = self.live_node(handle)?;
        for ty in types {
            if !is_pointer_event_type(ty) {
                return Err(Error::NotPointerEvent((*ty).to_string()));
            }
        }
        for ty in types {
            self.dispatch(node, ty);
        }
        Ok(())
    }

    /// Native dispatch: invoke the listeners registered for
    /// (`node`, `event_type`), in registration order.
    ///
    /// Listeners removed or added by a running handler do not affect the
    /// current dispatch; the plan is snapshotted up front.
    pub fn dispatch(&mut self, node: NodeId, event_type: &str) -> Event {
        let plan = self.events.take_plan(node, event_type);
        let mut event = Event::new(event_type, node);

        if !plan.run.is_empty() {
            if let Some(handle) = self.registry.handle_for(node) {
                for id in plan.run {
                    let Some(callback) = self.handlers.get(&id).cloned() else {
                        continue;
                    };
                    (*callback.borrow_mut())(self, handle, &mut event);
                    if event.is_propagation_stopped() {
                        break;
                    }
                }
            }
        }

        // Drop callbacks of consumed `once` registrations that no other
        // type still references.
        for id in plan.expired {
            if let Some(handle) = self.registry.handle_for(node) {
                if let Some(state) = self.registry.live_mut(handle) {
                    if let Some(ids) = state.listeners.get_mut(event_type) {
                        ids.retain(|&x| x != id);
                        if ids.is_empty() {
                            state.listeners.remove(event_type);
                        }
                    }
                }
                if !self.id_still_referenced(handle, id) {
                    self.handlers.remove(&id);
                }
            } else {
                self.handlers.remove(&id);
            }
        }
        event
    }

    fn id_still_referenced(&self, handle: Handle, id: ListenerId) -> bool {
        self.registry
            .live(handle)
            .is_some_and(|state| state.listeners.values().any(|ids| ids.contains(&id)))
    }
}
