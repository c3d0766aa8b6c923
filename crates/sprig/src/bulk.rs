//! Bulk fan-out
//!
//! An ordered list of handles and the mechanical fan-out of the
//! per-handle operations over it. Nothing here has semantics of its
//! own; every member call is exactly one core call.

use crate::dom::Dom;
use crate::error::{Error, Result};
use crate::events::{BindOptions, EventHandler};
use crate::registry::Handle;
use sprig_runtime::ListenerId;

/// An ordered collection of handles
#[derive(Debug, Clone, Default)]
pub struct Handles {
    items: Vec<Handle>,
}

impl Handles {
    pub fn new(items: Vec<Handle>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Handle> {
        self.items.get(index).copied()
    }

    pub fn first(&self) -> Option<Handle> {
        self.items.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.items.iter().copied()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.items.contains(&handle)
    }
}

impl<'a> IntoIterator for &'a Handles {
    type Item = Handle;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Handle>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}

impl Dom {
    /// Run `f` for every handle, in order, stopping at the first error
    pub fn each(
        &mut self,
        handles: &Handles,
        mut f: impl FnMut(&mut Dom, Handle) -> Result<()>,
    ) -> Result<()> {
        for handle in handles {
            f(self, handle)?;
        }
        Ok(())
    }

    /// Keep the handles whose elements match `selector`
    pub fn filter(&mut self, handles: &Handles, selector: &str) -> Result<Handles> {
        let mut kept = Vec::new();
        for handle in handles {
            if self.at(handle).matches(selector)? {
                kept.push(handle);
            }
        }
        Ok(Handles::new(kept))
    }

    /// Add a class on every handle
    pub fn add_class_all(&mut self, handles: &Handles, class: &str) -> Result<()> {
        self.each(handles, |dom, handle| {
            dom.at(handle).add_class(class)?;
            Ok(())
        })
    }

    /// Remove a class on every handle
    pub fn remove_class_all(&mut self, handles: &Handles, class: &str) -> Result<()> {
        self.each(handles, |dom, handle| {
            dom.at(handle).remove_class(class)?;
            Ok(())
        })
    }

    /// Set an attribute on every handle
    pub fn set_attr_all(&mut self, handles: &Handles, name: &str, value: &str) -> Result<()> {
        self.each(handles, |dom, handle| {
            dom.at(handle).set_attr(name, value)?;
            Ok(())
        })
    }

    /// Bind one handler per handle, pairing by position.
    ///
    /// The handler list length must equal the handle count.
    pub fn bind_each(
        &mut self,
        handles: &Handles,
        types: &[&str],
        handlers: Vec<EventHandler>,
        options: BindOptions,
    ) -> Result<Vec<ListenerId>> {
        if handlers.len() != handles.len() {
            return Err(Error::HandlerCountMismatch {
                expected: handles.len(),
                got: handlers.len(),
            });
        }
        let mut ids = Vec::with_capacity(handlers.len());
        for (handle, handler) in handles.iter().zip(handlers) {
            ids.push(self.on(handle, types, handler, options)?);
        }
        Ok(ids)
    }

    /// Destroy every handle, in order
    pub fn destroy_all(&mut self, handles: &Handles) -> Result<()> {
        self.each(handles, |dom, handle| dom.destroy(handle))
    }
}
