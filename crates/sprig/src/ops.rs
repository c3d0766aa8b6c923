//! Pass-through operations
//!
//! The chainable per-handle surface. Everything here requires the handle
//! to be live and delegates to the substrate; successful mutators hand
//! the ref back for chaining. Data operations carry the stricter
//! connected-and-ready precondition.

use std::collections::HashMap;

use serde_json::Value;
use sprig_dom::{control_value, set_control_value, style, DOMRect, ElementData, ElementQuery, NodeId};
use sprig_html::MarkupParser;
use sprig_runtime::{Event, ListenerId};

use crate::bulk::Handles;
use crate::dom::Dom;
use crate::error::{Error, Result};
use crate::events::BindOptions;
use crate::registry::Handle;

/// Borrowed view of one handle, carrying the environment for chaining
pub struct HandleRef<'a> {
    dom: &'a mut Dom,
    handle: Handle,
}

impl Dom {
    /// Operate on one handle
    pub fn at(&mut self, handle: Handle) -> HandleRef<'_> {
        HandleRef { dom: self, handle }
    }
}

impl HandleRef<'_> {
    /// The handle this ref operates on
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Whether the handle is still live
    pub fn is_live(&self) -> bool {
        self.dom.registry.live(self.handle).is_some()
    }

    /// Node id of the wrapped element, for substrate-level interop
    pub fn node_id(&self) -> Result<NodeId> {
        self.node()
    }

    fn node(&self) -> Result<NodeId> {
        self.dom.live_node(self.handle)
    }

    fn elem(&self) -> Result<&ElementData> {
        let node = self.node()?;
        self.dom
            .document
            .tree()
            .get(node)
            .and_then(|n| n.as_element())
            .ok_or(Error::NotAnElement)
    }

    fn elem_mut(&mut self) -> Result<&mut ElementData> {
        let node = self.node()?;
        self.dom
            .document
            .tree_mut()
            .get_mut(node)
            .and_then(|n| n.as_element_mut())
            .ok_or(Error::NotAnElement)
    }

    // ----- classes -----

    pub fn has_class(&self, class: &str) -> Result<bool> {
        Ok(self.elem()?.has_class(class))
    }

    pub fn add_class(&mut self, class: &str) -> Result<&mut Self> {
        self.elem_mut()?.add_class(class);
        Ok(self)
    }

    pub fn remove_class(&mut self, class: &str) -> Result<&mut Self> {
        self.elem_mut()?.remove_class(class);
        Ok(self)
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, class: &str) -> Result<bool> {
        Ok(self.elem_mut()?.toggle_class(class))
    }

    // ----- attributes -----

    pub fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.elem()?.get_attr(name).map(str::to_string))
    }

    pub fn set_attr(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.elem_mut()?.set_attr(name, value);
        Ok(self)
    }

    pub fn remove_attr(&mut self, name: &str) -> Result<&mut Self> {
        self.elem_mut()?.remove_attr(name);
        Ok(self)
    }

    // ----- inline style -----

    pub fn css(&self, name: &str) -> Result<Option<String>> {
        let elem = self.elem()?;
        Ok(style::get_declaration(
            elem.get_attr("style").unwrap_or(""),
            name,
        ))
    }

    pub fn set_css(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        let current = self.elem()?.get_attr("style").unwrap_or("").to_string();
        let updated = style::set_declaration(&current, name, value);
        self.elem_mut()?.set_attr("style", &updated);
        Ok(self)
    }

    pub fn remove_css(&mut self, name: &str) -> Result<&mut Self> {
        let current = self.elem()?.get_attr("style").unwrap_or("").to_string();
        let updated = style::remove_declaration(&current, name);
        self.elem_mut()?.set_attr("style", &updated);
        Ok(self)
    }

    // ----- content and structure -----

    /// Concatenated descendant text
    pub fn text(&self) -> Result<String> {
        let node = self.node()?;
        Ok(self.dom.document.tree().text_content(node))
    }

    /// Replace the children with a single text node
    pub fn set_text(&mut self, text: &str) -> Result<&mut Self> {
        let node = self.node()?;
        let text_node = self.dom.document.tree_mut().create_text(text);
        self.dom
            .document
            .tree_mut()
            .replace_children(node, &[text_node])?;
        self.dom.note_structure_changed();
        Ok(self)
    }

    /// Replace the children with parsed markup
    pub fn set_html(&mut self, markup: &str) -> Result<&mut Self> {
        let node = self.node()?;
        let roots = MarkupParser::new().parse_into(&mut self.dom.document, markup);
        self.dom.document.tree_mut().replace_children(node, &roots)?;
        self.dom.note_structure_changed();
        Ok(self)
    }

    /// Append parsed markup after the existing children
    pub fn append_markup(&mut self, markup: &str) -> Result<&mut Self> {
        let node = self.node()?;
        let roots = MarkupParser::new().parse_into(&mut self.dom.document, markup);
        for root in roots {
            self.dom.document.tree_mut().append_child(node, root)?;
        }
        self.dom.note_structure_changed();
        Ok(self)
    }

    /// Append another handle's element as the last child
    pub fn append(&mut self, child: Handle) -> Result<&mut Self> {
        let parent = self.node()?;
        let child_node = self.dom.live_node(child)?;
        self.dom.document.tree_mut().append_child(parent, child_node)?;
        self.dom.note_structure_changed();
        Ok(self)
    }

    /// Insert another handle's element as the first child
    pub fn prepend(&mut self, child: Handle) -> Result<&mut Self> {
        let parent = self.node()?;
        let child_node = self.dom.live_node(child)?;
        let first = self.dom.document.tree().child_ids(parent).first().copied();
        self.dom
            .document
            .tree_mut()
            .insert_before(parent, child_node, first)?;
        self.dom.note_structure_changed();
        Ok(self)
    }

    // ----- queries -----

    /// Wrapped descendants matching `selector`
    pub fn find(&mut self, selector: &str) -> Result<Handles> {
        let node = self.node()?;
        let nodes = self.dom.document.tree().query_selector_all(node, selector)?;
        let mut items = Vec::with_capacity(nodes.len());
        for n in nodes {
            items.push(self.dom.resolve(n)?);
        }
        Ok(Handles::new(items))
    }

    /// Closest ancestor-or-self matching `selector`, wrapped
    pub fn closest(&mut self, selector: &str) -> Result<Option<Handle>> {
        let node = self.node()?;
        match self.dom.document.tree().closest(node, selector)? {
            Some(found) => self.dom.resolve(found).map(Some),
            None => Ok(None),
        }
    }

    /// Whether the element matches `selector`
    pub fn matches(&self, selector: &str) -> Result<bool> {
        let node = self.node()?;
        Ok(self.dom.document.tree().matches(node, selector)?)
    }

    // ----- geometry -----

    /// Bounding rect from the last layout pass
    pub fn rect(&self) -> Result<DOMRect> {
        let node = self.node()?;
        Ok(self.dom.document.bounding_rect(node))
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        let node = self.node()?;
        self.dom.document.geometry_mut(node).scroll_to(x, y);
        Ok(self)
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<&mut Self> {
        let node = self.node()?;
        self.dom.document.geometry_mut(node).scroll_by(dx, dy);
        Ok(self)
    }

    // ----- form values -----

    /// Form control value; `None` for non-control elements
    pub fn value(&self) -> Result<Option<String>> {
        let node = self.node()?;
        Ok(control_value(self.dom.document.tree(), node))
    }

    pub fn set_value(&mut self, value: &str) -> Result<&mut Self> {
        let node = self.node()?;
        set_control_value(self.dom.document.tree_mut(), node, value)?;
        Ok(self)
    }

    // ----- data -----

    /// Precondition shared by the data operations: live, connected, ready
    fn data_node(&self) -> Result<NodeId> {
        let node = self.node()?;
        if !self.dom.is_ready() {
            return Err(Error::NotReady);
        }
        if !self.dom.document.is_connected(node) {
            return Err(Error::NotConnected);
        }
        Ok(node)
    }

    fn data_attr(key: &str) -> String {
        format!("data-{key}")
    }

    pub fn has_data(&self, key: &str) -> Result<bool> {
        let node = self.data_node()?;
        let attr = Self::data_attr(key);
        let on_attr = self
            .dom
            .document
            .tree()
            .get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_attr(&attr));
        if on_attr {
            return Ok(true);
        }
        Ok(self
            .dom
            .registry
            .live(self.handle)
            .and_then(|s| s.data.as_ref())
            .is_some_and(|store| store.contains_key(key)))
    }

    /// Read a data value; a `data-{key}` attribute wins over the store.
    ///
    /// Attribute text is decoded as JSON when it parses, else kept as a
    /// plain string.
    pub fn get_data(&self, key: &str) -> Result<Option<Value>> {
        let node = self.data_node()?;
        let attr = Self::data_attr(key);
        let raw = self
            .dom
            .document
            .tree()
            .get(node)
            .and_then(|n| n.as_element())
            .and_then(|e| e.get_attr(&attr))
            .map(str::to_string);
        if let Some(raw) = raw {
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            return Ok(Some(value));
        }
        Ok(self
            .dom
            .registry
            .live(self.handle)
            .and_then(|s| s.data.as_ref())
            .and_then(|store| store.get(key))
            .cloned())
    }

    /// Write a data value; an existing `data-{key}` attribute keeps
    /// winning and is updated in place, else the store takes it.
    pub fn set_data(&mut self, key: &str, value: Value) -> Result<&mut Self> {
        let node = self.data_node()?;
        let attr = Self::data_attr(key);
        let on_attr = self
            .dom
            .document
            .tree()
            .get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_attr(&attr));
        if on_attr {
            let raw = match &value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if let Some(elem) = self
                .dom
                .document
                .tree_mut()
                .get_mut(node)
                .and_then(|n| n.as_element_mut())
            {
                elem.set_attr(&attr, &raw);
            }
        } else if let Some(state) = self.dom.registry.live_mut(self.handle) {
            state
                .data
                .get_or_insert_with(HashMap::new)
                .insert(key.to_string(), value);
        }
        Ok(self)
    }

    /// Drop the store entry for `key`; attributes are left alone
    pub fn remove_data(&mut self, key: &str) -> Result<&mut Self> {
        self.data_node()?;
        if let Some(store) = self
            .dom
            .registry
            .live_mut(self.handle)
            .and_then(|s| s.data.as_mut())
        {
            store.remove(key);
        }
        Ok(self)
    }

    // ----- events and lifecycle -----

    pub fn on(
        &mut self,
        types: &[&str],
        handler: impl FnMut(&mut Dom, Handle, &mut Event) + 'static,
        options: BindOptions,
    ) -> Result<ListenerId> {
        self.dom.on(self.handle, types, handler, options)
    }

    pub fn on_detach(
        &mut self,
        hook: impl FnMut(&mut Dom, Handle) + 'static,
    ) -> Result<ListenerId> {
        self.dom.on_detach(self.handle, hook)
    }

    pub fn off(&mut self, event_type: &str, id: ListenerId) -> Result<()> {
        self.dom.off(self.handle, event_type, id)
    }

    pub fn off_type(&mut self, event_type: &str) -> Result<()> {
        self.dom.off_type(self.handle, event_type)
    }

    pub fn off_all(&mut self) -> Result<()> {
        self.dom.off_all(self.handle)
    }

    /// Synthesize pointer events (see [`Dom::fire`])
    pub fn fire(&mut self, types: &[&str]) -> Result<()> {
        self.dom.fire(self.handle, types)
    }

    /// Dispatch one synthetic event of any type on this element
    pub fn trigger(&mut self, event_type: &str) -> Result<Event> {
        let node = self.node()?;
        Ok(self.dom.dispatch(node, event_type))
    }

    /// Remove the element and tear the handle down (see [`Dom::destroy`])
    pub fn destroy(self) -> Result<()> {
        self.dom.destroy(self.handle)
    }
}
