//! Document - high-level document API

use std::collections::HashMap;

use crate::geometry::{DOMRect, ElementGeometry};
use crate::tree::DomTree;
use crate::NodeId;

/// HTML document: the tree plus cached structural elements
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Box-model state per element, filled in by an external layout pass
    geometry: HashMap<NodeId, ElementGeometry>,
}

impl Document {
    /// Create a new document with the html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        doc.ensure_structure();
        doc
    }

    /// Create an empty document (document node only, no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            geometry: HashMap::new(),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the html/head/body skeleton if absent; returns the body
    pub fn ensure_structure(&mut self) -> NodeId {
        if self.body_element.is_valid() {
            return self.body_element;
        }
        self.finalize();
        if self.body_element.is_valid() {
            return self.body_element;
        }

        if !self.html_element.is_valid() {
            let html = self.tree.create_element("html");
            self.tree
                .append_child(self.tree.root(), html)
                .unwrap_or(html);
            self.html_element = html;
        }
        if !self.head_element.is_valid() {
            let head = self.tree.create_element("head");
            self.tree
                .append_child(self.html_element, head)
                .unwrap_or(head);
            self.head_element = head;
        }
        let body = self.tree.create_element("body");
        self.tree
            .append_child(self.html_element, body)
            .unwrap_or(body);
        self.body_element = body;
        body
    }

    /// Locate html/head/body in the tree and refresh the caches.
    ///
    /// Called after a parse fills the tree behind the document's back.
    pub fn finalize(&mut self) {
        for (id, node) in self.tree.children(self.tree.root()) {
            if node.as_element().is_some_and(|e| e.tag == "html") {
                self.html_element = id;
                break;
            }
        }
        if !self.html_element.is_valid() {
            return;
        }
        for (id, node) in self.tree.children(self.html_element) {
            let Some(elem) = node.as_element() else { continue };
            match elem.tag.as_str() {
                "head" => self.head_element = id,
                "body" => self.body_element = id,
                _ => {}
            }
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.is_valid().then_some(self.html_element)
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.is_valid().then_some(self.head_element)
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.is_valid().then_some(self.body_element)
    }

    /// Get element by ID (uses the cached id attribute)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_with_id(self.tree.root(), id)
    }

    fn find_element_with_id(&self, start: NodeId, target: &str) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if let Some(elem) = node.as_element() {
                if elem.id.as_deref() == Some(target) {
                    return Some(node_id);
                }
            }
            if let Some(found) = self.find_element_with_id(node_id, target) {
                return Some(found);
            }
        }
        None
    }

    /// Check whether a node is part of this document's tree
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Record geometry for an element (layout output or test fixture)
    pub fn set_geometry(&mut self, node: NodeId, geometry: ElementGeometry) {
        self.geometry.insert(node, geometry);
    }

    /// Geometry of an element; zeroed if layout never touched it
    pub fn geometry_of(&self, node: NodeId) -> ElementGeometry {
        self.geometry.get(&node).copied().unwrap_or_default()
    }

    /// Mutable geometry entry for an element
    pub fn geometry_mut(&mut self, node: NodeId) -> &mut ElementGeometry {
        self.geometry.entry(node).or_default()
    }

    /// Bounding rect of an element
    pub fn bounding_rect(&self, node: NodeId) -> DOMRect {
        self.geometry_of(node).bounding_client_rect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
