//! HTML5 parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to the sprig arena tree.
//! Fragment input goes through a full document parse as well; the body
//! children of the throwaway RcDom become the fragment roots.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use sprig_dom::{Document, DomTree, NodeId};

/// HTML5 parser
pub struct MarkupParser;

impl MarkupParser {
    /// Create a new markup parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .expect("HTML parsing should not fail");

        let mut document = Document::empty(url);
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert(child, document.tree_mut()) {
                let root = document.tree().root();
                let _ = document.tree_mut().append_child(root, id);
            }
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse markup and convert the resulting body content into detached
    /// subtrees inside `doc`, returning their roots in source order.
    ///
    /// Nothing is attached to `doc`'s tree structure; the caller decides
    /// where (and whether) the fragments land.
    pub fn parse_into(&self, doc: &mut Document, markup: &str) -> Vec<NodeId> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut markup.as_bytes())
            .expect("HTML parsing should not fail");

        let Some(body) = find_body(&dom.document) else {
            return Vec::new();
        };
        let mut roots = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.convert(child, doc.tree_mut()) {
                roots.push(id);
            }
        }
        roots
    }

    /// Convert an RcDom node (and its subtree) into a detached arena node
    fn convert(&self, handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
        match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return None;
                }
                Some(tree.create_text(&text))
            }
            RcNodeData::Comment { contents } => Some(tree.create_comment(&contents.to_string())),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.convert(child, tree) {
                        let _ = tree.append_child(id, child_id);
                    }
                }
                Some(id)
            }
            // Document is handled by the callers; doctype and processing
            // instructions carry nothing this tree keeps.
            _ => None,
        }
    }
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    for child in document.children.borrow().iter() {
        let RcNodeData::Element { name, .. } = &child.data else {
            continue;
        };
        if &*name.local != "html" {
            continue;
        }
        for inner in child.children.borrow().iter() {
            if let RcNodeData::Element { name, .. } = &inner.data {
                if &*name.local == "body" {
                    return Some(inner.clone());
                }
            }
        }
    }
    None
}
