//! The Dom facade
//!
//! Owns the document, the native event table, the microtask queue, the
//! identity registry and the watcher state. Every operation of the
//! library runs through this type on one logical thread; "async" here
//! means queued on the microtask queue and drained by [`Dom::flush`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sprig_dom::{Document, ElementQuery, NodeId, TreeWalker};
use sprig_html::MarkupParser;
use sprig_runtime::{EventTable, ListenerId, Microtasks};

use crate::bulk::Handles;
use crate::error::{Error, Result};
use crate::events::{DetachHook, EventHandler};
use crate::handle::HandleState;
use crate::lifecycle::WatcherState;
use crate::ready::ReadyQueue;
use crate::registry::{Handle, Registry};

/// The document environment plus all library-side state
pub struct Dom {
    pub(crate) document: Document,
    pub(crate) registry: Registry,
    pub(crate) events: EventTable,
    pub(crate) tasks: Microtasks<Dom>,
    pub(crate) handlers: HashMap<ListenerId, Rc<RefCell<EventHandler>>>,
    pub(crate) hooks: HashMap<ListenerId, Rc<RefCell<DetachHook>>>,
    /// One traversal cursor reused across every mutation batch
    pub(crate) walker: TreeWalker,
    pub(crate) watcher: WatcherState,
    pub(crate) ready: ReadyQueue,
    pub(crate) delivery_scheduled: bool,
}

impl Dom {
    /// New environment with the html/head/body skeleton; the watcher
    /// starts immediately.
    pub fn new() -> Self {
        Self::with_document(Document::new("about:blank"))
    }

    /// New environment around an empty document. The watcher (and with
    /// it the ready flag) waits for [`Dom::ensure_structure`].
    pub fn bare() -> Self {
        Self::with_document(Document::empty("about:blank"))
    }

    /// Parse a full document and wrap it
    pub fn parse(html: &str) -> Self {
        Self::with_document(MarkupParser::new().parse(html))
    }

    fn with_document(document: Document) -> Self {
        let mut dom = Self {
            document,
            registry: Registry::default(),
            events: EventTable::new(),
            tasks: Microtasks::new(),
            handlers: HashMap::new(),
            hooks: HashMap::new(),
            walker: TreeWalker::new(),
            watcher: WatcherState::NotStarted,
            ready: ReadyQueue::default(),
            delivery_scheduled: false,
        };
        dom.start_watcher();
        dom
    }

    /// Build html/head/body if absent and start the watcher; the
    /// structural-ready signal for environments created with `bare`.
    pub fn ensure_structure(&mut self) -> NodeId {
        let body = self.document.ensure_structure();
        self.start_watcher();
        body
    }

    /// The underlying document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the underlying document.
    ///
    /// Tree changes made through this bypass the library entirely; the
    /// watcher still picks their removals up at the next flush.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Get or create the handle for a node.
    ///
    /// Repeated calls return the identical handle until it is destroyed;
    /// only elements and the document node can be wrapped.
    pub fn resolve(&mut self, node: NodeId) -> Result<Handle> {
        let n = self
            .document
            .tree()
            .get(node)
            .ok_or(Error::Dom(sprig_dom::DomError::NotFound))?;
        if !n.is_element() && !n.is_document() {
            return Err(Error::NotAnElement);
        }
        if let Some(handle) = self.registry.handle_for(node) {
            return Ok(handle);
        }
        Ok(self.registry.insert(HandleState::new(node)))
    }

    /// Parse markup that must contain exactly one element, leave it
    /// detached, and wrap it.
    pub fn resolve_markup(&mut self, markup: &str) -> Result<Handle> {
        let roots = MarkupParser::new().parse_into(&mut self.document, markup);
        let elements: Vec<NodeId> = roots
            .into_iter()
            .filter(|&id| self.document.tree().get(id).is_some_and(|n| n.is_element()))
            .collect();
        match elements.as_slice() {
            [only] => self.resolve(*only),
            _ => Err(Error::NotSingleElement),
        }
    }

    /// Create a detached element and wrap it
    pub fn create(&mut self, tag: &str) -> Handle {
        let node = self.document.tree_mut().create_element(tag);
        self.registry.insert(HandleState::new(node))
    }

    /// First element matching `selector`, wrapped; `None` on a miss
    pub fn query(&mut self, selector: &str) -> Result<Option<Handle>> {
        let root = self.document.tree().root();
        let found = self.document.tree().query_selector(root, selector)?;
        match found {
            Some(node) => self.resolve(node).map(Some),
            None => Ok(None),
        }
    }

    /// All elements matching `selector`, wrapped, in document order
    pub fn select(&mut self, selector: &str) -> Result<Handles> {
        let root = self.document.tree().root();
        let nodes = self.document.tree().query_selector_all(root, selector)?;
        let mut items = Vec::with_capacity(nodes.len());
        for node in nodes {
            items.push(self.resolve(node)?);
        }
        Ok(Handles::new(items))
    }

    /// Drain the microtask queue to quiescence.
    ///
    /// Pending mutation records are delivered first, and the deferred
    /// connectivity checks they schedule run in the same drain.
    pub fn flush(&mut self) {
        loop {
            self.note_structure_changed();
            let Some(task) = self.tasks.pop() else {
                break;
            };
            task(self);
        }
    }

    /// Node behind a handle; the lifecycle error when destroyed
    pub(crate) fn live_node(&self, handle: Handle) -> Result<NodeId> {
        self.registry
            .live(handle)
            .map(|state| state.node)
            .ok_or(Error::Removed)
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dom")
            .field("nodes", &self.document.tree().len())
            .field("watcher", &self.watcher)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}
