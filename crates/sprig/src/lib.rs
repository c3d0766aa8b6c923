//! sprig - chainable DOM handles with automatic lifecycle cleanup
//!
//! Wraps document elements in single-instance handles with chainable
//! query, mutation, event-binding and data operations. The part that
//! earns its keep is cleanup: a process-wide watcher observes child-list
//! mutations, walks removed subtrees for registered handles, and tears
//! each one down exactly once - listeners, data, detach hooks - no
//! matter which code path detached the element.
//!
//! Features:
//! - One live handle per element, probed through a non-enumerable registry
//! - Per-handle revocation token: one operation removes all listeners
//! - Deferred detachment check, so remove-then-reinsert is a move
//! - Ready gate queueing work until the document structure exists
//!
//! ```
//! use sprig::{BindOptions, Dom};
//!
//! let mut dom = Dom::new();
//! let item = dom.resolve_markup("<li class=\"row\">A</li>")?;
//! let body = dom.document().body().expect("structure exists");
//! let root = dom.resolve(body)?;
//! dom.at(root).append(item)?;
//!
//! dom.at(item).on(&["click"], |_, _, _| {}, BindOptions::default())?;
//! dom.at(item).on_detach(|_, _| {})?;
//!
//! dom.at(root).set_html("")?; // detaches the <li> out of band
//! dom.flush(); // hook has fired, handle is dead
//! assert!(!dom.at(item).is_live());
//! # Ok::<(), sprig::Error>(())
//! ```

mod bulk;
mod dom;
mod error;
mod events;
mod handle;
mod lifecycle;
mod ops;
mod ready;
mod registry;

pub use bulk::Handles;
pub use dom::Dom;
pub use error::{Error, Result};
pub use events::{BindOptions, DetachHook, EventHandler};
pub use handle::DETACH;
pub use ops::HandleRef;
pub use registry::Handle;

pub use serde_json::Value;
pub use sprig_dom::{DOMRect, Document, DomError, ElementGeometry, NodeId};
pub use sprig_runtime::{Event, ListenerId};
