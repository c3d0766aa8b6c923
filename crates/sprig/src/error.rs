//! Error taxonomy
//!
//! Every precondition violation is a hard stop at the call site; nothing
//! here is retried or recovered. Lookup misses are not errors.

use sprig_dom::DomError;

/// Result alias for sprig operations
pub type Result<T> = std::result::Result<T, Error>;

/// sprig errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation on a destroyed handle (or a second destroy)
    #[error("element has been removed")]
    Removed,

    /// Operation needs the watcher running (document structure present)
    #[error("document structure is not ready")]
    NotReady,

    /// Operation needs the element connected to the document
    #[error("element is not connected to a document")]
    NotConnected,

    /// Event type name is empty, contains whitespace, or is reserved
    #[error("invalid event type: {0:?}")]
    InvalidEventType(String),

    /// Resolve target is neither an element nor the document
    #[error("expected an element or document node")]
    NotAnElement,

    /// Markup passed to resolve did not contain exactly one element
    #[error("markup must contain exactly one element")]
    NotSingleElement,

    /// Bulk bind got a handler list of the wrong length
    #[error("{got} handlers for {expected} elements")]
    HandlerCountMismatch { expected: usize, got: usize },

    /// Auto-trigger requested for a non-pointer event type
    #[error("cannot synthesize {0:?}: not a pointer event")]
    NotPointerEvent(String),

    /// Substrate failure (unknown node, hierarchy misuse, bad selector)
    #[error(transparent)]
    Dom(#[from] DomError),
}
