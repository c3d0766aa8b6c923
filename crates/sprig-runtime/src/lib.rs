//! sprig runtime - host primitives
//!
//! The pieces a browser would provide: the native listener registry with
//! one-shot revocation tokens, the synthetic event object, and a FIFO
//! microtask queue. No parallelism anywhere; everything is driven by the
//! owner on one logical thread.

mod abort;
mod event;
mod events;
mod microtask;

pub use abort::{AbortToken, TokenSource};
pub use event::{is_pointer_event_type, Event};
pub use events::{DispatchPlan, EventTable, ListenerId};
pub use microtask::Microtasks;
