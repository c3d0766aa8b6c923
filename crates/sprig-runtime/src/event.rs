//! Synthetic events
//!
//! The event object handed to listeners, plus the pointer/click family
//! classification used by the auto-trigger shortcut.

use sprig_dom::NodeId;

/// Event types eligible for synthetic auto-triggering
const POINTER_EVENT_TYPES: &[&str] = &[
    "click",
    "dblclick",
    "mousedown",
    "mouseup",
    "mousemove",
    "mouseenter",
    "mouseleave",
    "mouseover",
    "mouseout",
    "contextmenu",
];

/// Check if an event type belongs to the pointer/click family
pub fn is_pointer_event_type(event_type: &str) -> bool {
    POINTER_EVENT_TYPES.contains(&event_type)
}

/// A dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    target: NodeId,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event aimed at one target
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Event type name
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Target node
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop the remaining listeners of this dispatch from running
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_family() {
        assert!(is_pointer_event_type("click"));
        assert!(is_pointer_event_type("contextmenu"));
        assert!(!is_pointer_event_type("keydown"));
        assert!(!is_pointer_event_type(""));
    }

    #[test]
    fn test_prevent_default_respects_cancelable() {
        let mut event = Event::new("click", NodeId::ROOT);
        event.cancelable = false;
        event.prevent_default();
        assert!(!event.is_default_prevented());

        event.cancelable = true;
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
