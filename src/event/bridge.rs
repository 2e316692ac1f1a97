//! Event Bridge - Handler (de)registration on host targets
//!
//! Attaches and detaches named event handlers on a host target. The
//! host may be absent (`None`), in which case both operations are
//! silent no-ops. That keeps code paths shared with headless/worker
//! contexts free of conditionals at every call site.
//!
//! An [`EventMap`] maps *type-lists* to handlers. A type-list is a
//! whitespace/comma-separated string of event names; each name gets its
//! own independent registration. Removal with the same map removes
//! exactly those registrations, identified by handler identity
//! (`Rc::ptr_eq`), and removing a handler that was never registered is
//! a no-op, preserving the idempotent semantics of platform listener
//! APIs.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use easel_events::event::{add_listeners, EventEmitter, EventMap};
//!
//! let window = EventEmitter::new();
//! let events = EventMap::new()
//!     .on("mousedown touchstart", Rc::new(|event| { /* ... */ }));
//!
//! add_listeners(Some(&window), &events);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::pointer::PointerEvent;

// =============================================================================
// TYPES
// =============================================================================

/// A shared event handler. `Rc` so the same handler can be registered
/// under several event names and later removed by identity.
pub type EventHandler = Rc<dyn Fn(&PointerEvent)>;

/// Ordered mapping from type-lists to handlers.
///
/// Order matters only for deterministic registration order; lookups
/// never happen on the map itself.
#[derive(Default)]
pub struct EventMap {
    entries: Vec<(String, EventHandler)>,
}

impl EventMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler for a whitespace/comma-separated list of event
    /// names. Builder-style.
    pub fn on(mut self, types: impl Into<String>, handler: EventHandler) -> Self {
        self.entries.push((types.into(), handler));
        self
    }

    /// Iterate over (type-list, handler) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EventHandler)> {
        self.entries.iter().map(|(t, h)| (t.as_str(), h))
    }

    /// Number of (type-list, handler) pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no pairs were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a type-list into individual event names.
///
/// Splits on any run of whitespace or commas; empty segments (leading
/// separators, `"a,, b"`) are dropped.
fn split_types(types: &str) -> impl Iterator<Item = &str> {
    types
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
}

// =============================================================================
// EVENT TARGET
// =============================================================================

/// A host object that listeners can be attached to.
///
/// Implementations must tolerate duplicate registration (the handler
/// fires once per registration) and removal of unknown handlers
/// (no-op).
pub trait EventTarget {
    /// Register a handler for a single event type.
    fn add_listener(&self, event_type: &str, handler: EventHandler);

    /// Remove a previously registered handler for a single event type,
    /// matched by identity.
    fn remove_listener(&self, event_type: &str, handler: &EventHandler);
}

/// Register every handler in `events` for every name in its type-list.
///
/// Absent host is a silent no-op.
pub fn add_listeners<T: EventTarget>(host: Option<&T>, events: &EventMap) {
    if let Some(host) = host {
        for (types, handler) in events.iter() {
            for name in split_types(types) {
                host.add_listener(name, handler.clone());
            }
        }
    }
}

/// Remove every handler in `events` for every name in its type-list.
///
/// Absent host is a silent no-op; so is removing a handler that was
/// never registered.
pub fn remove_listeners<T: EventTarget>(host: Option<&T>, events: &EventMap) {
    if let Some(host) = host {
        for (types, handler) in events.iter() {
            for name in split_types(types) {
                host.remove_listener(name, handler);
            }
        }
    }
}

// =============================================================================
// EVENT EMITTER
// =============================================================================

/// In-crate [`EventTarget`]: a listener registry with synchronous
/// dispatch.
///
/// Used as the window-like host in embedders without a platform event
/// system, and as the delivery point for adapted terminal events.
#[derive(Default)]
pub struct EventEmitter {
    listeners: RefCell<HashMap<String, Vec<EventHandler>>>,
}

impl EventEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every listener registered for `event_type`, in
    /// registration order.
    pub fn emit(&self, event_type: &str, event: &PointerEvent) {
        // Snapshot before dispatch so handlers may add/remove listeners
        // without holding the registry borrow.
        let handlers: Vec<EventHandler> = self
            .listeners
            .borrow()
            .get(event_type)
            .map(|list| list.to_vec())
            .unwrap_or_default();
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of listeners registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map(|list| list.len())
            .unwrap_or(0)
    }
}

impl EventTarget for EventEmitter {
    fn add_listener(&self, event_type: &str, handler: EventHandler) {
        self.listeners
            .borrow_mut()
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    fn remove_listener(&self, event_type: &str, handler: &EventHandler) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(list) = listeners.get_mut(event_type) {
            if let Some(pos) = list.iter().position(|h| Rc::ptr_eq(h, handler)) {
                list.remove(pos);
            }
            if list.is_empty() {
                listeners.remove(event_type);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
