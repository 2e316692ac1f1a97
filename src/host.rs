//! Host Inspection - The boundary to the embedding environment
//!
//! The event and scheduler layers never talk to the host UI system
//! directly. Everything they need to know about an element (whether it
//! is currently in view, its attributes, its on-screen offset) and the
//! document scroll offset comes through the [`HostInspector`] trait.
//! Embedders implement it over their real scene; tests and simple
//! embedders use the in-memory [`HostRegistry`].
//!
//! Elements are plain `usize` indices. An index the inspector has never
//! seen degrades to a neutral answer (not in view, no attributes, zero
//! offset) instead of failing.
//!
//! # Example
//!
//! ```ignore
//! use easel_events::host::{HostInspector, HostRegistry};
//!
//! let mut host = HostRegistry::new();
//! let canvas = host.insert();
//! host.set_in_view(canvas, true);
//! host.set_attribute(canvas, "keepalive", "true");
//!
//! assert!(host.is_in_view(canvas));
//! ```

use std::collections::HashMap;

use crate::types::Point;

// =============================================================================
// TYPES
// =============================================================================

bitflags::bitflags! {
    /// Per-element state flags tracked by the registry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// The element currently intersects the visible viewport.
        const IN_VIEW = 1 << 0;
    }
}

/// One registered element: flags, string attributes, on-screen offset.
#[derive(Debug, Default)]
struct ElementRecord {
    flags: ElementFlags,
    attributes: HashMap<String, String>,
    offset: Point,
}

// =============================================================================
// HOST INSPECTOR
// =============================================================================

/// Read-only view of the host environment.
///
/// Injected into the scheduler's tick and the pointer-extraction
/// functions so they can be driven deterministically in tests.
pub trait HostInspector {
    /// Is the element currently visible in the viewport?
    fn is_in_view(&self, element: usize) -> bool;

    /// Read a string attribute off the element, if set.
    fn attribute(&self, element: usize, name: &str) -> Option<String>;

    /// The document's current scroll offset.
    fn scroll_offset(&self) -> Point;

    /// The element's on-screen offset (page coordinates of its origin).
    fn element_offset(&self, element: usize) -> Point;
}

// =============================================================================
// HOST REGISTRY
// =============================================================================

/// In-memory [`HostInspector`] keyed by element index.
///
/// Indices are handed out sequentially by [`insert`](Self::insert) and
/// never reused.
#[derive(Debug, Default)]
pub struct HostRegistry {
    elements: HashMap<usize, ElementRecord>,
    scroll: Point,
    next_index: usize,
}

impl HostRegistry {
    /// Create an empty registry with zero scroll offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new element. Starts out of view, with no attributes
    /// and zero offset.
    pub fn insert(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.elements.insert(index, ElementRecord::default());
        index
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when no elements are registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Mark an element in or out of view. Unknown index is a no-op.
    pub fn set_in_view(&mut self, element: usize, in_view: bool) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.flags.set(ElementFlags::IN_VIEW, in_view);
        }
    }

    /// Set a string attribute on an element. Unknown index is a no-op.
    pub fn set_attribute(&mut self, element: usize, name: &str, value: &str) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute from an element.
    pub fn remove_attribute(&mut self, element: usize, name: &str) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.attributes.remove(name);
        }
    }

    /// Set an element's on-screen offset. Unknown index is a no-op.
    pub fn set_offset(&mut self, element: usize, offset: Point) {
        if let Some(record) = self.elements.get_mut(&element) {
            record.offset = offset;
        }
    }

    /// Set the document scroll offset.
    pub fn set_scroll_offset(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    /// Remove an element entirely. Unknown index is a no-op.
    pub fn remove(&mut self, element: usize) {
        self.elements.remove(&element);
    }
}

impl HostInspector for HostRegistry {
    fn is_in_view(&self, element: usize) -> bool {
        self.elements
            .get(&element)
            .map(|r| r.flags.contains(ElementFlags::IN_VIEW))
            .unwrap_or(false)
    }

    fn attribute(&self, element: usize, name: &str) -> Option<String> {
        self.elements
            .get(&element)
            .and_then(|r| r.attributes.get(name).cloned())
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn element_offset(&self, element: usize) -> Point {
        self.elements
            .get(&element)
            .map(|r| r.offset)
            .unwrap_or(Point::ZERO)
    }
}

// =============================================================================
// TESTS
// =============================================================================
