//! Pointer Extraction - Position and target resolution from host events
//!
//! Host events come in several shapes: multi-touch (a list of active
//! touches), single-touch (only changed touches remain), and plain
//! pointer/mouse events carrying coordinates directly. These pure
//! functions normalize all of them to `Point`s and element indices.
//!
//! Position resolution prefers page-relative coordinates and falls back
//! to client-relative coordinates adjusted by the document scroll
//! offset. When an axis has neither, resolution yields `None`; the
//! original behavior there is undefined and nothing is invented.
//!
//! # API
//!
//! - `event_point(event, inspector)` - Resolve the input position
//! - `event_target(event)` - Primary target with legacy fallback
//! - `related_target(event)` - Related target with legacy fallback
//! - `event_offset(event, target, inspector)` - Target-relative position

use crate::host::HostInspector;
use crate::types::Point;

// =============================================================================
// TYPES
// =============================================================================

/// Raw coordinates as carried by a host event or a single touch.
///
/// All fields optional: legacy event shapes populate only one of the
/// two coordinate systems.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coords {
    pub page_x: Option<f64>,
    pub page_y: Option<f64>,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
}

impl Coords {
    /// Page-relative coordinates.
    pub const fn page(x: f64, y: f64) -> Self {
        Self {
            page_x: Some(x),
            page_y: Some(y),
            client_x: None,
            client_y: None,
        }
    }

    /// Client-relative coordinates (need scroll adjustment).
    pub const fn client(x: f64, y: f64) -> Self {
        Self {
            page_x: None,
            page_y: None,
            client_x: Some(x),
            client_y: Some(y),
        }
    }

    /// Resolve to a page-relative point: per axis, page coordinate if
    /// present, else client coordinate plus the document scroll offset,
    /// else `None`.
    pub fn resolve(&self, scroll: Point) -> Option<Point> {
        let x = self.page_x.or_else(|| self.client_x.map(|c| c + scroll.x))?;
        let y = self.page_y.or_else(|| self.client_y.map(|c| c + scroll.y))?;
        Some(Point::new(x, y))
    }
}

/// A normalized input event as delivered by the host layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvent {
    /// The event's own coordinates (pointer/mouse shape).
    pub coords: Coords,
    /// Active touches. `None` means this is not a touch event; an empty
    /// list means a touch event whose touches all ended.
    pub target_touches: Option<Vec<Coords>>,
    /// Touches that changed in this event (touch end carries the lifted
    /// touch here).
    pub changed_touches: Vec<Coords>,
    /// The element the event was dispatched on.
    pub target: Option<usize>,
    /// Legacy alias for `target`.
    pub src_element: Option<usize>,
    /// The secondary element (e.g. where the pointer came from).
    pub related_target: Option<usize>,
    /// Legacy alias for `related_target`.
    pub to_element: Option<usize>,
}

impl PointerEvent {
    /// An event carrying no coordinates and no targets (focus/blur).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A pointer/mouse event with page coordinates.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            coords: Coords::page(x, y),
            ..Self::default()
        }
    }

    /// A pointer/mouse event with client coordinates only.
    pub fn client(x: f64, y: f64) -> Self {
        Self {
            coords: Coords::client(x, y),
            ..Self::default()
        }
    }

    /// A touch event with the given active and changed touch lists.
    pub fn touch(target_touches: Vec<Coords>, changed_touches: Vec<Coords>) -> Self {
        Self {
            target_touches: Some(target_touches),
            changed_touches,
            ..Self::default()
        }
    }

    /// Set the primary target element.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the legacy primary-target alias.
    pub fn with_src_element(mut self, element: usize) -> Self {
        self.src_element = Some(element);
        self
    }

    /// Set the related (secondary) target element.
    pub fn with_related_target(mut self, target: usize) -> Self {
        self.related_target = Some(target);
        self
    }

    /// Set the legacy related-target alias.
    pub fn with_to_element(mut self, element: usize) -> Self {
        self.to_element = Some(element);
        self
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Resolve the event's input position.
///
/// Touch events use the first active touch, falling back to the first
/// changed touch when all touches ended; pointer/mouse events use their
/// own coordinates. The chosen coordinates resolve page-over-client
/// with scroll adjustment, `None` when both are absent.
pub fn event_point(event: &PointerEvent, inspector: &impl HostInspector) -> Option<Point> {
    let pos = match &event.target_touches {
        Some(active) => match active.first() {
            Some(first) => first,
            None => event.changed_touches.first()?,
        },
        None => &event.coords,
    };
    pos.resolve(inspector.scroll_offset())
}

/// The event's primary target, falling back to the legacy alias.
pub fn event_target(event: &PointerEvent) -> Option<usize> {
    event.target.or(event.src_element)
}

/// The event's related target, falling back to the legacy alias.
pub fn related_target(event: &PointerEvent) -> Option<usize> {
    event.related_target.or(event.to_element)
}

/// The event's position relative to `target`'s on-screen offset.
///
/// With no explicit target the event's own primary target is used;
/// `None` when neither a position nor a target can be resolved.
pub fn event_offset(
    event: &PointerEvent,
    target: Option<usize>,
    inspector: &impl HostInspector,
) -> Option<Point> {
    let target = target.or_else(|| event_target(event))?;
    let point = event_point(event, inspector)?;
    Some(point.subtract(inspector.element_offset(target)))
}

// =============================================================================
// TESTS
// =============================================================================
