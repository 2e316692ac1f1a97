//! Terminal Input - crossterm event adaptation
//!
//! Bridges crossterm's event system with the event bridge: raw terminal
//! events become named [`PointerEvent`]s emitted through an
//! [`EventEmitter`], so listeners registered via the bridge see the
//! same calling convention regardless of the host platform.
//!
//! Terminal cells are viewport-relative, so converted positions carry
//! client coordinates and pick up the document scroll offset during
//! resolution.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert a crossterm mouse event to (name, event)
//! - `pump_event` - Route one crossterm event through an emitter
//!
//! Event acquisition (polling, reading, mouse capture) is the
//! embedder's business; this module only adapts what the embedder read.

use crossterm::event::{
    Event as CrosstermEvent, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use super::bridge::EventEmitter;
use super::pointer::PointerEvent;

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert a crossterm mouse event to an event-type name and a
/// [`PointerEvent`] with client coordinates.
pub fn convert_mouse_event(event: &CrosstermMouseEvent) -> (&'static str, PointerEvent) {
    let name = match event.kind {
        MouseEventKind::Down(_) => "mousedown",
        MouseEventKind::Up(_) => "mouseup",
        MouseEventKind::Drag(_) => "mousedrag",
        MouseEventKind::Moved => "mousemove",
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => "wheel",
    };
    let pointer = PointerEvent::client(f64::from(event.column), f64::from(event.row));
    (name, pointer)
}

// =============================================================================
// PUMPING
// =============================================================================

/// Route one crossterm event through the emitter.
///
/// Mouse events emit under their converted name; focus changes emit
/// `focus`/`blur` with an empty event. Returns the emitted event-type
/// name, or `None` for event kinds this layer does not carry.
pub fn pump_event(emitter: &EventEmitter, event: &CrosstermEvent) -> Option<&'static str> {
    match event {
        CrosstermEvent::Mouse(mouse) => {
            let (name, pointer) = convert_mouse_event(mouse);
            emitter.emit(name, &pointer);
            Some(name)
        }
        CrosstermEvent::FocusGained => {
            emitter.emit("focus", &PointerEvent::empty());
            Some("focus")
        }
        CrosstermEvent::FocusLost => {
            emitter.emit("blur", &PointerEvent::empty());
            Some("blur")
        }
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
