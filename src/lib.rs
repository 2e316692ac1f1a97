//! # easel-events
//!
//! Event bridge and frame scheduler for the Easel vector graphics
//! runtime.
//!
//! This is the host-interaction helper layer: it adapts host event
//! semantics to the runtime's internal calling convention and coalesces
//! per-frame work into a single upstream frame request. It owns no
//! scene and renders nothing. Elements are plain indices, and
//! everything the layer needs to know about them comes through the
//! injected [`host::HostInspector`] boundary.
//!
//! ## Architecture
//!
//! ```text
//! host events ─→ EventEmitter ─→ registered handlers
//!                                      │
//!                             schedule(callback, element)
//!                                      ▼
//! FrameDriver tick ─→ eligibility scan (in view? focused? keepalive?)
//!                         ├─ eligible: remove + invoke (reverse order)
//!                         └─ deferred: wait for a later tick
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Point`, the only geometry this layer needs
//! - [`host`] - Host-inspection boundary and in-memory registry
//! - [`event`] - Handler (de)registration, pointer extraction, crossterm adapter
//! - [`scheduler`] - Coalescing frame scheduler and fallback clock

pub mod event;
pub mod host;
pub mod scheduler;
pub mod types;

// Re-export commonly used items
pub use types::Point;

pub use host::{ElementFlags, HostInspector, HostRegistry};

pub use event::{
    add_listeners, event_offset, event_point, event_target, related_target, remove_listeners,
    Coords, EventEmitter, EventHandler, EventMap, EventTarget, PointerEvent,
};

pub use scheduler::{
    FrameCallback, FrameDriver, FrameScheduler, IntervalClock, TimerDriver, FRAME_PERIOD,
    KEEPALIVE_ATTRIBUTE,
};
