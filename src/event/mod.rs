//! Event Module - Bridge, pointer extraction, terminal adaptation
//!
//! The host-facing half of the crate:
//!
//! - **Bridge** - Attach/detach named handlers on a (possibly absent) host
//! - **Pointer** - Position/target resolution from heterogeneous event shapes
//! - **Terminal** - crossterm events adapted to the bridge's convention

mod bridge;
mod pointer;
pub mod terminal;

pub use bridge::{
    add_listeners, remove_listeners, EventEmitter, EventHandler, EventMap, EventTarget,
};
pub use pointer::{event_offset, event_point, event_target, related_target, Coords, PointerEvent};
