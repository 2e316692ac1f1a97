//! Core types for easel-events.
//!
//! This layer needs almost no geometry: positions resolved from host
//! events and element offsets are plain 2D points, nothing more.

// =============================================================================
// Point
// =============================================================================

/// A 2D position in host coordinates.
///
/// Used for resolved event positions, document scroll offsets and
/// element offsets. Floating point because host page coordinates are
/// fractional on scaled displays.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Component-wise sum.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference (`self - other`).
    ///
    /// Backs target-relative offsets: event position minus the
    /// target's on-screen offset.
    #[inline]
    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================
