//! Axis-aligned rectangles in world space
//!
//! World coordinates are centered on the origin with +y up. Sheet-space
//! frame rects reuse the same type with y growing downward; only the
//! min <= max invariant matters to the math here.

use glam::Vec2;

/// An axis-aligned bounding box. Invariant: min.x <= max.x, min.y <= max.y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point of the rect
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// The rect shifted by `delta`, size preserved
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Strict overlap test: rects sharing only an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}
