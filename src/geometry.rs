//! Screen-space primitives shared by the whole simulation.
//!
//! Everything simulates in a fixed 1200x800 screen space with the origin at
//! the top-left and y growing downward. The renderer owns the flip into
//! Bevy's world space; nothing in here knows about it.

use bevy::math::Vec2;

pub const SCREEN_WIDTH: f32 = 1200.0;
pub const SCREEN_HEIGHT: f32 = 800.0;

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap: rectangles that merely share an edge do not collide.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A static piece of level geometry. Solid platforms block from every side;
/// one-way platforms only catch bodies falling onto their top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub bounds: Bounds,
    pub solid: bool,
}

impl Platform {
    pub const fn solid(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            bounds: Bounds::new(x, y, w, h),
            solid: true,
        }
    }

    pub const fn one_way(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            bounds: Bounds::new(x, y, w, h),
            solid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_edge_exclusive() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let touching = Bounds::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Bounds::new(9.0, 9.0, 10.0, 10.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn center_and_extents() {
        let b = Bounds::new(100.0, 200.0, 50.0, 70.0);
        assert_eq!(b.right(), 150.0);
        assert_eq!(b.bottom(), 270.0);
        assert_eq!(b.center(), Vec2::new(125.0, 235.0));
    }
}
