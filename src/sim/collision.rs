//! Axis-aligned box overlap
//!
//! Every gameplay collision in the shooter is box-vs-box. Edges that only
//! touch do not count: all four comparisons are strict.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict intersection test (shared edges are not an overlap)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_basic() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        // Shares the right edge
        assert!(!a.overlaps(&boxed(10.0, 0.0, 10.0, 10.0)));
        // Shares the bottom edge
        assert!(!a.overlaps(&boxed(0.0, 10.0, 10.0, 10.0)));
        // Shares only a corner
        assert!(!a.overlaps(&boxed(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_disjoint() {
        let a = boxed(0.0, 0.0, 4.0, 4.0);
        assert!(!a.overlaps(&boxed(100.0, 100.0, 4.0, 4.0)));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = boxed(0.0, 0.0, 64.0, 64.0);
        let inner = boxed(30.0, 30.0, 4.0, 4.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0, aw in 0.5f32..40.0, ah in 0.5f32..40.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0, bw in 0.5f32..40.0, bh in 0.5f32..40.0,
        ) {
            let a = boxed(ax, ay, aw, ah);
            let b = boxed(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn edge_adjacent_boxes_never_overlap(
            x in -50.0f32..50.0, y in -50.0f32..50.0, w in 1.0f32..40.0, h in 1.0f32..40.0,
            other_h in 1.0f32..40.0,
        ) {
            let a = boxed(x, y, w, h);
            let right_neighbour = boxed(a.right(), y, w, other_h);
            let below_neighbour = boxed(x, a.bottom(), w, other_h);
            prop_assert!(!a.overlaps(&right_neighbour));
            prop_assert!(!a.overlaps(&below_neighbour));
        }
    }
}
