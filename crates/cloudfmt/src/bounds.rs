//! Point and bounding-box types shared by every decoder path.

use serde::{Deserialize, Serialize};

/// A single position, file order preserved, single precision throughout
/// (matches the 4-byte floats of binary payloads and render buffers).
pub type Point3 = [f32; 3];

/// Axis-aligned extent of a point set in source coordinates.
///
/// A freshly created box is in the "empty" state: `min` is +inf and `max` is
/// -inf on every axis. The sentinel never leaks into downstream math: check
/// [`Aabb::is_empty`] (or the owning [`ParseMeta::num_points`]) first, or use
/// the guarded accessors, which return `None` while empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
        }
    }

    /// Build the bounds of a slice in one pass.
    pub fn of_points(points: &[Point3]) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.update(*p);
        }
        bounds
    }

    /// Grow the box to include one point.
    pub fn update(&mut self, p: Point3) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    /// True until the first `update`. While empty, min > max on every axis.
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0]
    }

    /// Midpoint per axis, or `None` while empty.
    pub fn center(&self) -> Option<[f32; 3]> {
        if self.is_empty() {
            return None;
        }
        Some([
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ])
    }

    /// Extent per axis, or `None` while empty.
    pub fn dimensions(&self) -> Option<[f32; 3]> {
        if self.is_empty() {
            return None;
        }
        Some([
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ])
    }

    /// Largest per-axis extent, or `None` while empty.
    pub fn max_dim(&self) -> Option<f32> {
        self.dimensions().map(|d| d[0].max(d[1]).max(d[2]))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// Summary derived from the accepted points after a decode. Always reflects
/// source coordinates, never normalized ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParseMeta {
    pub num_points: usize,
    pub bounds: Aabb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_sentinels() {
        let b = Aabb::empty();
        assert!(b.is_empty());
        assert_eq!(b.min, [f32::INFINITY; 3]);
        assert_eq!(b.max, [f32::NEG_INFINITY; 3]);
        assert_eq!(b.center(), None);
        assert_eq!(b.dimensions(), None);
        assert_eq!(b.max_dim(), None);
    }

    #[test]
    fn update_tracks_min_max_per_axis() {
        let mut b = Aabb::empty();
        b.update([1.0, 5.0, -2.0]);
        b.update([-3.0, 2.0, 7.0]);
        assert!(!b.is_empty());
        assert_eq!(b.min, [-3.0, 2.0, -2.0]);
        assert_eq!(b.max, [1.0, 5.0, 7.0]);
        for axis in 0..3 {
            assert!(b.min[axis] <= b.max[axis]);
        }
    }

    #[test]
    fn single_point_box_is_degenerate_but_valid() {
        let b = Aabb::of_points(&[[2.0, 2.0, 2.0]]);
        assert!(!b.is_empty());
        assert_eq!(b.center(), Some([2.0, 2.0, 2.0]));
        assert_eq!(b.max_dim(), Some(0.0));
    }

    #[test]
    fn of_points_matches_incremental_updates() {
        let pts = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [-1.0, 0.5, 9.0]];
        let whole = Aabb::of_points(&pts);
        let mut incremental = Aabb::empty();
        for p in pts {
            incremental.update(p);
        }
        assert_eq!(whole, incremental);
    }
}
