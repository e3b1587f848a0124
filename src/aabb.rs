//! Axis-Aligned Bounding Boxes
//!
//! For optimizing computations

use crate::interval::Interval;
use crate::{Point, Ray};

/// Minimum extent of a box along any axis
const MIN_EXTENT: f64 = 0.0001;

/// Axis-Aligned Bounding Box
///
/// A data structure to bound many objects to speed up computations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}
impl Aabb {
    /// Contains nothing; identity for `surrounding`
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }.padded()
    }

    /// Box spanning two opposite corners, in any order
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(
            Interval::new(a[0].min(b[0]), a[0].max(b[0])),
            Interval::new(a[1].min(b[1]), a[1].max(b[1])),
            Interval::new(a[2].min(b[2]), a[2].max(b[2])),
        )
    }

    /// Compute the surrounding AABB between this and another
    pub fn surrounding(&self, other: &Aabb) -> Aabb {
        Aabb {
            x: Interval::surrounding(&self.x, &other.x),
            y: Interval::surrounding(&self.y, &other.y),
            z: Interval::surrounding(&self.z, &other.z),
        }
    }

    /// Interval along axis `n` (0 = x, 1 = y, 2 = z)
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Widen any axis thinner than the minimum extent so planar boxes still
    /// have a slab to hit. Empty boxes stay empty.
    pub fn padded(&self) -> Aabb {
        let pad = |i: Interval| {
            if i.min <= i.max && i.size() < MIN_EXTENT {
                i.expand(MIN_EXTENT)
            } else {
                i
            }
        };
        Aabb {
            x: pad(self.x),
            y: pad(self.y),
            z: pad(self.z),
        }
    }

    /// Index of the axis with the largest extent
    pub fn longest_axis(&self) -> usize {
        let (x, y, z) = (self.x.size(), self.y.size(), self.z.size());
        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    /// Midpoint along `axis`
    pub fn centroid(&self, axis: usize) -> f64 {
        let i = self.axis_interval(axis);
        0.5 * (i.min + i.max)
    }

    /// Whether the box is hit by a ray within `ray_t`
    ///
    /// Slab method. A zero direction component gives infinite slab bounds
    /// rather than failing.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for a in 0..3 {
            let slab = self.axis_interval(a);
            let inv_d = 1.0 / r.dir[a];
            let mut t0 = (slab.min - r.orig[a]) * inv_d;
            let mut t1 = (slab.max - r.orig[a]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
