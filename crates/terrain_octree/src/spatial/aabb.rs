//! Axis-aligned bounding box used as the cell shape of the octree
//!
//! Boxes are immutable once built. The constructor normalises its corners so
//! `min[i] <= max[i]` holds on every axis regardless of argument order.

use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::Ray;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    min: Vec3,
    max: Vec3,
}

impl AABB {
    /// Create a new AABB from two opposite corners, in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Smallest box holding every point, or `None` when there are no points
    ///
    /// The first point seeds both corners; later points only widen the box.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
        Some(Self { min, max })
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if this AABB contains a point (closed on every face)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Split the box at its center into eight equal cells
    ///
    /// Order: the four ground-floor cells walking around the vertical axis
    /// (origin cell, +X, +X+Z, +Z), then the same four raised by half the
    /// height. Faces come straight from `min`, `center` and `max`, so
    /// neighbouring cells share bit-identical planes and the union covers the
    /// parent exactly.
    pub fn octants(&self) -> [AABB; 8] {
        let c = self.center();
        let (lo, hi) = (self.min, self.max);

        // (x half, z half) for the ground floor, walking around +Y
        let floor = [(false, false), (true, false), (true, true), (false, true)];

        let cell = |upper_x: bool, upper_y: bool, upper_z: bool| {
            let (x0, x1) = if upper_x { (c.x, hi.x) } else { (lo.x, c.x) };
            let (y0, y1) = if upper_y { (c.y, hi.y) } else { (lo.y, c.y) };
            let (z0, z1) = if upper_z { (c.z, hi.z) } else { (lo.z, c.z) };
            AABB {
                min: Vec3::new(x0, y0, z0),
                max: Vec3::new(x1, y1, z1),
            }
        };

        let mut cells = [*self; 8];
        for (i, &(x, z)) in floor.iter().enumerate() {
            cells[i] = cell(x, false, z);
            cells[i + 4] = cell(x, true, z);
        }
        cells
    }

    /// Slab test restricted to the parametric range `[t_min, t_max]`
    ///
    /// Returns the surviving `(t_enter, t_exit)` interval, or `None` as soon
    /// as one axis empties it. An axis with a zero direction component is
    /// parallel to its slab pair: the ray misses unless the origin lies
    /// inside that slab, and the interval is left untouched otherwise.
    /// A ray or range with a NaN or infinite component hits nothing.
    pub fn ray_span(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        if !utils::is_finite(&ray.origin) || !utils::is_finite(&ray.direction) {
            return None;
        }
        if t_min.is_nan() || t_max.is_nan() {
            return None;
        }

        let mut t_min = t_min;
        let mut t_max = t_max;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir == 0.0 {
                if !(lo..=hi).contains(&origin) {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut near = (lo - origin) * inv;
            let mut far = (hi - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }

            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// True if the ray passes through the box somewhere in `[t_min, t_max]`
    pub fn intersects_ray(&self, ray: &Ray, t_min: f32, t_max: f32) -> bool {
        self.ray_span(ray, t_min, t_max).is_some()
    }
}
