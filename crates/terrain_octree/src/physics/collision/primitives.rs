//! Primitive collision shapes
//!
//! Provides the ray used by every ray query and the triangle used to derive
//! surface normals from mesh faces.

use crate::foundation::math::Vec3;

/// A ray for ray casting, picking and altitude probes
///
/// The direction is stored exactly as given. The octree's slab test does not
/// need a unit direction; callers that read distances off the parameter `t`
/// should build the ray with [`Ray::normalized`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Creates a ray with a unit direction
    ///
    /// A zero direction is kept as zero rather than turned into NaNs.
    pub fn normalized(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize(0.0).unwrap_or_else(Vec3::zeros);
        Self { origin, direction }
    }

    /// Ray starting at `origin` aimed at `target` (direction `target - origin`)
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Triangle vertices in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Face normal scaled by twice the triangle area (right-hand rule)
    pub fn area_normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2)
    }

    /// Calculates the unit normal of the triangle, `None` when degenerate
    pub fn normal(&self) -> Option<Vec3> {
        self.area_normal().try_normalize(f32::EPSILON)
    }
}
