//! Parametric interval used by the octree's ray queries

use super::AABB;
use crate::physics::collision::Ray;
use serde::{Deserialize, Serialize};

/// How the `[t_min, t_max]` interval for a ray/box test is chosen
///
/// Both modes are symmetric around the ray origin, so boxes behind the
/// origin count as hits. Use the `*_within` query forms for a half-line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RayRange {
    /// Fixed interval, independent of the scene
    ///
    /// Only correct while every box of interest lies within the interval,
    /// measured in multiples of the ray direction's length.
    Fixed {
        /// Lower parameter bound
        t_min: f32,
        /// Upper parameter bound
        t_max: f32,
    },
    /// Interval just wide enough to reach every point of the root box
    SceneBounds,
}

impl RayRange {
    /// Half-width of the default fixed interval, in ray-direction units
    pub const DEFAULT_EXTENT: f32 = 1000.0;

    /// Resolve the interval for one ray against a tree with root `bounds`
    pub fn interval(&self, bounds: &AABB, ray: &Ray) -> (f32, f32) {
        match *self {
            Self::Fixed { t_min, t_max } => (t_min, t_max),
            Self::SceneBounds => {
                let speed = ray.direction.norm();
                if speed == 0.0 {
                    return (0.0, 0.0);
                }
                // farthest any box point can be from the origin
                let reach = (ray.origin - bounds.center()).norm() + bounds.extents().norm();
                let t = reach / speed;
                (-t, t)
            }
        }
    }
}

impl Default for RayRange {
    fn default() -> Self {
        Self::Fixed {
            t_min: -Self::DEFAULT_EXTENT,
            t_max: Self::DEFAULT_EXTENT,
        }
    }
}
