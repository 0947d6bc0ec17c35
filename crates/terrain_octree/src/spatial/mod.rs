//! Spatial partitioning data structures
//!
//! Provides the static octree index over mesh vertices and the
//! axis-aligned box it is built from.

mod aabb;
mod octree;
mod ray_range;

pub use aabb::AABB;
pub use octree::{Octree, OctreeConfig, OctreeError, OctreeNode, OctreeStats, MAX_LEVELS};
pub use ray_range::RayRange;
