//! Ground contact, altitude and picking on top of the octree queries
//!
//! Each helper runs one octree query and reads the hit leaf's first stored
//! point back through the mesh. The first point stands in for the whole
//! leaf: at the usual 7-9 levels a terrain leaf spans only a few vertices.

use super::Ray;
use crate::foundation::math::Vec3;
use crate::mesh::MeshView;
use crate::spatial::Octree;

/// A body resting on (or inside) an occupied octree cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Mesh index of the leaf's representative vertex
    pub point_index: u32,
    /// Position of that vertex
    pub point: Vec3,
    /// Surface normal at that vertex (`+Y` when the mesh has none)
    pub normal: Vec3,
}

impl GroundContact {
    /// Impulse that cancels the velocity component along the contact normal
    ///
    /// `rate` converts the velocity into a per-step force (usually the frame
    /// rate) and `gain` scales the response; a gain above one pushes back out.
    pub fn stopping_impulse(&self, velocity: Vec3, rate: f32, gain: f32) -> Vec3 {
        let opposing = -rate * velocity;
        self.normal * (opposing.dot(&self.normal) * gain)
    }
}

/// Result of a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Mesh index of the selected vertex
    pub point_index: u32,
    /// Selected vertex position
    pub point: Vec3,
    /// Distance from the eye to the vertex
    pub distance: f32,
}

/// Ground test for a body at `position`
///
/// Returns `None` when the position lies outside every occupied cell, which
/// callers treat as airborne.
pub fn ground_contact<M: MeshView>(octree: &Octree<M>, position: Vec3) -> Option<GroundContact> {
    let leaf = octree.find_containing_leaf(position)?;
    let point_index = leaf.first_point()?;
    let mesh = octree.mesh();
    Some(GroundContact {
        point_index,
        point: mesh.vertex(point_index),
        normal: mesh.normal(point_index).unwrap_or_else(Vec3::y),
    })
}

/// Distance from `position` to the terrain found along `down`
///
/// Casts a half-line from `position` and takes the first intersected leaf
/// in traversal order, so on rough terrain the reading can come from a
/// neighbouring cell rather than the one directly below.
pub fn altitude<M: MeshView>(octree: &Octree<M>, position: Vec3, down: Vec3) -> Option<f32> {
    let ray = Ray::new(position, down);
    let (_, t_max) = octree.ray_range().interval(octree.root().bounds(), &ray);
    let leaf = octree.find_first_intersected_leaf_within(&ray, 0.0, t_max)?;
    let point = octree.vertex(leaf.first_point()?);
    Some((point - position).norm())
}

/// Vertex selected by a pick ray: the candidate closest to `eye`
///
/// Candidates are the first points of every leaf the ray passes through.
pub fn pick<M: MeshView>(octree: &Octree<M>, ray: &Ray, eye: Vec3) -> Option<PickHit> {
    octree
        .collect_intersected_leaves(ray)
        .into_iter()
        .filter_map(|leaf| leaf.first_point())
        .map(|point_index| {
            let point = octree.vertex(point_index);
            PickHit {
                point_index,
                point,
                distance: (point - eye).norm(),
            }
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
