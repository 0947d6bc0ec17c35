//! The only two places the builder reads vertex coordinates

use super::MeshView;
use crate::spatial::AABB;

/// Bounding box of every vertex in the mesh, `None` for an empty mesh
///
/// Linear in the vertex count. The first vertex seeds both corners and each
/// later vertex can only widen the box.
pub fn bounding_box_of<M: MeshView + ?Sized>(mesh: &M) -> Option<AABB> {
    let count = u32::try_from(mesh.vertex_count()).unwrap_or(u32::MAX);
    AABB::from_points((0..count).map(|i| mesh.vertex(i)))
}

/// The subset of `candidates` whose vertex lies inside `bounds`
///
/// Scans only the candidate list, never the whole mesh, and keeps the
/// candidates' order and duplicates.
pub fn points_inside_box<M: MeshView + ?Sized>(
    mesh: &M,
    candidates: &[u32],
    bounds: &AABB,
) -> Vec<u32> {
    candidates
        .iter()
        .copied()
        .filter(|&i| bounds.contains_point(mesh.vertex(i)))
        .collect()
}
