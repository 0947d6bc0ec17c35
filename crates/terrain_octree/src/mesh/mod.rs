//! Mesh adapter
//!
//! The octree never stores coordinates. Nodes hold indices into a mesh's
//! vertex array and resolve them through [`MeshView`] whenever a position is
//! needed. The two scans the builder relies on live in [`adapter`]:
//!
//! - [`bounding_box_of`] - one pass over every vertex, seeding the root box
//! - [`points_inside_box`] - one pass over a node's own candidate indices
//!
//! [`TerrainMesh`] is the owned mesh representation used by the rest of the
//! crate, and [`ObjLoader`] builds one from a Wavefront OBJ file.

pub mod adapter;
pub mod obj_loader;
mod terrain_mesh;

pub use adapter::{bounding_box_of, points_inside_box};
pub use obj_loader::{ObjError, ObjLoader};
pub use terrain_mesh::{MeshError, TerrainMesh};

use crate::foundation::math::Vec3;

/// Read-only vertex/index view over an external mesh representation
pub trait MeshView {
    /// Number of vertices in the vertex array
    fn vertex_count(&self) -> usize;

    /// Position of the vertex at `index`
    ///
    /// Callers only pass indices taken from [`MeshView::indices`] or below
    /// [`MeshView::vertex_count`].
    fn vertex(&self, index: u32) -> Vec3;

    /// Surface normal at the vertex, if the mesh carries normals
    fn normal(&self, index: u32) -> Option<Vec3>;

    /// Index buffer; entries may repeat and need not cover every vertex
    fn indices(&self) -> &[u32];
}
