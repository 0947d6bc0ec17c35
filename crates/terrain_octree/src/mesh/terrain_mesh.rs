//! Owned terrain mesh with per-vertex normals

use super::MeshView;
use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::Triangle;
use thiserror::Error;

/// Errors raised while assembling a [`TerrainMesh`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// An index points past the end of the vertex array
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// Supplied normals do not line up with the vertices
    #[error("Normal count {normals} does not match vertex count {vertices}")]
    NormalCountMismatch {
        /// Number of normals given
        normals: usize,
        /// Number of vertices given
        vertices: usize,
    },

    /// A vertex has a NaN or infinite coordinate
    #[error("Vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Position of the vertex in the vertex array
        index: usize,
    },
}

/// Triangle mesh in world space: positions, normals and a triangle list
///
/// Normals are always present. [`TerrainMesh::new`] derives smooth normals
/// from the faces; [`TerrainMesh::with_normals`] takes them as given.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl TerrainMesh {
    /// Build a mesh from positions and a triangle index list
    ///
    /// Each vertex normal is the area-weighted average of the faces touching
    /// it. Vertices with no usable face get `+Y`.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        validate(&positions, &indices)?;
        let normals = smooth_normals(&positions, &indices);
        Ok(Self { positions, normals, indices })
    }

    /// Build a mesh with explicit per-vertex normals
    pub fn with_normals(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        if normals.len() != positions.len() {
            return Err(MeshError::NormalCountMismatch {
                normals: normals.len(),
                vertices: positions.len(),
            });
        }
        validate(&positions, &indices)?;
        Ok(Self { positions, normals, indices })
    }

    /// Point cloud: every vertex indexed once, in order, normals `+Y`
    pub fn from_points(positions: Vec<Vec3>) -> Result<Self, MeshError> {
        let count = u32::try_from(positions.len()).map_err(|_| MeshError::IndexOutOfRange {
            index: u32::MAX,
            vertex_count: positions.len(),
        })?;
        let indices = (0..count).collect();
        let normals = vec![Vec3::y(); positions.len()];
        Self::with_normals(positions, normals, indices)
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex normals, parallel to [`TerrainMesh::positions`]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Number of complete triangles in the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl MeshView for TerrainMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn vertex(&self, index: u32) -> Vec3 {
        self.positions[index as usize]
    }

    fn normal(&self, index: u32) -> Option<Vec3> {
        self.normals.get(index as usize).copied()
    }

    fn indices(&self) -> &[u32] {
        &self.indices
    }
}

fn validate(positions: &[Vec3], indices: &[u32]) -> Result<(), MeshError> {
    if let Some(index) = positions.iter().position(|p| !utils::is_finite(p)) {
        return Err(MeshError::NonFiniteVertex { index });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(MeshError::IndexOutOfRange {
            index,
            vertex_count: positions.len(),
        });
    }
    Ok(())
}

fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::zeros(); positions.len()];
    for tri in indices.chunks_exact(3) {
        let face = Triangle::new(
            positions[tri[0] as usize],
            positions[tri[1] as usize],
            positions[tri[2] as usize],
        )
        .area_normal();
        for &i in tri {
            accum[i as usize] += face;
        }
    }
    accum
        .into_iter()
        .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y))
        .collect()
}
