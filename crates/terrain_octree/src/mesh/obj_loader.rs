//! OBJ file loader for terrain models
//!
//! Face corners resolve to their `v` index, so positions are shared between
//! neighbouring triangles and the index buffer repeats them. That is the
//! layout the octree expects: one point per terrain vertex.

use super::{MeshError, TerrainMesh};
use crate::foundation::math::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors produced while reading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// Underlying read failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A number or index could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// The file parsed but does not describe a usable mesh
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// The assembled mesh failed validation
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),
}

/// Wavefront OBJ reader producing a [`TerrainMesh`]
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a terrain mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TerrainMesh, ObjError> {
        let path = path.as_ref();
        log::debug!("Loading OBJ terrain from {}", path.display());
        let file = File::open(path)?;
        Self::parse_obj(BufReader::new(file))
    }

    /// Parse OBJ text from any buffered reader
    ///
    /// Polygons are fan-triangulated. A file with vertices but no faces is
    /// treated as a point cloud. Normals are used only when every position
    /// picked one up from a face corner; otherwise they are derived from the
    /// faces.
    pub fn parse_obj<R: BufRead>(reader: R) -> Result<TerrainMesh, ObjError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();
        let mut vertex_normals: Vec<Option<Vec3>> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let line_no = line_no + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    positions.push(parse_vec3(&parts, line_no, "vertex")?);
                    vertex_normals.push(None);
                }
                "vn" => {
                    normals.push(parse_vec3(&parts, line_no, "normal")?);
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_no, "face needs at least three corners"));
                    }

                    let mut face = Vec::with_capacity(parts.len() - 1);
                    for corner in &parts[1..] {
                        let mut fields = corner.split('/');
                        let pos = fields.next().unwrap_or_default();
                        let pos = resolve_index(pos, positions.len(), line_no)?;

                        // v/vt/vn - texture coordinates are not needed
                        if let Some(vn) = fields.nth(1).filter(|s| !s.is_empty()) {
                            let n = resolve_index(vn, normals.len(), line_no)?;
                            vertex_normals[pos as usize] = Some(normals[n as usize]);
                        }
                        face.push(pos);
                    }

                    // Triangulate face (simple fan triangulation)
                    for i in 1..(face.len() - 1) {
                        indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                    }
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        if positions.is_empty() {
            return Err(ObjError::InvalidFormat("No vertices found in OBJ file".to_string()));
        }

        if indices.is_empty() {
            log::debug!("OBJ has no faces, indexing {} vertices as a point cloud", positions.len());
            return Ok(TerrainMesh::from_points(positions)?);
        }

        let mesh = match vertex_normals.into_iter().collect::<Option<Vec<Vec3>>>() {
            Some(normals) => TerrainMesh::with_normals(positions, normals, indices)?,
            None => TerrainMesh::new(positions, indices)?,
        };
        log::debug!(
            "Parsed OBJ: {} vertices, {} triangles",
            mesh.positions().len(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::ParseError {
        line,
        message: message.into(),
    }
}

fn parse_vec3(parts: &[&str], line: usize, what: &str) -> Result<Vec3, ObjError> {
    if parts.len() < 4 {
        return Err(parse_error(line, format!("{what} needs three components")));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, text) in xyz.iter_mut().zip(&parts[1..4]) {
        *slot = text
            .parse()
            .map_err(|_| parse_error(line, format!("invalid {what} component '{text}'")))?;
    }
    Ok(Vec3::new(xyz[0], xyz[1], xyz[2]))
}

/// OBJ indices are 1-based; negative values count back from the latest entry
fn resolve_index(text: &str, len: usize, line: usize) -> Result<u32, ObjError> {
    let raw: i64 = text
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{text}'")))?;
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(len + r),
    };
    resolved
        .filter(|&i| (0..len).contains(&i))
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| ObjError::InvalidFormat(format!("index {raw} out of bounds on line {line}")))
}
