//! # Terrain Octree
//!
//! A static octree over a terrain mesh's vertices, built once at load time
//! and queried every frame.
//!
//! ## Features
//!
//! - **Point containment**: which occupied cell holds a position (ground contact)
//! - **Ray queries**: every cell a ray crosses (picking), or the first one in
//!   traversal order (altitude probes)
//! - **Sparse build**: empty octants are never allocated, single-point cells
//!   stop early
//! - **Mesh adapter**: any vertex/index source through [`mesh::MeshView`],
//!   plus an OBJ loader
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use terrain_octree::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mesh = ObjLoader::load_obj("terrain.obj")?;
//!     let octree = Octree::create(mesh, 8)?;
//!
//!     let lander = Vec3::new(0.0, 12.0, 0.0);
//!     if let Some(contact) = ground_contact(&octree, lander) {
//!         println!("grounded, normal {:?}", contact.normal);
//!     }
//!     if let Some(height) = altitude(&octree, lander, Vec3::new(0.0, -1.0, 0.0)) {
//!         println!("altitude {height}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod spatial;
pub mod mesh;
pub mod physics;
pub mod debug;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        foundation::math::{Vec3, Vec4},
        config::{Config, ConfigError, TerrainConfig},
        spatial::{Octree, OctreeConfig, OctreeError, OctreeNode, OctreeStats, RayRange, AABB},
        mesh::{MeshView, ObjLoader, TerrainMesh},
        physics::{altitude, ground_contact, pick, GroundContact, PickHit, Ray},
        debug::{leaf_boxes, octree_boxes, DepthPalette},
    };
}
