//! Collision queries against a terrain octree
//!
//! # Module Organization
//!
//! - [`primitives`] - Ray and triangle primitives
//! - [`ground`] - Ground contact, altitude probe and picking built on the
//!   octree's point and ray queries
//!
//! # Key Types
//!
//! - [`Ray`] - Origin and (not necessarily unit) direction
//! - [`GroundContact`] - Leaf vertex and surface normal under a body
//! - [`PickHit`] - Vertex selected by a pick ray

pub mod primitives;
pub mod ground;

// Re-export commonly used types
pub use primitives::{Ray, Triangle};
pub use ground::{altitude, ground_contact, pick, GroundContact, PickHit};
