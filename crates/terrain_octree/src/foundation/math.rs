//! Math utilities and types
//!
//! Provides the vector types shared by the index, the mesh adapter and the
//! query layer.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colors in the debug module)
pub type Vec4 = Vector4<f32>;

/// Utility functions for common math operations
pub mod utils {
    /// True if every component of `v` is finite
    pub fn is_finite(v: &super::Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_finite() {
        assert!(utils::is_finite(&Vec3::new(0.0, -1.0, 5.0)));
        assert!(!utils::is_finite(&Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(!utils::is_finite(&Vec3::new(0.0, f32::INFINITY, 0.0)));
    }
}
