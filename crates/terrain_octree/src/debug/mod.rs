//! Debug module for visualization and debugging tools
//!
//! Produces draw requests from the octree without touching it; the renderer
//! that consumes them lives outside this crate.

pub mod octree_debug;

pub use octree_debug::{leaf_boxes, octree_boxes, DebugBox, DepthPalette};
