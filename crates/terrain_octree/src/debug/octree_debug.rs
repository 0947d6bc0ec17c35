//! Octree debug visualization
//!
//! Turns the tree into a flat list of colored boxes for a renderer to draw
//! as wireframes. Reads the tree only; colors per depth come from a
//! [`DepthPalette`] supplied by the caller.

use crate::foundation::math::{Vec3, Vec4};
use crate::mesh::MeshView;
use crate::spatial::{Octree, OctreeNode};
use serde::{Deserialize, Serialize};

/// Depth-to-color mapping for tree visualization
///
/// Depth `d` uses entry `d`; anything deeper than the table reuses the last
/// entry. A palette deserialized from an empty list draws everything white.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthPalette {
    colors: Vec<Vec4>,
}

impl DepthPalette {
    /// Palette from an explicit color list, `None` if the list is empty
    pub fn new(colors: Vec<Vec4>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    /// Color for nodes at `depth`
    pub fn color(&self, depth: u32) -> Vec4 {
        let index = (depth as usize).min(self.colors.len().saturating_sub(1));
        self.colors
            .get(index)
            .copied()
            .unwrap_or_else(|| Vec4::new(1.0, 1.0, 1.0, 1.0))
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True only for a palette deserialized from an empty list
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for DepthPalette {
    fn default() -> Self {
        let rgb = |r: f32, g: f32, b: f32| Vec4::new(r / 255.0, g / 255.0, b / 255.0, 1.0);
        Self {
            colors: vec![
                rgb(173.0, 216.0, 230.0), // light blue
                rgb(255.0, 0.0, 0.0),     // red
                rgb(0.0, 255.0, 0.0),     // green
                rgb(165.0, 42.0, 42.0),   // brown
                rgb(255.0, 255.0, 0.0),   // yellow
                rgb(0.0, 0.0, 255.0),     // blue
                rgb(255.0, 192.0, 203.0), // pink
                rgb(255.0, 165.0, 0.0),   // orange
                rgb(255.0, 255.0, 255.0), // white
                rgb(255.0, 255.0, 224.0), // light yellow, every deeper level
            ],
        }
    }
}

/// Wireframe box request for one octree node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugBox {
    /// Box center in world space
    pub center: Vec3,
    /// Half-size on each axis
    pub extents: Vec3,
    /// RGBA color
    pub color: Vec4,
    /// Depth of the node the box came from
    pub depth: u32,
}

impl DebugBox {
    fn from_node(node: &OctreeNode, color: Vec4) -> Self {
        Self {
            center: node.bounds().center(),
            extents: node.bounds().extents(),
            color,
            depth: node.depth(),
        }
    }
}

/// Boxes for every node shallower than `levels`, colored by depth
pub fn octree_boxes<M: MeshView>(
    octree: &Octree<M>,
    levels: u32,
    palette: &DepthPalette,
) -> Vec<DebugBox> {
    octree
        .nodes_to_depth(levels)
        .into_iter()
        .map(|node| DebugBox::from_node(node, palette.color(node.depth())))
        .collect()
}

/// Boxes for the leaves only, in a single color
pub fn leaf_boxes<M: MeshView>(octree: &Octree<M>, color: Vec4) -> Vec<DebugBox> {
    octree
        .leaves()
        .into_iter()
        .map(|node| DebugBox::from_node(node, color))
        .collect()
}
