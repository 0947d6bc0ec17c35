//! Static octree over a mesh's vertex set
//!
//! The tree is built once from a mesh and never updated. Every node owns the
//! mesh indices of the vertices inside its cell; cells are the geometric
//! octants of the parent, not tight bounds around the points. Empty octants
//! are never materialized, and a cell holding a single point stops
//! subdividing regardless of the remaining level budget.
//!
//! Three queries descend the finished tree:
//!
//! - [`Octree::find_containing_leaf`] - leaf whose cell holds a point
//! - [`Octree::collect_intersected_leaves`] - every leaf a ray passes through
//! - [`Octree::find_first_intersected_leaf`] - first such leaf in octant order
//!
//! The first-hit query returns the first leaf in depth-first octant order,
//! which is not necessarily the one nearest the ray origin. Use
//! [`Octree::nearest_intersected_leaf`] when distance matters.

use super::{RayRange, AABB};
use crate::foundation::math::Vec3;
use crate::mesh::{bounding_box_of, points_inside_box, MeshView, TerrainMesh};
use crate::physics::collision::Ray;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Configuration for octree construction and ray queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum subdivision depth below the root
    pub max_levels: u32,

    /// Parametric interval used by the ray queries
    pub ray_range: RayRange,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_levels: 8,
            ray_range: RayRange::default(),
        }
    }
}

/// Reasons an octree cannot be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OctreeError {
    /// The mesh has no vertices, so there are no bounds to subdivide
    #[error("Cannot build an octree over a mesh with no vertices")]
    EmptyMesh,

    /// The mesh has vertices but an empty index buffer
    #[error("Cannot build an octree over a mesh with no indices")]
    NoIndices,

    /// A level budget of zero was requested
    #[error("Octree needs at least one level")]
    ZeroLevels,

    /// Level budget beyond what f32 cells can still separate
    #[error("Requested {requested} levels, limit is {limit}")]
    TooManyLevels {
        /// Levels asked for
        requested: u32,
        /// Deepest supported tree
        limit: u32,
    },

    /// An index in the index buffer points past the vertex array
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },
}

/// Deepest level budget accepted by the builder
///
/// Past this depth f32 cells stop separating distinct vertices.
pub const MAX_LEVELS: u32 = 24;

/// Summary of a built tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OctreeStats {
    /// Total node count, root included
    pub nodes: usize,
    /// Nodes without children
    pub leaves: usize,
    /// Deepest node depth (root = 0)
    pub depth: u32,
    /// Sum of point-list lengths over all leaves
    pub point_refs: usize,
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    bounds: AABB,
    points: Vec<u32>,
    children: Vec<OctreeNode>,
    depth: u32,
}

impl OctreeNode {
    fn new(bounds: AABB, points: Vec<u32>, depth: u32) -> Self {
        Self {
            bounds,
            points,
            children: Vec::new(),
            depth,
        }
    }

    /// Cell assigned to this node at build time
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Mesh indices of the vertices inside this cell (duplicates kept)
    pub fn points(&self) -> &[u32] {
        &self.points
    }

    /// Occupied child cells, in octant order
    pub fn children(&self) -> &[OctreeNode] {
        &self.children
    }

    /// Depth in the tree (0 = root)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First stored point index; the representative vertex of a leaf
    pub fn first_point(&self) -> Option<u32> {
        self.points.first().copied()
    }

    /// Split this cell into octants and keep the occupied ones
    fn subdivide<M: MeshView + ?Sized>(&mut self, mesh: &M, levels_left: u32) {
        if levels_left == 0 || self.points.len() < 2 {
            return;
        }

        for cell in self.bounds.octants() {
            let points = points_inside_box(mesh, &self.points, &cell);
            if points.is_empty() {
                continue;
            }

            let mut child = OctreeNode::new(cell, points, self.depth + 1);
            child.subdivide(mesh, levels_left - 1);
            self.children.push(child);
        }
    }

    fn find_containing_leaf(&self, point: Vec3) -> Option<&OctreeNode> {
        if !self.bounds.contains_point(point) {
            return None;
        }
        if self.is_leaf() {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_containing_leaf(point))
    }

    fn collect_intersected<'a>(
        &'a self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        out: &mut Vec<&'a OctreeNode>,
    ) {
        if !self.bounds.intersects_ray(ray, t_min, t_max) {
            return;
        }
        if self.is_leaf() {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_intersected(ray, t_min, t_max, out);
        }
    }

    fn first_intersected(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<&OctreeNode> {
        if !self.bounds.intersects_ray(ray, t_min, t_max) {
            return None;
        }
        if self.is_leaf() {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.first_intersected(ray, t_min, t_max))
    }

    fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a OctreeNode)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }
}

/// Octree spatial partitioning structure over a mesh
///
/// Owns the mesh it was built from, since nodes store indices and every
/// query resolves coordinates through it. Queries take `&self`; rebuilding
/// takes `&mut self`, so a rebuild can never overlap a query.
#[derive(Debug, Clone)]
pub struct Octree<M = TerrainMesh> {
    root: OctreeNode,
    mesh: M,
    max_levels: u32,
    ray_range: RayRange,
}

impl<M: MeshView> Octree<M> {
    /// Build a tree over `mesh` with at most `max_levels` levels below the root
    pub fn create(mesh: M, max_levels: u32) -> Result<Self, OctreeError> {
        let root = build(&mesh, max_levels)?;
        Ok(Self {
            root,
            mesh,
            max_levels,
            ray_range: RayRange::default(),
        })
    }

    /// Build a tree using level budget and ray range from `config`
    pub fn with_config(mesh: M, config: &OctreeConfig) -> Result<Self, OctreeError> {
        let mut octree = Self::create(mesh, config.max_levels)?;
        octree.ray_range = config.ray_range;
        Ok(octree)
    }

    /// Discard the current tree and build a new one over `mesh`
    ///
    /// On error the previous tree and mesh are left in place.
    pub fn rebuild(&mut self, mesh: M, max_levels: u32) -> Result<(), OctreeError> {
        let root = build(&mesh, max_levels)?;
        log::debug!("Rebuilt octree, replacing {} nodes", self.stats().nodes);
        self.root = root;
        self.mesh = mesh;
        self.max_levels = max_levels;
        Ok(())
    }

    /// Root node; its cell is the mesh's bounding box
    pub fn root(&self) -> &OctreeNode {
        &self.root
    }

    /// Mesh the tree was built from
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Level budget used for the current tree
    pub fn max_levels(&self) -> u32 {
        self.max_levels
    }

    /// Interval policy used by the ray queries
    pub fn ray_range(&self) -> RayRange {
        self.ray_range
    }

    /// Replace the interval policy used by the ray queries
    pub fn set_ray_range(&mut self, ray_range: RayRange) {
        self.ray_range = ray_range;
    }

    /// Position of a stored point index
    pub fn vertex(&self, index: u32) -> Vec3 {
        self.mesh.vertex(index)
    }

    /// Leaf whose cell contains `point`, or `None` outside every occupied cell
    ///
    /// Descends into children in octant order. A point on a face shared by
    /// two cells resolves to whichever cell comes first in that order.
    pub fn find_containing_leaf(&self, point: Vec3) -> Option<&OctreeNode> {
        let leaf = self.root.find_containing_leaf(point);
        log::trace!("Point query at {:?}: {}", point, if leaf.is_some() { "hit" } else { "miss" });
        leaf
    }

    /// Every leaf whose cell the ray passes through, in traversal order
    pub fn collect_intersected_leaves(&self, ray: &Ray) -> Vec<&OctreeNode> {
        let (t_min, t_max) = self.ray_range.interval(&self.root.bounds, ray);
        self.collect_intersected_leaves_within(ray, t_min, t_max)
    }

    /// [`Octree::collect_intersected_leaves`] with an explicit `[t_min, t_max]`
    pub fn collect_intersected_leaves_within(
        &self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
    ) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.root.collect_intersected(ray, t_min, t_max, &mut leaves);
        log::trace!("Ray query collected {} leaves", leaves.len());
        leaves
    }

    /// First leaf in depth-first octant order whose cell the ray passes through
    ///
    /// This is not the leaf nearest the ray origin.
    pub fn find_first_intersected_leaf(&self, ray: &Ray) -> Option<&OctreeNode> {
        let (t_min, t_max) = self.ray_range.interval(&self.root.bounds, ray);
        self.find_first_intersected_leaf_within(ray, t_min, t_max)
    }

    /// [`Octree::find_first_intersected_leaf`] with an explicit `[t_min, t_max]`
    pub fn find_first_intersected_leaf_within(
        &self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
    ) -> Option<&OctreeNode> {
        self.root.first_intersected(ray, t_min, t_max)
    }

    /// Intersected leaf whose cell the ray enters first, with the entry parameter
    ///
    /// Only the part of the ray at or ahead of its origin counts (`t >= 0`,
    /// capped by the configured upper bound). A ray starting inside a cell
    /// enters it at `t = 0`. Ties keep traversal order.
    pub fn nearest_intersected_leaf(&self, ray: &Ray) -> Option<(&OctreeNode, f32)> {
        let (t_min, t_max) = self.ray_range.interval(&self.root.bounds, ray);
        let t_min = t_min.max(0.0);

        self.collect_intersected_leaves_within(ray, t_min, t_max)
            .into_iter()
            .filter_map(|leaf| {
                leaf.bounds
                    .ray_span(ray, t_min, t_max)
                    .map(|(enter, _)| (leaf, enter))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Visit every node in depth-first octant order
    pub fn walk<'a>(&'a self, mut visitor: impl FnMut(&'a OctreeNode)) {
        self.root.visit(&mut visitor);
    }

    /// All leaves in traversal order
    pub fn leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.walk(|node| {
            if node.is_leaf() {
                leaves.push(node);
            }
        });
        leaves
    }

    /// Every node shallower than `levels` (depth `0..levels`), in traversal order
    pub fn nodes_to_depth(&self, levels: u32) -> Vec<&OctreeNode> {
        let mut nodes = Vec::new();
        self.walk(|node| {
            if node.depth < levels {
                nodes.push(node);
            }
        });
        nodes
    }

    /// Node, leaf and depth counts
    pub fn stats(&self) -> OctreeStats {
        collect_stats(&self.root)
    }
}

fn collect_stats(root: &OctreeNode) -> OctreeStats {
    let mut stats = OctreeStats::default();
    root.visit(&mut |node| {
        stats.nodes += 1;
        stats.depth = stats.depth.max(node.depth);
        if node.is_leaf() {
            stats.leaves += 1;
            stats.point_refs += node.points.len();
        }
    });
    stats
}

fn build<M: MeshView + ?Sized>(mesh: &M, max_levels: u32) -> Result<OctreeNode, OctreeError> {
    if max_levels == 0 {
        return Err(OctreeError::ZeroLevels);
    }
    if max_levels > MAX_LEVELS {
        return Err(OctreeError::TooManyLevels {
            requested: max_levels,
            limit: MAX_LEVELS,
        });
    }

    let vertex_count = mesh.vertex_count();
    let bounds = bounding_box_of(mesh).ok_or(OctreeError::EmptyMesh)?;

    let indices = mesh.indices();
    if indices.is_empty() {
        return Err(OctreeError::NoIndices);
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(OctreeError::IndexOutOfRange { index, vertex_count });
    }

    let started = Instant::now();
    let mut root = OctreeNode::new(bounds, indices.to_vec(), 0);
    root.subdivide(mesh, max_levels);

    let stats = collect_stats(&root);
    log::info!(
        "Built octree over {} points: {} nodes, {} leaves, depth {}/{} in {:.2} ms",
        indices.len(),
        stats.nodes,
        stats.leaves,
        stats.depth,
        max_levels,
        started.elapsed().as_secs_f64() * 1000.0
    );

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    fn unit_cube_corners() -> TerrainMesh {
        let mut corners = Vec::new();
        for &y in &[0.0, 1.0] {
            for &z in &[0.0, 1.0] {
                for &x in &[0.0, 1.0] {
                    corners.push(Vec3::new(x, y, z));
                }
            }
        }
        TerrainMesh::from_points(corners).unwrap()
    }

    /// Points at integer coordinates `0..n` on every axis, index `x + n*y + n*n*z`
    fn lattice(n: u32) -> TerrainMesh {
        let mut points = Vec::new();
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    points.push(Vec3::new(x as f32, y as f32, z as f32));
                }
            }
        }
        TerrainMesh::from_points(points).unwrap()
    }

    /// Heightfield terrain with triangles, so indices repeat
    fn terrain(n: u32) -> TerrainMesh {
        let mut positions = Vec::new();
        for z in 0..n {
            for x in 0..n {
                let (fx, fz) = (x as f32, z as f32);
                positions.push(Vec3::new(fx, (fx * 0.7).sin() * 2.0 + (fz * 0.3).cos(), fz));
            }
        }
        let mut indices = Vec::new();
        for z in 0..n - 1 {
            for x in 0..n - 1 {
                let i = z * n + x;
                indices.extend_from_slice(&[i, i + n, i + n + 1, i, i + n + 1, i + 1]);
            }
        }
        TerrainMesh::new(positions, indices).unwrap()
    }

    fn all_nodes<M: MeshView>(octree: &Octree<M>) -> Vec<&OctreeNode> {
        let mut nodes = Vec::new();
        octree.walk(|n| nodes.push(n));
        nodes
    }

    #[test]
    fn test_unit_cube_one_level() {
        let octree = Octree::create(unit_cube_corners(), 1).unwrap();
        let root = octree.root();

        assert_eq!(root.bounds().min(), Vec3::zeros());
        assert_eq!(root.bounds().max(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(root.points().len(), 8);

        let leaves = octree.leaves();
        assert_eq!(leaves.len(), 8);
        let mut seen = BTreeSet::new();
        for leaf in &leaves {
            assert_eq!(leaf.points().len(), 1);
            assert_eq!(leaf.depth(), 1);
            seen.insert(leaf.points()[0]);
        }
        assert_eq!(seen, (0..8).collect());
    }

    #[test]
    fn test_unit_cube_vertical_ray() {
        let octree = Octree::create(unit_cube_corners(), 1).unwrap();
        let ray = Ray::towards(Vec3::new(0.5, 10.0, 0.5), Vec3::new(0.5, -10.0, 0.5));

        let first = octree.find_first_intersected_leaf(&ray).unwrap();
        assert!(first.is_leaf());
        // origin cell comes first in octant order
        assert_eq!(first.points(), &[0]);

        let all = octree.collect_intersected_leaves(&ray);
        // the line x = z = 0.5 lies on the faces shared by every cell
        assert_eq!(all.len(), 8);
        assert!(all.iter().any(|l| l.bounds().min().y == 0.0));
        assert!(all.iter().any(|l| l.bounds().max().y == 1.0));
    }

    #[test]
    fn test_every_vertex_found_in_its_leaf() {
        let octree = Octree::create(terrain(12), 6).unwrap();
        for &index in octree.mesh().indices() {
            let p = octree.vertex(index);
            let leaf = octree
                .find_containing_leaf(p)
                .unwrap_or_else(|| panic!("vertex {index} at {p:?} not found"));
            assert!(leaf.is_leaf());
            assert!(leaf.points().contains(&index));
        }
    }

    #[test]
    fn test_points_outside_root_miss() {
        let octree = Octree::create(terrain(8), 5).unwrap();
        let bounds = *octree.root().bounds();
        let outside = [
            bounds.max() + Vec3::new(0.01, 0.0, 0.0),
            bounds.min() - Vec3::new(0.0, 0.01, 0.0),
            Vec3::new(1.0e6, 0.0, 0.0),
            bounds.center() + Vec3::new(0.0, 0.0, bounds.size().z),
        ];
        for p in outside {
            assert!(octree.find_containing_leaf(p).is_none(), "{p:?} should miss");
        }
    }

    #[test]
    fn test_point_in_empty_cell_misses() {
        // two far corners leave the middle of the box unoccupied
        let mesh = TerrainMesh::from_points(vec![Vec3::zeros(), Vec3::new(4.0, 4.0, 4.0)]).unwrap();
        let octree = Octree::create(mesh, 3).unwrap();
        assert!(octree.find_containing_leaf(Vec3::new(1.0, 3.0, 1.0)).is_none());
        assert!(octree.find_containing_leaf(Vec3::new(0.5, 0.5, 0.5)).is_some());
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Octree::create(terrain(10), 7).unwrap();
        let b = Octree::create(terrain(10), 7).unwrap();
        assert_eq!(a.root(), b.root());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_no_empty_nodes() {
        let octree = Octree::create(terrain(16), 8).unwrap();
        for node in all_nodes(&octree) {
            assert!(!node.points().is_empty());
        }
    }

    #[test]
    fn test_children_points_are_subsets() {
        let octree = Octree::create(terrain(10), 6).unwrap();
        for node in all_nodes(&octree) {
            let parent: BTreeSet<u32> = node.points().iter().copied().collect();
            for child in node.children() {
                assert!(child.points().iter().all(|p| parent.contains(p)));
                assert_eq!(child.depth(), node.depth() + 1);
                assert!(child.children().len() <= 8);
            }
        }
    }

    #[test]
    fn test_depth_bound_with_coincident_points() {
        let mesh = TerrainMesh::from_points(vec![
            Vec3::zeros(),
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
        ])
        .unwrap();
        let octree = Octree::create(mesh, 6).unwrap();
        let stats = octree.stats();
        assert_eq!(stats.depth, 6);
        for node in all_nodes(&octree) {
            assert!(node.depth() <= 6);
        }
        let deepest = octree.find_containing_leaf(Vec3::zeros()).unwrap();
        assert_eq!(deepest.depth(), 6);
        assert_eq!(deepest.points(), &[0, 1]);
    }

    #[test]
    fn test_single_point_nodes_are_leaves() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        for node in all_nodes(&octree) {
            if node.points().len() == 1 {
                assert!(node.is_leaf());
            }
        }
        // 4x4x4 lattice separates after two splits
        let stats = octree.stats();
        assert_eq!(stats.depth, 2);
        assert_eq!(stats.leaves, 64);
        assert_eq!(stats.point_refs, 64);
    }

    #[test]
    fn test_single_point_mesh_is_a_leaf_root() {
        let mesh = TerrainMesh::from_points(vec![Vec3::new(3.0, 2.0, 1.0)]).unwrap();
        let octree = Octree::create(mesh, 8).unwrap();
        assert!(octree.root().is_leaf());
        assert_eq!(octree.find_containing_leaf(Vec3::new(3.0, 2.0, 1.0)).unwrap().depth(), 0);
    }

    #[test]
    fn test_collect_exact_row_of_leaves() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        // leaf cells are 0.75 wide; this line stays inside the y = z = 0 row
        let ray = Ray::new(Vec3::new(-5.0, 0.3, 0.3), Vec3::x());
        let leaves = octree.collect_intersected_leaves(&ray);
        assert_eq!(leaves.len(), 4);

        let found: BTreeSet<u32> = leaves.iter().map(|l| l.first_point().unwrap()).collect();
        assert_eq!(found, BTreeSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_collect_vertical_column() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        // vertical line through the x = 2, z = 1 column
        let ray = Ray::new(Vec3::new(1.9, 50.0, 1.1), Vec3::new(0.0, -1.0, 0.0));
        let found: BTreeSet<u32> = octree
            .collect_intersected_leaves(&ray)
            .iter()
            .map(|l| l.first_point().unwrap())
            .collect();
        let expected: BTreeSet<u32> = (0..4).map(|y| 2 + 4 * y + 16).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_ray_missing_everything() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        let ray = Ray::new(Vec3::new(-5.0, 10.0, 0.3), Vec3::x());
        assert!(octree.collect_intersected_leaves(&ray).is_empty());
        assert!(octree.find_first_intersected_leaf(&ray).is_none());
        assert!(octree.nearest_intersected_leaf(&ray).is_none());
    }

    #[test]
    fn test_first_hit_follows_octant_order_not_distance() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        let ray = Ray::new(Vec3::new(10.0, 0.3, 0.3), Vec3::new(-1.0, 0.0, 0.0));

        let first = octree.find_first_intersected_leaf(&ray).unwrap();
        assert_eq!(first.first_point(), Some(0));

        let (nearest, enter) = octree.nearest_intersected_leaf(&ray).unwrap();
        assert_eq!(nearest.first_point(), Some(3));
        assert_relative_eq!(enter, 7.0);
    }

    #[test]
    fn test_nearest_ignores_cells_behind_origin() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        // starts between the x = 1 and x = 2 cells, looking toward +x
        let ray = Ray::new(Vec3::new(1.6, 0.3, 0.3), Vec3::x());
        let (nearest, enter) = octree.nearest_intersected_leaf(&ray).unwrap();
        assert_eq!(nearest.first_point(), Some(2));
        assert_relative_eq!(enter, 0.0);
        // the full-line query still sees the cells behind
        assert_eq!(octree.collect_intersected_leaves(&ray).len(), 4);
    }

    #[test]
    fn test_non_finite_ray_hits_nothing() {
        let mut octree = Octree::create(lattice(4), 8).unwrap();
        let nan = Vec3::new(f32::NAN, f32::NAN, f32::NAN);
        let nan_dir = Ray::new(Vec3::new(100.0, 100.0, 100.0), nan);
        let nan_origin = Ray::new(Vec3::new(f32::NAN, 50.0, 1.1), Vec3::new(0.0, -1.0, 0.0));

        for range in [RayRange::default(), RayRange::SceneBounds] {
            octree.set_ray_range(range);
            for ray in [&nan_dir, &nan_origin] {
                assert!(octree.collect_intersected_leaves(ray).is_empty());
                assert!(octree.find_first_intersected_leaf(ray).is_none());
                assert!(octree.nearest_intersected_leaf(ray).is_none());
            }
        }
    }

    #[test]
    fn test_explicit_interval() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        let ray = Ray::new(Vec3::new(-5.0, 0.3, 0.3), Vec3::x());
        // reaches only the first two cells (x up to 1.5)
        let leaves = octree.collect_intersected_leaves_within(&ray, 0.0, 6.4);
        assert_eq!(leaves.len(), 2);
        assert!(octree.find_first_intersected_leaf_within(&ray, 0.0, 4.0).is_none());
    }

    #[test]
    fn test_scene_bounds_range_reaches_distant_origin() {
        let mut octree = Octree::create(lattice(4), 8).unwrap();
        let ray = Ray::new(Vec3::new(5000.0, 0.3, 0.3), Vec3::new(-1.0, 0.0, 0.0));
        assert!(octree.collect_intersected_leaves(&ray).is_empty());

        octree.set_ray_range(RayRange::SceneBounds);
        assert_eq!(octree.collect_intersected_leaves(&ray).len(), 4);
        assert!(octree.find_first_intersected_leaf(&ray).is_some());
    }

    #[test]
    fn test_with_config() {
        let config = OctreeConfig {
            max_levels: 1,
            ray_range: RayRange::SceneBounds,
        };
        let octree = Octree::with_config(lattice(4), &config).unwrap();
        assert_eq!(octree.max_levels(), 1);
        assert_eq!(octree.ray_range(), RayRange::SceneBounds);
        assert_eq!(octree.stats().depth, 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        let empty = TerrainMesh::from_points(Vec::new()).unwrap();
        assert_eq!(Octree::create(empty, 4).unwrap_err(), OctreeError::EmptyMesh);
        assert_eq!(Octree::create(lattice(2), 0).unwrap_err(), OctreeError::ZeroLevels);
        assert_eq!(
            Octree::create(lattice(2), 99).unwrap_err(),
            OctreeError::TooManyLevels { requested: 99, limit: 24 }
        );
        let no_faces = TerrainMesh::new(vec![Vec3::zeros(), Vec3::x()], Vec::new()).unwrap();
        assert_eq!(Octree::create(no_faces, 4).unwrap_err(), OctreeError::NoIndices);
    }

    /// Bare mesh view without validation of its own
    #[derive(Debug)]
    struct RawMesh {
        positions: Vec<Vec3>,
        indices: Vec<u32>,
    }

    impl MeshView for RawMesh {
        fn vertex_count(&self) -> usize {
            self.positions.len()
        }
        fn vertex(&self, index: u32) -> Vec3 {
            self.positions[index as usize]
        }
        fn normal(&self, _index: u32) -> Option<Vec3> {
            None
        }
        fn indices(&self) -> &[u32] {
            &self.indices
        }
    }

    #[test]
    fn test_generic_mesh_view() {
        let raw = RawMesh {
            positions: vec![Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)],
            indices: vec![0, 1, 2, 0],
        };
        let octree = Octree::create(raw, 3).unwrap();
        assert_eq!(octree.root().points(), &[0, 1, 2, 0]);
        let leaf = octree.find_containing_leaf(Vec3::zeros()).unwrap();
        assert_eq!(leaf.points(), &[0, 0]);

        let bad = RawMesh {
            positions: vec![Vec3::zeros()],
            indices: vec![0, 5],
        };
        assert_eq!(
            Octree::create(bad, 3).unwrap_err(),
            OctreeError::IndexOutOfRange { index: 5, vertex_count: 1 }
        );
    }

    #[test]
    fn test_rebuild_replaces_tree() {
        let mut octree = Octree::create(lattice(2), 3).unwrap();
        let before = octree.root().clone();

        octree.rebuild(lattice(4), 8).unwrap();
        assert_eq!(octree.stats().leaves, 64);
        assert_eq!(octree.max_levels(), 8);

        let err = octree.rebuild(lattice(2), 0).unwrap_err();
        assert_eq!(err, OctreeError::ZeroLevels);
        assert_eq!(octree.stats().leaves, 64);
        assert_ne!(octree.root(), &before);
    }

    #[test]
    fn test_nodes_to_depth() {
        let octree = Octree::create(lattice(4), 8).unwrap();
        assert_eq!(octree.nodes_to_depth(0).len(), 0);
        assert_eq!(octree.nodes_to_depth(1).len(), 1);
        assert_eq!(octree.nodes_to_depth(2).len(), 9);
        assert_eq!(octree.nodes_to_depth(3).len(), 73);
        assert_eq!(octree.stats().nodes, 73);
    }

    #[test]
    fn test_concurrent_queries() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Octree>();

        let octree = Octree::create(terrain(16), 7).unwrap();
        std::thread::scope(|s| {
            for t in 0..4u32 {
                let octree = &octree;
                s.spawn(move || {
                    for &index in octree.mesh().indices().iter().skip(t as usize).step_by(4) {
                        let p = octree.vertex(index);
                        assert!(octree.find_containing_leaf(p).is_some());
                        let above = p + Vec3::new(0.0, 5.0, 0.0);
                        let down = Ray::new(above, Vec3::new(0.0, -1.0, 0.0));
                        assert!(!octree.collect_intersected_leaves(&down).is_empty());
                    }
                });
            }
        });
    }
}
