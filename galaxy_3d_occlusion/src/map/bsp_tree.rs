/// BspTree: flat-array BSP tree implementing SpatialIndex.
///
/// Nodes and leaves live in two flat arrays and reference each other by
/// index through `BspChild`, a tagged variant: there is no node/leaf
/// class hierarchy. The tree is immutable once built.
///
/// Queries arrive in world space and are converted to map space with
/// the tree's `MapSpace` before descending.

use glam::Vec3;
use super::aabb::AABB;
use super::map_geometry::{ClusterId, LeafId, NO_CLUSTER};
use super::map_space::MapSpace;
use super::spatial_index::SpatialIndex;
use crate::error::Result;
use crate::engine_bail;

/// Reference from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BspChild {
    /// Index into the node array
    Node(usize),
    /// Index into the leaf array
    Leaf(LeafId),
}

/// Splitting plane: points with `normal·p - dist >= 0` are in front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspPlane {
    pub normal: Vec3,
    pub dist: f32,
}

impl BspPlane {
    /// Axis-aligned plane (`axis` 0 = X, 1 = Y, 2 = Z).
    pub fn axis_aligned(axis: usize, dist: f32) -> Self {
        let mut normal = Vec3::ZERO;
        normal[axis] = 1.0;
        Self { normal, dist }
    }

    fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.dist
    }
}

/// Interior node of the tree.
#[derive(Debug, Clone)]
pub struct BspNode {
    pub plane: BspPlane,
    /// Child on the positive side of the plane
    pub front: BspChild,
    /// Child on the negative side of the plane
    pub back: BspChild,
    /// Map-space bounds of everything below this node
    pub bounds: AABB,
}

/// Leaf of the tree.
#[derive(Debug, Clone)]
pub struct BspLeaf {
    /// Owning cluster, or `NO_CLUSTER` for solid/void leaves
    pub cluster: ClusterId,
    /// Map-space bounds
    pub bounds: AABB,
}

/// Which sides of a plane a box touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaneSide {
    Front,
    Back,
    Both,
}

/// Immutable BSP tree over map space.
pub struct BspTree {
    nodes: Vec<BspNode>,
    leaves: Vec<BspLeaf>,
    root: BspChild,
    space: MapSpace,
}

impl BspTree {
    /// Build a tree from already-decoded nodes and leaves.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if a child index is out of range, if a
    /// node or leaf is reachable twice from `root` (cycles, shared
    /// subtrees), or if the tree has no leaves.
    pub fn new(
        nodes: Vec<BspNode>,
        leaves: Vec<BspLeaf>,
        root: BspChild,
        space: MapSpace,
    ) -> Result<Self> {
        if leaves.is_empty() {
            engine_bail!("galaxy3d::BspTree", "BSP tree has no leaves");
        }

        let mut node_seen = vec![false; nodes.len()];
        let mut leaf_seen = vec![false; leaves.len()];
        let mut stack = vec![root];

        while let Some(child) = stack.pop() {
            match child {
                BspChild::Node(index) => {
                    let Some(node) = nodes.get(index) else {
                        engine_bail!("galaxy3d::BspTree", "Node index {} out of range ({} nodes)", index, nodes.len());
                    };
                    if node_seen[index] {
                        engine_bail!("galaxy3d::BspTree", "Node {} is reachable more than once", index);
                    }
                    node_seen[index] = true;
                    stack.push(node.front);
                    stack.push(node.back);
                }
                BspChild::Leaf(index) => {
                    if index >= leaves.len() {
                        engine_bail!("galaxy3d::BspTree", "Leaf index {} out of range ({} leaves)", index, leaves.len());
                    }
                    if leaf_seen[index] {
                        engine_bail!("galaxy3d::BspTree", "Leaf {} is reachable more than once", index);
                    }
                    leaf_seen[index] = true;
                }
            }
        }

        Ok(Self { nodes, leaves, root, space })
    }

    /// Build a kd-style tree over a regular grid of cells.
    ///
    /// Leaf ids follow grid order (`x + nx * (y + ny * z)`);
    /// `cluster_of_cell` assigns each cell its cluster. `bounds` is in
    /// map space.
    pub fn from_grid(
        bounds: AABB,
        cells: [usize; 3],
        space: MapSpace,
        cluster_of_cell: impl Fn([usize; 3]) -> ClusterId,
    ) -> Result<Self> {
        if cells.iter().any(|&n| n == 0) {
            engine_bail!("galaxy3d::BspTree", "Grid dimensions must be non-zero, got {:?}", cells);
        }

        let cell_size = (bounds.max - bounds.min) / Vec3::new(cells[0] as f32, cells[1] as f32, cells[2] as f32);
        let mut leaves = Vec::with_capacity(cells[0] * cells[1] * cells[2]);
        for z in 0..cells[2] {
            for y in 0..cells[1] {
                for x in 0..cells[0] {
                    let min = bounds.min + cell_size * Vec3::new(x as f32, y as f32, z as f32);
                    leaves.push(BspLeaf {
                        cluster: cluster_of_cell([x, y, z]),
                        bounds: AABB { min, max: min + cell_size },
                    });
                }
            }
        }

        let mut nodes = Vec::new();
        let root = Self::split_grid(&mut nodes, &bounds, cell_size, cells, [0, 0, 0], cells);
        Self::new(nodes, leaves, root, space)
    }

    /// Recursively split the cell range `[lo, hi)` along its longest axis.
    fn split_grid(
        nodes: &mut Vec<BspNode>,
        world: &AABB,
        cell_size: Vec3,
        cells: [usize; 3],
        lo: [usize; 3],
        hi: [usize; 3],
    ) -> BspChild {
        let counts = [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]];
        let axis = (0..3).max_by_key(|&a| counts[a]).unwrap_or(0);

        if counts[axis] == 1 {
            return BspChild::Leaf(lo[0] + cells[0] * (lo[1] + cells[1] * lo[2]));
        }

        let mid = lo[axis] + counts[axis] / 2;
        let dist = world.min[axis] + cell_size[axis] * mid as f32;

        let bounds = AABB {
            min: world.min + cell_size * Vec3::new(lo[0] as f32, lo[1] as f32, lo[2] as f32),
            max: world.min + cell_size * Vec3::new(hi[0] as f32, hi[1] as f32, hi[2] as f32),
        };

        // Reserve the slot, children are filled in after recursion
        let index = nodes.len();
        nodes.push(BspNode {
            plane: BspPlane::axis_aligned(axis, dist),
            front: BspChild::Leaf(0),
            back: BspChild::Leaf(0),
            bounds,
        });

        let mut back_hi = hi;
        back_hi[axis] = mid;
        let mut front_lo = lo;
        front_lo[axis] = mid;

        let back = Self::split_grid(nodes, world, cell_size, cells, lo, back_hi);
        let front = Self::split_grid(nodes, world, cell_size, cells, front_lo, hi);
        nodes[index].front = front;
        nodes[index].back = back;

        BspChild::Node(index)
    }

    pub fn space(&self) -> MapSpace {
        self.space
    }

    /// Leaf record by id.
    pub fn leaf(&self, leaf: LeafId) -> Option<&BspLeaf> {
        self.leaves.get(leaf)
    }

    /// Map-space bounds of the whole tree.
    pub fn bounds(&self) -> AABB {
        self.child_bounds(self.root)
    }

    fn child_bounds(&self, child: BspChild) -> AABB {
        match child {
            BspChild::Node(index) => self.nodes[index].bounds,
            BspChild::Leaf(index) => self.leaves[index].bounds,
        }
    }

    /// Classify a map-space box against a plane using its projected radius.
    fn classify(plane: &BspPlane, aabb: &AABB) -> PlaneSide {
        let center = aabb.center();
        let half = (aabb.max - aabb.min) * 0.5;
        let d = plane.distance(center);
        let r = plane.normal.abs().dot(half);
        if d - r > 0.0 {
            PlaneSide::Front
        } else if d + r < 0.0 {
            PlaneSide::Back
        } else {
            PlaneSide::Both
        }
    }
}

// ===== SPATIAL INDEX TRAIT =====

impl SpatialIndex for BspTree {
    fn leaf_at(&self, point: Vec3) -> Option<LeafId> {
        let point = self.space.world_to_map(point);
        if !self.bounds().contains_point(point) {
            return None;
        }

        let mut child = self.root;
        loop {
            match child {
                BspChild::Leaf(index) => return Some(index),
                BspChild::Node(index) => {
                    let node = &self.nodes[index];
                    child = if node.plane.distance(point) >= 0.0 { node.front } else { node.back };
                }
            }
        }
    }

    fn leaves_intersecting(&self, aabb: &AABB, results: &mut Vec<LeafId>) {
        let aabb = self.space.world_to_map_aabb(aabb);
        let mut stack = vec![self.root];

        while let Some(child) = stack.pop() {
            match child {
                BspChild::Leaf(index) => {
                    if self.leaves[index].bounds.intersects(&aabb) {
                        results.push(index);
                    }
                }
                BspChild::Node(index) => {
                    let node = &self.nodes[index];
                    if !node.bounds.intersects(&aabb) {
                        continue;
                    }
                    match Self::classify(&node.plane, &aabb) {
                        PlaneSide::Front => stack.push(node.front),
                        PlaneSide::Back => stack.push(node.back),
                        PlaneSide::Both => {
                            stack.push(node.back);
                            stack.push(node.front);
                        }
                    }
                }
            }
        }
    }

    fn cluster_of(&self, leaf: LeafId) -> ClusterId {
        self.leaves.get(leaf).map_or(NO_CLUSTER, |l| l.cluster)
    }

    fn leaf_count(&self) -> usize {
        self.leaves.len()
    }
}

#[cfg(test)]
#[path = "bsp_tree_tests.rs"]
mod tests;
