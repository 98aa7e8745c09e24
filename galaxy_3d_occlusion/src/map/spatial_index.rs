/// Spatial partition queries consumed by the occlusion core.
///
/// A SpatialIndex answers "which leaf contains this point" and "which
/// leaves does this box touch", and maps each leaf to its visibility
/// cluster. Implementations include BspTree; a host engine can plug
/// its own map representation in instead.
///
/// Ownership: the map loader creates the SpatialIndex and hands it over
/// inside a MapGeometry. It is read-only after the scene-loaded event.

use glam::Vec3;
use super::aabb::AABB;
use super::map_geometry::{ClusterId, LeafId};

/// Trait for point and box lookups into the leaf partition.
///
/// All positions are world space.
pub trait SpatialIndex: Send + Sync {
    /// Leaf containing `point`, or `None` when the point is outside the tree.
    fn leaf_at(&self, point: Vec3) -> Option<LeafId>;

    /// Append every leaf whose bounds intersect `aabb` to `results`.
    fn leaves_intersecting(&self, aabb: &AABB, results: &mut Vec<LeafId>);

    /// Cluster owning `leaf`, or `NO_CLUSTER` for leaves outside the world
    /// (solid space, void) and for unknown leaf ids.
    fn cluster_of(&self, leaf: LeafId) -> ClusterId;

    /// Number of leaves in the partition.
    fn leaf_count(&self) -> usize;
}
