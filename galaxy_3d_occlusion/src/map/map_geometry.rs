/// MapGeometry: the decoded map handed to the occlusion core on load.
///
/// Bundles the two read-only collaborators (spatial index and visibility
/// table). It is shared as `Arc<MapGeometry>` so that diagnostics can
/// read it while the culling world owns its own per-scene state.

use rustc_hash::FxHashSet;
use super::spatial_index::SpatialIndex;
use super::visibility_table::VisibilityTable;

/// Visibility cluster id. Valid ids are dense in `[0, num_clusters)`.
pub type ClusterId = i32;

/// Leaf id in the spatial partition.
pub type LeafId = usize;

/// Set of cluster ids (one PVS row).
pub type ClusterSet = FxHashSet<ClusterId>;

/// Sentinel cluster for points outside any closed cell.
pub const NO_CLUSTER: ClusterId = -1;

/// Decoded map data: spatial partition + PVS table.
pub struct MapGeometry {
    spatial_index: Box<dyn SpatialIndex>,
    visibility: Box<dyn VisibilityTable>,
}

impl MapGeometry {
    /// Bundle a spatial index and a visibility table.
    pub fn new(
        spatial_index: impl SpatialIndex + 'static,
        visibility: impl VisibilityTable + 'static,
    ) -> Self {
        Self {
            spatial_index: Box::new(spatial_index),
            visibility: Box::new(visibility),
        }
    }

    pub fn spatial_index(&self) -> &dyn SpatialIndex {
        self.spatial_index.as_ref()
    }

    pub fn visibility(&self) -> &dyn VisibilityTable {
        self.visibility.as_ref()
    }

    pub fn num_clusters(&self) -> usize {
        self.visibility.num_clusters()
    }

    /// Whether `cluster` is a real cluster of this map.
    pub fn is_valid_cluster(&self, cluster: ClusterId) -> bool {
        cluster >= 0 && (cluster as usize) < self.num_clusters()
    }
}
