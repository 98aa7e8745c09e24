/// OcclusionDiagnostics: read-only inspection of a culling world.
///
/// A borrowed view for debug overlays and tools. The per-frame path does
/// not go through it. The only mutating diagnostic, the bulk override,
/// lives on `CullingWorld::force_enable_all`.

use crate::error::{Error, Result};
use crate::map::{ClusterId, ClusterSet, LeafId, NO_CLUSTER};
use crate::scene::{DrawableHost, SceneObjectKey};
use super::culling_world::CullingWorld;
use super::drawable_record::DrawableIndex;
use super::occlusion_controller::OcclusionStats;

const SOURCE: &str = "galaxy3d::OcclusionDiagnostics";

pub struct OcclusionDiagnostics<'a> {
    world: &'a CullingWorld,
}

impl<'a> OcclusionDiagnostics<'a> {
    pub fn new(world: &'a CullingWorld) -> Self {
        Self { world }
    }

    // ===== CLUSTERS =====

    pub fn num_clusters(&self) -> usize {
        self.world.pvs().num_clusters()
    }

    /// Whether `to` is in the PVS row of `from`.
    ///
    /// Always `false` when either id is `NO_CLUSTER`. Rows are directed, so
    /// the result may differ with the arguments swapped.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` for any other id outside `[0, num_clusters)`.
    pub fn is_cluster_visible_from(&self, from: ClusterId, to: ClusterId) -> Result<bool> {
        if from == NO_CLUSTER || to == NO_CLUSTER {
            return Ok(false);
        }
        if to < 0 || to as usize >= self.num_clusters() {
            return Err(Error::InvalidCluster(to).logged(SOURCE));
        }
        Ok(self.world.pvs_row(from)?.contains(&to))
    }

    pub fn pvs_row(&self, cluster: ClusterId) -> Result<&'a ClusterSet> {
        self.world.pvs_row(cluster)
    }

    pub fn drawables_in_cluster(&self, cluster: ClusterId) -> Result<&'a [DrawableIndex]> {
        self.world.controller().index().drawables_in_cluster(cluster)
    }

    pub fn current_cluster(&self) -> Option<ClusterId> {
        self.world.controller().current_cluster()
    }

    /// Size of the current cluster's PVS row (0 before the first update).
    pub fn num_visible_clusters(&self) -> usize {
        self.current_row().map_or(0, ClusterSet::len)
    }

    pub fn average_drawables_per_cluster(&self) -> f32 {
        self.world.controller().index().average_drawables_per_cluster()
    }

    // ===== DRAWABLES =====

    /// Eligible drawables, including those outside every cluster.
    pub fn num_drawables_total(&self) -> usize {
        self.world.controller().drawables().len()
    }

    pub fn num_drawables_under_culling(&self) -> usize {
        self.world.controller().index().drawables_under_culling()
    }

    pub fn ref_count_of(&self, drawable: DrawableIndex) -> Result<i32> {
        Ok(self.world.controller().drawable(drawable)?.ref_count())
    }

    pub fn is_drawable_visible(&self, drawable: DrawableIndex) -> Result<bool> {
        Ok(self.world.controller().drawable(drawable)?.is_visible())
    }

    pub fn drawable_handle(&self, drawable: DrawableIndex) -> Result<SceneObjectKey> {
        Ok(self.world.controller().drawable(drawable)?.handle())
    }

    // ===== LEAVES =====

    pub fn num_leaves(&self) -> usize {
        self.world.geometry().spatial_index().leaf_count()
    }

    /// Leaf the viewpoint was last located in.
    pub fn current_leaf(&self) -> Option<LeafId> {
        self.world.controller().current_leaf()
    }

    /// Whether the cluster of leaf `to` is in the PVS row of leaf `from`'s cluster.
    ///
    /// # Errors
    ///
    /// `Error::InvalidLeaf` if either leaf is outside the spatial index.
    pub fn is_leaf_visible(&self, from: LeafId, to: LeafId) -> Result<bool> {
        let from_cluster = self.cluster_of_leaf(from)?;
        let to_cluster = self.cluster_of_leaf(to)?;
        self.is_cluster_visible_from(from_cluster, to_cluster)
    }

    /// Leaves whose cluster is visible from the current cluster.
    pub fn num_visible_leaves(&self) -> usize {
        let Some(row) = self.current_row() else {
            return 0;
        };
        let spatial = self.world.geometry().spatial_index();
        (0..spatial.leaf_count())
            .filter(|&leaf| row.contains(&spatial.cluster_of(leaf)))
            .count()
    }

    pub fn stats(&self) -> OcclusionStats {
        self.world.controller().stats()
    }

    fn cluster_of_leaf(&self, leaf: LeafId) -> Result<ClusterId> {
        let spatial = self.world.geometry().spatial_index();
        if leaf >= spatial.leaf_count() {
            return Err(Error::InvalidLeaf(leaf).logged(SOURCE));
        }
        Ok(spatial.cluster_of(leaf))
    }

    fn current_row(&self) -> Option<&'a ClusterSet> {
        let cluster = self.current_cluster()?;
        self.world.pvs_row(cluster).ok()
    }
}

impl CullingWorld {
    /// Read-only diagnostics view.
    pub fn diagnostics(&self) -> OcclusionDiagnostics<'_> {
        OcclusionDiagnostics::new(self)
    }

    /// Show (`true`) or hide (`false`) every drawable regardless of ref counts.
    ///
    /// Counts are kept; the next cluster transition restores the computed
    /// visibility.
    pub fn force_enable_all(&mut self, enabled: bool, host: &mut dyn DrawableHost) {
        crate::engine_info!(
            SOURCE,
            "Forcing all {} drawables {}",
            self.controller().drawables().len(),
            if enabled { "visible" } else { "hidden" }
        );
        self.controller_mut().force_all(enabled, host);
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
