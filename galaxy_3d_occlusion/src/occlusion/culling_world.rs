/// CullingWorld: occlusion state of one loaded scene.
///
/// Owns the cluster-object index, the drawable records and the decoded
/// PVS rows. Shares the map geometry read-only. Dropping the world
/// discards all of it; a reload builds a new one.

use std::sync::Arc;
use glam::Vec3;
use crate::error::Result;
use crate::map::{ClusterId, ClusterSet, MapGeometry, NO_CLUSTER};
use crate::scene::{DrawableHost, SceneGraph};
use super::cluster_object_index::ClusterObjectIndex;
use super::config::CullingConfig;
use super::occlusion_controller::{OcclusionController, ViewpointSource, ViewpointUpdate};
use super::pvs_cache::PvsCache;

pub struct CullingWorld {
    geometry: Arc<MapGeometry>,
    pvs: PvsCache,
    controller: OcclusionController,
    config: CullingConfig,
}

impl CullingWorld {
    /// Index `scene` against `geometry`.
    ///
    /// Drawable flags are left untouched; call `reset_visibility` to hide
    /// the drawables under culling before the first viewpoint update.
    ///
    /// # Errors
    ///
    /// Forwards index build errors and, with `eager_pvs_decode`, PVS row
    /// decoding errors.
    pub fn build(geometry: Arc<MapGeometry>, scene: &SceneGraph, config: CullingConfig) -> Result<Self> {
        let (index, drawables) = ClusterObjectIndex::build(
            scene,
            geometry.spatial_index(),
            geometry.num_clusters(),
            &config,
        )?;

        let pvs = PvsCache::new(geometry.clone());
        if config.eager_pvs_decode {
            pvs.preload()?;
        }

        Ok(Self {
            geometry,
            pvs,
            controller: OcclusionController::new(index, drawables),
            config,
        })
    }

    /// Hide every drawable under culling (uninitialized state).
    pub fn reset_visibility(&mut self, host: &mut dyn DrawableHost) {
        self.controller.hide_culled_drawables(host);
    }

    /// Per-frame update from a world-space viewpoint position.
    pub fn update_viewpoint(&mut self, position: Vec3, host: &mut dyn DrawableHost) -> Result<ViewpointUpdate> {
        self.update_from_position(ViewpointSource::Frame, position, host)
    }

    /// Same as `update_viewpoint`, for editing/preview while paused.
    pub fn update_preview_viewpoint(&mut self, position: Vec3, host: &mut dyn DrawableHost) -> Result<ViewpointUpdate> {
        self.update_from_position(ViewpointSource::Preview, position, host)
    }

    /// Move the viewpoint to `cluster` directly (no leaf lookup).
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` outside `[0, num_clusters)` except `NO_CLUSTER`.
    pub fn set_viewpoint_cluster(&mut self, cluster: ClusterId, host: &mut dyn DrawableHost) -> Result<ViewpointUpdate> {
        self.controller.apply_sample(ViewpointSource::Frame, None, cluster, &self.pvs, host)
    }

    fn update_from_position(
        &mut self,
        source: ViewpointSource,
        position: Vec3,
        host: &mut dyn DrawableHost,
    ) -> Result<ViewpointUpdate> {
        let spatial = self.geometry.spatial_index();
        let leaf = spatial.leaf_at(position);
        let cluster = leaf.map_or(NO_CLUSTER, |leaf| spatial.cluster_of(leaf));
        self.controller.apply_sample(source, leaf, cluster, &self.pvs, host)
    }

    /// Decoded PVS row of `cluster`.
    pub fn pvs_row(&self, cluster: ClusterId) -> Result<&ClusterSet> {
        self.pvs.row(cluster)
    }

    pub fn geometry(&self) -> &Arc<MapGeometry> {
        &self.geometry
    }

    pub fn pvs(&self) -> &PvsCache {
        &self.pvs
    }

    pub fn controller(&self) -> &OcclusionController {
        &self.controller
    }

    pub(crate) fn controller_mut(&mut self) -> &mut OcclusionController {
        &mut self.controller
    }

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "culling_world_tests.rs"]
mod tests;
