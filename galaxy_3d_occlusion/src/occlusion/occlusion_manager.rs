/// Occlusion manager: entry point driven by the host application.
///
/// Holds the culling configuration and at most one `CullingWorld`, the
/// one of the currently loaded scene. Every query or update before
/// `on_scene_loaded` fails with `Error::NotLoaded`.

use std::sync::Arc;
use glam::Vec3;
use crate::error::{Error, Result};
use crate::map::MapGeometry;
use crate::scene::{DrawableHost, SceneGraph};
use super::config::CullingConfig;
use super::culling_world::CullingWorld;
use super::diagnostics::OcclusionDiagnostics;
use super::occlusion_controller::ViewpointUpdate;

const SOURCE: &str = "galaxy3d::OcclusionManager";

pub struct OcclusionManager {
    config: CullingConfig,
    world: Option<CullingWorld>,
}

impl OcclusionManager {
    /// Create a manager with no scene loaded
    pub fn new(config: CullingConfig) -> Self {
        Self { config, world: None }
    }

    /// Scene-loaded event: rebuild the index and reset visibility.
    ///
    /// The previous world (if any) is dropped first. Drawables under
    /// culling are hidden in `scene` until the first viewpoint update.
    ///
    /// # Errors
    ///
    /// Forwards `CullingWorld::build` errors. On error no world is loaded.
    pub fn on_scene_loaded(&mut self, geometry: Arc<MapGeometry>, scene: &mut SceneGraph) -> Result<()> {
        self.world = None;

        let mut world = CullingWorld::build(geometry, scene, self.config.clone())?;
        world.reset_visibility(scene);

        let diagnostics = world.diagnostics();
        crate::engine_info!(
            SOURCE,
            "Scene loaded: {} clusters, {} leaves, {} drawables ({} under culling, {:.2} per cluster)",
            diagnostics.num_clusters(),
            diagnostics.num_leaves(),
            diagnostics.num_drawables_total(),
            diagnostics.num_drawables_under_culling(),
            diagnostics.average_drawables_per_cluster()
        );

        self.world = Some(world);
        Ok(())
    }

    /// Drop the current world (scene unloaded).
    pub fn unload(&mut self) {
        if self.world.take().is_some() {
            crate::engine_debug!(SOURCE, "Scene unloaded");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.world.is_some()
    }

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    /// Replace the configuration used by the next load.
    pub fn set_config(&mut self, config: CullingConfig) {
        self.config = config;
    }

    /// World of the loaded scene.
    ///
    /// # Errors
    ///
    /// `Error::NotLoaded` if no scene is loaded.
    pub fn world(&self) -> Result<&CullingWorld> {
        self.world.as_ref().ok_or_else(|| Error::NotLoaded.logged(SOURCE))
    }

    pub fn world_mut(&mut self) -> Result<&mut CullingWorld> {
        self.world.as_mut().ok_or_else(|| Error::NotLoaded.logged(SOURCE))
    }

    pub fn diagnostics(&self) -> Result<OcclusionDiagnostics<'_>> {
        Ok(self.world()?.diagnostics())
    }

    /// Per-frame viewpoint update.
    pub fn update_viewpoint(&mut self, position: Vec3, host: &mut dyn DrawableHost) -> Result<ViewpointUpdate> {
        self.world_mut()?.update_viewpoint(position, host)
    }

    /// Viewpoint update while the world is paused (editing/preview).
    pub fn update_preview_viewpoint(&mut self, position: Vec3, host: &mut dyn DrawableHost) -> Result<ViewpointUpdate> {
        self.world_mut()?.update_preview_viewpoint(position, host)
    }

    /// See `CullingWorld::force_enable_all`.
    pub fn force_enable_all(&mut self, enabled: bool, host: &mut dyn DrawableHost) -> Result<()> {
        self.world_mut()?.force_enable_all(enabled, host);
        Ok(())
    }
}

impl Default for OcclusionManager {
    fn default() -> Self {
        Self::new(CullingConfig::default())
    }
}

#[cfg(test)]
#[path = "occlusion_manager_tests.rs"]
mod tests;
