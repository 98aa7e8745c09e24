/// ClusterObjectIndex: which drawables lie in which cluster.
///
/// Built once per scene load by a single pass over the scene:
///
/// 1. keep renderable objects that are static or sit under a static
///    ancestor, skipping tool-only geometry by name;
/// 2. pad the world bounds by `CullingConfig::bounds_epsilon`;
/// 3. collect the distinct clusters of every leaf the padded box touches;
/// 4. append the drawable to each of those clusters' lists.
///
/// Read-only afterwards. A reload builds a new index from scratch.

use rdst::RadixSort;
use crate::error::{Error, Result};
use crate::map::{ClusterId, LeafId, SpatialIndex, NO_CLUSTER};
use crate::scene::{ObjectFlags, SceneGraph, SceneObject, SceneObjectKey};
use super::config::CullingConfig;
use super::drawable_record::{DrawableIndex, DrawableRecord};

const SOURCE: &str = "galaxy3d::ClusterObjectIndex";

/// Per-cluster lists of drawable indices.
pub struct ClusterObjectIndex {
    members: Vec<Vec<DrawableIndex>>,
    drawables_under_culling: usize,
}

impl ClusterObjectIndex {
    /// Build the index and the drawable array it refers to.
    ///
    /// Drawable indices follow scene iteration order. Every eligible
    /// object gets a record; only those touching a cluster are under
    /// culling.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` if the spatial index reports a leaf cluster
    /// outside `[0, num_clusters)` (other than `NO_CLUSTER`).
    pub fn build(
        scene: &SceneGraph,
        spatial: &dyn SpatialIndex,
        num_clusters: usize,
        config: &CullingConfig,
    ) -> Result<(Self, Vec<DrawableRecord>)> {
        let mut members: Vec<Vec<DrawableIndex>> = vec![Vec::new(); num_clusters];
        let mut drawables = Vec::new();
        let mut drawables_under_culling = 0;

        let mut leaves: Vec<LeafId> = Vec::new();
        let mut clusters: Vec<ClusterId> = Vec::new();

        for (key, object) in scene.objects() {
            if !Self::is_eligible(scene, key, object, config) {
                continue;
            }
            let Some(bounds) = object.world_bounds() else {
                continue;
            };

            leaves.clear();
            spatial.leaves_intersecting(&bounds.expanded(config.bounds_epsilon), &mut leaves);

            clusters.clear();
            clusters.extend(
                leaves.iter()
                    .map(|&leaf| spatial.cluster_of(leaf))
                    .filter(|&cluster| cluster != NO_CLUSTER),
            );
            // Several leaves of one cluster count once
            clusters.radix_sort_unstable();
            clusters.dedup();

            let index = drawables.len();
            for &cluster in &clusters {
                let list = usize::try_from(cluster)
                    .ok()
                    .and_then(|c| members.get_mut(c))
                    .ok_or_else(|| Error::InvalidCluster(cluster).logged(SOURCE))?;
                list.push(index);
            }

            let under_culling = !clusters.is_empty();
            if under_culling {
                drawables_under_culling += 1;
            }
            drawables.push(DrawableRecord::new(key, object.is_visible(), under_culling));
        }

        crate::engine_info!(
            SOURCE,
            "Indexed {} drawables ({} under culling) across {} clusters",
            drawables.len(),
            drawables_under_culling,
            num_clusters
        );

        Ok((Self { members, drawables_under_culling }, drawables))
    }

    /// Culling eligibility of a single object.
    pub fn is_eligible(
        scene: &SceneGraph,
        key: SceneObjectKey,
        object: &SceneObject,
        config: &CullingConfig,
    ) -> bool {
        object.flags().contains(ObjectFlags::RENDERABLE)
            && scene.is_static_in_hierarchy(key)
            && !config.is_excluded_name(object.name())
    }

    pub fn num_clusters(&self) -> usize {
        self.members.len()
    }

    /// Drawables whose padded bounds touch `cluster`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` outside `[0, num_clusters)`.
    pub fn drawables_in_cluster(&self, cluster: ClusterId) -> Result<&[DrawableIndex]> {
        usize::try_from(cluster)
            .ok()
            .and_then(|c| self.members.get(c))
            .map(|list| list.as_slice())
            .ok_or_else(|| Error::InvalidCluster(cluster).logged(SOURCE))
    }

    /// Number of drawables touching at least one cluster.
    pub fn drawables_under_culling(&self) -> usize {
        self.drawables_under_culling
    }

    /// Sum of all list lengths (a drawable in k clusters counts k times).
    pub fn total_memberships(&self) -> usize {
        self.members.iter().map(Vec::len).sum()
    }

    pub fn average_drawables_per_cluster(&self) -> f32 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.total_memberships() as f32 / self.members.len() as f32
    }
}

#[cfg(test)]
#[path = "cluster_object_index_tests.rs"]
mod tests;
