/// OcclusionController: keeps drawable visibility in step with the
/// viewpoint's cluster.
///
/// State machine:
///
/// - no current cluster (fresh load): the first valid cluster `C`
///   increments every member of every cluster in PVS(C);
/// - `Old → New`: members of PVS(New) \ PVS(Old) are incremented, then
///   members of PVS(Old) \ PVS(New) are decremented. Clusters in both
///   rows are not visited;
/// - same cluster, or `NO_CLUSTER` samples: nothing happens.
///
/// Drawables are only shown/hidden on a 0↔1 crossing of their count.

use crate::error::{Error, Result};
use crate::map::{ClusterId, LeafId, NO_CLUSTER};
use crate::scene::DrawableHost;
use super::cluster_object_index::ClusterObjectIndex;
use super::drawable_record::{Crossing, DrawableIndex, DrawableRecord};
use super::pvs_cache::PvsCache;

const SOURCE: &str = "galaxy3d::OcclusionController";

/// Which call site produced a viewpoint sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewpointSource {
    /// Per-frame update while the world is simulating
    Frame,
    /// Editing/preview update while the world is paused
    Preview,
}

/// What a viewpoint sample did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewpointUpdate {
    /// Sample had no leaf or no cluster; state kept
    Ignored,
    /// Same cluster as before; state kept
    Unchanged,
    /// First valid cluster after load
    FirstAssignment {
        cluster: ClusterId,
        visible_clusters: usize,
    },
    /// Moved between two valid clusters
    Transition {
        from: ClusterId,
        to: ClusterId,
        newly_visible: usize,
        newly_invisible: usize,
    },
}

/// Counters since the last load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OcclusionStats {
    /// First assignments plus transitions
    pub transitions: u64,
    /// Samples without a valid cluster
    pub ignored_samples: u64,
    /// Samples coming from the preview path
    pub preview_samples: u64,
    /// 0→1 crossings (and override restores that showed)
    pub drawables_shown: u64,
    /// 1→0 crossings (and override restores that hid)
    pub drawables_hidden: u64,
    /// Ref counts observed going negative
    pub invariant_violations: u64,
}

pub struct OcclusionController {
    index: ClusterObjectIndex,
    drawables: Vec<DrawableRecord>,
    current_cluster: Option<ClusterId>,
    current_leaf: Option<LeafId>,
    /// Active diagnostic override (`force_all`), cleared by the next transition
    force_override: Option<bool>,
    stats: OcclusionStats,
}

impl OcclusionController {
    /// Controller in the uninitialized state (no current cluster, all counts 0).
    pub fn new(index: ClusterObjectIndex, drawables: Vec<DrawableRecord>) -> Self {
        Self {
            index,
            drawables,
            current_cluster: None,
            current_leaf: None,
            force_override: None,
            stats: OcclusionStats::default(),
        }
    }

    /// Hide every drawable under culling (load-time reset).
    pub fn hide_culled_drawables(&mut self, host: &mut dyn DrawableHost) {
        for record in self.drawables.iter_mut().filter(|r| r.is_under_culling()) {
            record.set_visible(false);
            host.set_drawable_visible(record.handle(), false);
        }
    }

    /// Feed one viewpoint sample (leaf + its cluster).
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` if `cluster` is neither `NO_CLUSTER` nor in
    /// `[0, num_clusters)`. Row decoding errors are forwarded. On error
    /// no state has changed.
    pub fn apply_sample(
        &mut self,
        source: ViewpointSource,
        leaf: Option<LeafId>,
        cluster: ClusterId,
        pvs: &PvsCache,
        host: &mut dyn DrawableHost,
    ) -> Result<ViewpointUpdate> {
        if source == ViewpointSource::Preview {
            self.stats.preview_samples += 1;
        }

        if cluster == NO_CLUSTER {
            self.stats.ignored_samples += 1;
            return Ok(ViewpointUpdate::Ignored);
        }
        if cluster < 0 || cluster as usize >= self.index.num_clusters() {
            return Err(Error::InvalidCluster(cluster).logged(SOURCE));
        }

        let update = match self.current_cluster {
            Some(current) if current == cluster => ViewpointUpdate::Unchanged,
            None => self.first_assignment(cluster, pvs, host)?,
            Some(current) => self.transition(current, cluster, pvs, host)?,
        };

        // The leaf follows the cluster; a sample without one clears it on a move
        if leaf.is_some() || update != ViewpointUpdate::Unchanged {
            self.current_leaf = leaf;
        }
        if update != ViewpointUpdate::Unchanged && self.force_override.take().is_some() {
            self.resync_all(host);
        }
        Ok(update)
    }

    fn first_assignment(
        &mut self,
        cluster: ClusterId,
        pvs: &PvsCache,
        host: &mut dyn DrawableHost,
    ) -> Result<ViewpointUpdate> {
        let row = pvs.row(cluster)?;
        for &visible in row {
            self.increment_cluster(visible, host);
        }

        crate::engine_trace!(SOURCE, "Viewpoint entered cluster {} ({} visible clusters)", cluster, row.len());

        self.current_cluster = Some(cluster);
        self.stats.transitions += 1;
        Ok(ViewpointUpdate::FirstAssignment {
            cluster,
            visible_clusters: row.len(),
        })
    }

    fn transition(
        &mut self,
        from: ClusterId,
        to: ClusterId,
        pvs: &PvsCache,
        host: &mut dyn DrawableHost,
    ) -> Result<ViewpointUpdate> {
        let old_row = pvs.row(from)?;
        let new_row = pvs.row(to)?;

        // Increments first: a drawable moving between two visible clusters never dips to 0
        let mut newly_visible = 0;
        for &cluster in new_row.difference(old_row) {
            self.increment_cluster(cluster, host);
            newly_visible += 1;
        }
        let mut newly_invisible = 0;
        for &cluster in old_row.difference(new_row) {
            self.decrement_cluster(cluster, host);
            newly_invisible += 1;
        }

        crate::engine_trace!(
            SOURCE,
            "Viewpoint cluster {} -> {}: +{} / -{} clusters",
            from, to, newly_visible, newly_invisible
        );

        self.current_cluster = Some(to);
        self.stats.transitions += 1;
        Ok(ViewpointUpdate::Transition {
            from,
            to,
            newly_visible,
            newly_invisible,
        })
    }

    fn increment_cluster(&mut self, cluster: ClusterId, host: &mut dyn DrawableHost) {
        // Rows are validated by PvsCache, the lookup cannot fail
        let Ok(members) = self.index.drawables_in_cluster(cluster) else {
            return;
        };
        for &index in members {
            let record = &mut self.drawables[index];
            if record.increment() == Crossing::Shown {
                host.set_drawable_visible(record.handle(), true);
                self.stats.drawables_shown += 1;
            }
        }
    }

    fn decrement_cluster(&mut self, cluster: ClusterId, host: &mut dyn DrawableHost) {
        let Ok(members) = self.index.drawables_in_cluster(cluster) else {
            return;
        };
        for &index in members {
            let record = &mut self.drawables[index];
            match record.decrement() {
                Crossing::Hidden => {
                    host.set_drawable_visible(record.handle(), false);
                    self.stats.drawables_hidden += 1;
                }
                Crossing::Negative => {
                    self.stats.invariant_violations += 1;
                    crate::engine_error!(
                        SOURCE,
                        "Drawable {} ({:?}) ref count went negative: {} (leaving cluster {})",
                        index, record.handle(), record.ref_count(), cluster
                    );
                }
                Crossing::None | Crossing::Shown => {}
            }
        }
    }

    /// Restore every flag to its expected value after an override.
    fn resync_all(&mut self, host: &mut dyn DrawableHost) {
        for record in &mut self.drawables {
            match record.resync() {
                Some(true) => {
                    host.set_drawable_visible(record.handle(), true);
                    self.stats.drawables_shown += 1;
                }
                Some(false) => {
                    host.set_drawable_visible(record.handle(), false);
                    self.stats.drawables_hidden += 1;
                }
                None => {}
            }
        }
    }

    /// Force every drawable shown or hidden, leaving ref counts alone.
    pub(crate) fn force_all(&mut self, enabled: bool, host: &mut dyn DrawableHost) {
        for record in &mut self.drawables {
            record.set_visible(enabled);
            host.set_drawable_visible(record.handle(), enabled);
        }
        self.force_override = Some(enabled);
    }

    // ===== ACCESSORS =====

    pub fn index(&self) -> &ClusterObjectIndex {
        &self.index
    }

    pub fn drawables(&self) -> &[DrawableRecord] {
        &self.drawables
    }

    /// Drawable record by index.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDrawable` if `index` is out of range.
    pub fn drawable(&self, index: DrawableIndex) -> Result<&DrawableRecord> {
        self.drawables
            .get(index)
            .ok_or_else(|| Error::InvalidDrawable(index).logged(SOURCE))
    }

    pub fn current_cluster(&self) -> Option<ClusterId> {
        self.current_cluster
    }

    pub fn current_leaf(&self) -> Option<LeafId> {
        self.current_leaf
    }

    pub fn force_override(&self) -> Option<bool> {
        self.force_override
    }

    pub fn stats(&self) -> OcclusionStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "occlusion_controller_tests.rs"]
mod tests;
