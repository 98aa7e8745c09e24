/// PvsCache: decoded PVS rows, one slot per cluster.
///
/// Each row is decoded at most once per load, either all at load time
/// (`preload`) or on first use. Cached rows are validated so the
/// controller never sees an id outside `[0, num_clusters)`.

use std::sync::{Arc, OnceLock};
use crate::error::{Error, Result};
use crate::map::{ClusterId, ClusterSet, MapGeometry};

const SOURCE: &str = "galaxy3d::PvsCache";

pub struct PvsCache {
    geometry: Arc<MapGeometry>,
    rows: Vec<OnceLock<ClusterSet>>,
}

impl PvsCache {
    pub fn new(geometry: Arc<MapGeometry>) -> Self {
        let rows = (0..geometry.num_clusters()).map(|_| OnceLock::new()).collect();
        Self { geometry, rows }
    }

    /// Decode every row now.
    pub fn preload(&self) -> Result<()> {
        for cluster in 0..self.rows.len() {
            self.row(cluster as ClusterId)?;
        }
        Ok(())
    }

    /// PVS row of `cluster`, decoding it on first access.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` outside `[0, num_clusters)` (including
    /// `NO_CLUSTER`); `Error::InvalidVisibilityData` if the table returns
    /// ids outside the valid range.
    pub fn row(&self, cluster: ClusterId) -> Result<&ClusterSet> {
        let slot = usize::try_from(cluster)
            .ok()
            .and_then(|c| self.rows.get(c))
            .ok_or_else(|| Error::InvalidCluster(cluster).logged(SOURCE))?;

        if let Some(row) = slot.get() {
            return Ok(row);
        }

        let row = self.geometry.visibility().pvs_row(cluster)?;
        let num_clusters = self.rows.len();
        if let Some(bad) = row.iter().find(|&&c| c < 0 || c as usize >= num_clusters) {
            return Err(Error::InvalidVisibilityData(format!(
                "PVS row of cluster {} references cluster {}",
                cluster, bad
            ))
            .logged(SOURCE));
        }
        Ok(slot.get_or_init(|| row))
    }

    /// Number of rows decoded so far.
    pub fn decoded_rows(&self) -> usize {
        self.rows.iter().filter(|slot| slot.get().is_some()).count()
    }

    pub fn num_clusters(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
#[path = "pvs_cache_tests.rs"]
mod tests;
