/// Cluster-to-cluster potentially-visible-set rows.
///
/// Rows are directed: `b` in `pvs_row(a)` says nothing about
/// `a` in `pvs_row(b)`.

use crate::error::{Error, Result};
use super::map_geometry::{ClusterId, ClusterSet};

const SOURCE: &str = "galaxy3d::ExplicitVisibilityTable";

/// Trait for PVS row lookups.
///
/// `pvs_row` may decode on every call; the occlusion core caches the
/// result (see `PvsCache`), so implementations need not.
pub trait VisibilityTable: Send + Sync {
    /// Number of clusters; valid ids are `0..num_clusters()`.
    fn num_clusters(&self) -> usize;

    /// Clusters potentially visible from `cluster`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` if `cluster` is outside `[0, num_clusters)`.
    fn pvs_row(&self, cluster: ClusterId) -> Result<ClusterSet>;
}

/// Visibility table built from explicit per-cluster lists.
///
/// Used for procedurally generated maps and for tests that need
/// hand-written (possibly asymmetric) PVS data.
pub struct ExplicitVisibilityTable {
    rows: Vec<ClusterSet>,
}

impl ExplicitVisibilityTable {
    /// Build from one list of visible cluster ids per cluster.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCluster` if any listed id is outside `[0, rows.len())`.
    pub fn new(rows: Vec<Vec<ClusterId>>) -> Result<Self> {
        let num_clusters = rows.len();
        let mut sets = Vec::with_capacity(num_clusters);
        for row in rows {
            let mut set = ClusterSet::default();
            for cluster in row {
                if cluster < 0 || cluster as usize >= num_clusters {
                    return Err(Error::InvalidCluster(cluster).logged(SOURCE));
                }
                set.insert(cluster);
            }
            sets.push(set);
        }
        Ok(Self { rows: sets })
    }

    /// Every cluster sees every cluster (maps compiled without vis data).
    pub fn all_visible(num_clusters: usize) -> Self {
        let full: ClusterSet = (0..num_clusters as ClusterId).collect();
        Self { rows: vec![full; num_clusters] }
    }
}

impl VisibilityTable for ExplicitVisibilityTable {
    fn num_clusters(&self) -> usize {
        self.rows.len()
    }

    fn pvs_row(&self, cluster: ClusterId) -> Result<ClusterSet> {
        usize::try_from(cluster)
            .ok()
            .and_then(|c| self.rows.get(c))
            .cloned()
            .ok_or_else(|| Error::InvalidCluster(cluster).logged(SOURCE))
    }
}

#[cfg(test)]
#[path = "visibility_table_tests.rs"]
mod tests;
