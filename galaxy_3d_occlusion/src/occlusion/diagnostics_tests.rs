/// Tests for OcclusionDiagnostics and the bulk override
use super::*;
use std::sync::{Arc, Mutex};
use serial_test::serial;
use crate::engine::Engine;
use crate::log::{LogEntry, LogSeverity, Logger};
use glam::Vec3;
use crate::map::{BspTree, ExplicitVisibilityTable, MapGeometry, MapSpace, AABB};
use crate::occlusion::CullingConfig;
use crate::scene::{SceneGraph, SceneObjectDesc};

// ============================================================================
// Helper Functions
// ============================================================================

fn span(x0: f32, x1: f32) -> AABB {
    AABB { min: Vec3::new(x0, 0.2, 0.2), max: Vec3::new(x1, 0.8, 0.8) }
}

/// Eight cells along X, two per cluster; cluster 0 sees 3 but not the reverse
fn world() -> (CullingWorld, SceneGraph) {
    let tree = BspTree::from_grid(
        AABB { min: Vec3::ZERO, max: Vec3::new(8.0, 1.0, 1.0) },
        [8, 1, 1],
        MapSpace::Identity,
        |cell| (cell[0] / 2) as ClusterId,
    )
    .unwrap();
    let table = ExplicitVisibilityTable::new(vec![vec![0, 1, 3], vec![0, 1, 2], vec![1, 2, 3], vec![2, 3]]).unwrap();
    let geometry = Arc::new(MapGeometry::new(tree, table));

    let mut scene = SceneGraph::new();
    scene.add_object(SceneObjectDesc::static_renderable("A", span(0.2, 1.8))).unwrap();
    scene.add_object(SceneObjectDesc::static_renderable("B", span(1.5, 2.5))).unwrap();
    scene.add_object(SceneObjectDesc::static_renderable("C", span(6.2, 7.8))).unwrap();
    scene.add_object(SceneObjectDesc::static_renderable("outside", span(30.0, 31.0))).unwrap();

    let mut world = CullingWorld::build(geometry, &scene, CullingConfig::default()).unwrap();
    world.reset_visibility(&mut scene);
    (world, scene)
}

// ============================================================================
// Counts
// ============================================================================

#[test]
fn test_counts_after_load() {
    let (world, _) = world();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.num_clusters(), 4);
    assert_eq!(diagnostics.num_leaves(), 8);
    assert_eq!(diagnostics.num_drawables_total(), 4);
    assert_eq!(diagnostics.num_drawables_under_culling(), 3);
    // A:{0}, B:{0,1}, C:{3}
    assert!((diagnostics.average_drawables_per_cluster() - 1.0).abs() < 1e-6);
    assert_eq!(diagnostics.drawables_in_cluster(0).unwrap(), &[0, 1]);
    assert_eq!(diagnostics.drawables_in_cluster(3).unwrap(), &[2]);
    assert!(diagnostics.drawables_in_cluster(2).unwrap().is_empty());
}

#[test]
fn test_before_first_update() {
    let (world, _) = world();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.current_cluster(), None);
    assert_eq!(diagnostics.current_leaf(), None);
    assert_eq!(diagnostics.num_visible_clusters(), 0);
    assert_eq!(diagnostics.num_visible_leaves(), 0);
    assert_eq!(diagnostics.ref_count_of(0), Ok(0));
    assert_eq!(diagnostics.is_drawable_visible(0), Ok(false));
    assert_eq!(diagnostics.is_drawable_visible(3), Ok(true));
}

#[test]
fn test_after_update() {
    let (mut world, mut scene) = world();
    world.update_viewpoint(Vec3::new(0.5, 0.5, 0.5), &mut scene).unwrap();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.current_cluster(), Some(0));
    assert_eq!(diagnostics.current_leaf(), Some(0));
    assert_eq!(diagnostics.num_visible_clusters(), 3);
    assert_eq!(diagnostics.num_visible_leaves(), 6);
    assert_eq!(diagnostics.ref_count_of(1), Ok(2));
    assert_eq!(diagnostics.is_drawable_visible(2), Ok(true));
    assert_eq!(diagnostics.stats().transitions, 1);
    assert_eq!(diagnostics.stats().drawables_shown, 3);
}

#[test]
fn test_drawable_lookups_reject_bad_index() {
    let (world, scene) = world();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.ref_count_of(4), Err(Error::InvalidDrawable(4)));
    assert_eq!(diagnostics.is_drawable_visible(9), Err(Error::InvalidDrawable(9)));
    let handle = diagnostics.drawable_handle(2).unwrap();
    assert_eq!(scene.object(handle).unwrap().name(), "C");
}

// ============================================================================
// PVS queries
// ============================================================================

#[test]
fn test_cluster_visibility_is_directed() {
    let (world, _) = world();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.is_cluster_visible_from(0, 3), Ok(true));
    assert_eq!(diagnostics.is_cluster_visible_from(3, 0), Ok(false));
    assert_eq!(diagnostics.is_cluster_visible_from(2, 2), Ok(true));
    assert_eq!(diagnostics.pvs_row(3).unwrap().len(), 2);
}

#[test]
fn test_no_cluster_is_never_visible() {
    let (world, _) = world();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.is_cluster_visible_from(NO_CLUSTER, 0), Ok(false));
    assert_eq!(diagnostics.is_cluster_visible_from(0, NO_CLUSTER), Ok(false));
    assert_eq!(diagnostics.is_cluster_visible_from(NO_CLUSTER, 9), Ok(false));
}

#[test]
fn test_out_of_range_cluster_queries_fail() {
    let (world, _) = world();
    let diagnostics = world.diagnostics();

    assert_eq!(diagnostics.is_cluster_visible_from(4, 0), Err(Error::InvalidCluster(4)));
    assert_eq!(diagnostics.is_cluster_visible_from(0, 4), Err(Error::InvalidCluster(4)));
    assert!(diagnostics.pvs_row(-3).is_err());
    assert!(diagnostics.drawables_in_cluster(4).is_err());
}

#[test]
fn test_leaf_visibility() {
    let (world, _) = world();
    let diagnostics = world.diagnostics();

    // Leaf 0 is in cluster 0, leaf 7 in cluster 3
    assert_eq!(diagnostics.is_leaf_visible(0, 7), Ok(true));
    assert_eq!(diagnostics.is_leaf_visible(7, 0), Ok(false));
    assert_eq!(diagnostics.is_leaf_visible(0, 8), Err(Error::InvalidLeaf(8)));
}

// ============================================================================
// Override
// ============================================================================

#[test]
fn test_force_enable_all_then_restore() {
    let (mut world, mut scene) = world();
    world.update_viewpoint(Vec3::new(0.5, 0.5, 0.5), &mut scene).unwrap();

    world.force_enable_all(false, &mut scene);
    assert!(scene.objects().all(|(_, o)| !o.is_visible()));
    assert_eq!(world.diagnostics().ref_count_of(1), Ok(2));

    world.force_enable_all(true, &mut scene);
    assert!(scene.objects().all(|(_, o)| o.is_visible()));

    // Cluster 3 sees 2 and 3: only C remains
    world.update_viewpoint(Vec3::new(6.5, 0.5, 0.5), &mut scene).unwrap();
    let diagnostics = world.diagnostics();
    let visible: Vec<bool> = (0..4).map(|i| diagnostics.is_drawable_visible(i).unwrap()).collect();
    assert_eq!(visible, vec![false, false, true, true]);
    for i in 0..4 {
        let handle = diagnostics.drawable_handle(i).unwrap();
        assert_eq!(scene.is_visible(handle), visible[i]);
    }
}

// ============================================================================
// Error logging
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

#[test]
#[serial]
fn test_rejected_queries_are_logged_once() {
    let (world, _) = world();
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });

    let diagnostics = world.diagnostics();
    let results = [
        diagnostics.ref_count_of(99).map(|_| ()),
        diagnostics.drawables_in_cluster(77).map(|_| ()),
        diagnostics.is_leaf_visible(0, 55).map(|_| ()),
        diagnostics.pvs_row(66).map(|_| ()),
        diagnostics.is_cluster_visible_from(0, 44).map(|_| ()),
    ];

    Engine::reset_logger();

    assert_eq!(
        results,
        [
            Err(Error::InvalidDrawable(99)),
            Err(Error::InvalidCluster(77)),
            Err(Error::InvalidLeaf(55)),
            Err(Error::InvalidCluster(66)),
            Err(Error::InvalidCluster(44)),
        ]
    );

    let entries = entries.lock().unwrap();
    let logged = |source: &str, message: &str| {
        entries
            .iter()
            .filter(|e| e.severity == LogSeverity::Error && e.source == source && e.message == message)
            .count()
    };
    assert_eq!(logged("galaxy3d::OcclusionController", "Invalid drawable index: 99"), 1);
    assert_eq!(logged("galaxy3d::ClusterObjectIndex", "Invalid cluster id: 77"), 1);
    assert_eq!(logged("galaxy3d::OcclusionDiagnostics", "Invalid leaf id: 55"), 1);
    assert_eq!(logged("galaxy3d::PvsCache", "Invalid cluster id: 66"), 1);
    assert_eq!(logged("galaxy3d::OcclusionDiagnostics", "Invalid cluster id: 44"), 1);
}
