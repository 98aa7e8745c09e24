//! PVS occlusion culling core
//!
//! Builds a cluster → drawables index when a scene is loaded, then keeps a
//! visibility ref count per drawable as the viewpoint moves between
//! clusters, telling the host only about 0↔1 crossings.

mod cluster_object_index;
mod config;
mod culling_world;
mod diagnostics;
mod drawable_record;
mod occlusion_controller;
mod occlusion_manager;
mod pvs_cache;

pub use cluster_object_index::ClusterObjectIndex;
pub use config::CullingConfig;
pub use culling_world::CullingWorld;
pub use diagnostics::OcclusionDiagnostics;
pub use drawable_record::{DrawableIndex, DrawableRecord};
pub use occlusion_controller::{OcclusionController, OcclusionStats, ViewpointSource, ViewpointUpdate};
pub use occlusion_manager::OcclusionManager;
pub use pvs_cache::PvsCache;
