/*!
# Galaxy 3D Occlusion

PVS-based occlusion culling for static level geometry.

A compiled map partitions space into leaves grouped into visibility
clusters, and stores for every cluster the set of clusters potentially
visible from it (PVS). This crate indexes the static drawables of a scene
by cluster when the scene is loaded, then keeps each drawable shown only
while at least one cluster containing it is visible from the viewpoint.

## Architecture

- **SpatialIndex**: point → leaf, box → leaves, leaf → cluster (e.g. `BspTree`)
- **VisibilityTable**: cluster → PVS row (e.g. `VisibilityLump`)
- **ClusterObjectIndex**: cluster → drawables, built at load
- **OcclusionController**: per-drawable ref counts, diffed on cluster transitions
- **OcclusionDiagnostics**: read-only counts and PVS queries
- **OcclusionManager**: owns the culling world of the loaded scene

Drawables are shown/hidden through the `DrawableHost` trait, implemented
by `SceneGraph`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod map;
pub mod occlusion;
pub mod scene;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Occlusion entry point
    pub use crate::occlusion::OcclusionManager;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Map geometry sub-module
    pub mod map {
        pub use crate::map::*;
    }

    // Occlusion sub-module
    pub mod occlusion {
        pub use crate::occlusion::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
