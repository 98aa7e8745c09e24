//! Scene module
//!
//! The drawable side of occlusion culling: scene objects with stable
//! keys, and the sink through which the culling core shows and hides
//! them.

mod drawable_host;
mod scene_graph;

pub use drawable_host::DrawableHost;
pub use scene_graph::{SceneGraph, SceneObject, SceneObjectDesc, SceneObjectKey, ObjectFlags};
