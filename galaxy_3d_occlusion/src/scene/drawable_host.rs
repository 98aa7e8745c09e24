/// Sink for shown/hidden changes decided by the occlusion core.
///
/// The core only calls this on a ref count crossing (0→1 shows, 1→0
/// hides) or from the diagnostic override; implementations can forward
/// to a renderer's per-instance visibility flag without deduplicating.

use super::scene_graph::SceneObjectKey;

/// Receives visibility changes for drawables.
pub trait DrawableHost {
    /// Show or hide the drawable behind `handle`.
    fn set_drawable_visible(&mut self, handle: SceneObjectKey, visible: bool);
}
