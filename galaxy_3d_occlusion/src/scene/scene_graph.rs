/// SceneGraph: the objects of a loaded level.
///
/// Uses a SlotMap for stable keys. Each object may have a parent, which
/// is how static containers pass culling eligibility down to children
/// that are not flagged static themselves.

use bitflags::bitflags;
use glam::Mat4;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_bail;
use crate::map::AABB;
use super::drawable_host::DrawableHost;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a SceneObject within a SceneGraph.
    ///
    /// This is the opaque drawable handle stored by the occlusion core.
    pub struct SceneObjectKey;
}

// ===== FLAGS =====

bitflags! {
    /// Per-object flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u32 {
        /// Object never moves after load (subtree is culling-eligible)
        const STATIC     = 1 << 0;
        /// Object has something to draw
        const RENDERABLE = 1 << 1;
    }
}

/// Creation parameters for a SceneObject
#[derive(Debug, Clone)]
pub struct SceneObjectDesc {
    pub name: String,
    pub parent: Option<SceneObjectKey>,
    pub flags: ObjectFlags,
    /// Bounds in local space (`None` for pure containers)
    pub local_bounds: Option<AABB>,
    /// Local-to-world transform
    pub world_matrix: Mat4,
}

impl SceneObjectDesc {
    /// Renderable object with the given world-space bounds.
    pub fn renderable(name: &str, world_bounds: AABB) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            flags: ObjectFlags::RENDERABLE,
            local_bounds: Some(world_bounds),
            world_matrix: Mat4::IDENTITY,
        }
    }

    /// Static renderable object with the given world-space bounds.
    pub fn static_renderable(name: &str, world_bounds: AABB) -> Self {
        Self::renderable(name, world_bounds).with_flags(ObjectFlags::STATIC | ObjectFlags::RENDERABLE)
    }

    /// Non-renderable grouping node.
    pub fn container(name: &str, flags: ObjectFlags) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            flags,
            local_bounds: None,
            world_matrix: Mat4::IDENTITY,
        }
    }

    pub fn with_parent(mut self, parent: SceneObjectKey) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A single object of the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    parent: Option<SceneObjectKey>,
    flags: ObjectFlags,
    local_bounds: Option<AABB>,
    world_matrix: Mat4,
    visible: bool,
}

impl SceneObject {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<SceneObjectKey> {
        self.parent
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// World-space bounds (`None` for objects without bounds).
    pub fn world_bounds(&self) -> Option<AABB> {
        self.local_bounds.map(|b| b.transformed(&self.world_matrix))
    }
}

/// Level objects plus their current shown/hidden state.
pub struct SceneGraph {
    objects: SlotMap<SceneObjectKey, SceneObject>,
    /// Number of shown/hidden flips applied through DrawableHost
    visibility_changes: u64,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            visibility_changes: 0,
        }
    }

    /// Add an object. New objects start visible.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the parent key is not in this graph.
    pub fn add_object(&mut self, desc: SceneObjectDesc) -> Result<SceneObjectKey> {
        if let Some(parent) = desc.parent {
            if !self.objects.contains_key(parent) {
                engine_bail!("galaxy3d::SceneGraph", "Parent of '{}' is not in the scene", desc.name);
            }
        }

        Ok(self.objects.insert(SceneObject {
            name: desc.name,
            parent: desc.parent,
            flags: desc.flags,
            local_bounds: desc.local_bounds,
            world_matrix: desc.world_matrix,
            visible: true,
        }))
    }

    pub fn object(&self, key: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Iterate over all objects in insertion order (when nothing was removed).
    pub fn objects(&self) -> impl Iterator<Item = (SceneObjectKey, &SceneObject)> + '_ {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether the object or any ancestor is flagged static.
    pub fn is_static_in_hierarchy(&self, key: SceneObjectKey) -> bool {
        let mut current = Some(key);
        // Parents are validated on insert, so the chain is finite
        while let Some(k) = current {
            match self.objects.get(k) {
                Some(object) if object.flags.contains(ObjectFlags::STATIC) => return true,
                Some(object) => current = object.parent,
                None => return false,
            }
        }
        false
    }

    /// Shown/hidden state of an object (`false` for unknown keys).
    pub fn is_visible(&self, key: SceneObjectKey) -> bool {
        self.objects.get(key).is_some_and(|o| o.visible)
    }

    /// Count of visibility flips received since creation.
    pub fn visibility_changes(&self) -> u64 {
        self.visibility_changes
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawableHost for SceneGraph {
    fn set_drawable_visible(&mut self, handle: SceneObjectKey, visible: bool) {
        if let Some(object) = self.objects.get_mut(handle) {
            object.visible = visible;
            self.visibility_changes += 1;
        }
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
