/// Per-drawable reference count and shown/hidden flag.
///
/// The flag is the projection `visible_ref_count > 0`. Drawables outside
/// every cluster cannot be culled and are expected to stay shown. Both
/// fields are only changed together, through `increment` / `decrement`; the
/// diagnostic override is the single exception and is undone by
/// `resync`.

use crate::scene::SceneObjectKey;

/// Index of a drawable in the culling world's drawable array.
pub type DrawableIndex = usize;

/// Outcome of a ref count change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Count moved without crossing zero
    None,
    /// 0 → 1: the drawable must be shown
    Shown,
    /// 1 → 0: the drawable must be hidden
    Hidden,
    /// Count went below zero (mismatched increment/decrement)
    Negative,
}

/// Drawable under the control of the occlusion core.
#[derive(Debug, Clone)]
pub struct DrawableRecord {
    handle: SceneObjectKey,
    visible_ref_count: i32,
    visible: bool,
    under_culling: bool,
}

impl DrawableRecord {
    pub(crate) fn new(handle: SceneObjectKey, visible: bool, under_culling: bool) -> Self {
        Self {
            handle,
            visible_ref_count: 0,
            visible,
            under_culling,
        }
    }

    /// Visibility implied by a ref count.
    pub fn projected_visibility(ref_count: i32) -> bool {
        ref_count > 0
    }

    pub fn handle(&self) -> SceneObjectKey {
        self.handle
    }

    pub fn ref_count(&self) -> i32 {
        self.visible_ref_count
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the drawable intersects at least one cluster.
    pub fn is_under_culling(&self) -> bool {
        self.under_culling
    }

    /// Flag this drawable should have given its count.
    pub fn expected_visibility(&self) -> bool {
        !self.under_culling || Self::projected_visibility(self.visible_ref_count)
    }

    /// Whether the flag matches the expected visibility.
    pub fn is_in_sync(&self) -> bool {
        self.visible == self.expected_visibility()
    }

    pub(crate) fn increment(&mut self) -> Crossing {
        self.visible_ref_count += 1;
        if self.visible_ref_count == 1 {
            self.visible = true;
            Crossing::Shown
        } else {
            Crossing::None
        }
    }

    pub(crate) fn decrement(&mut self) -> Crossing {
        self.visible_ref_count -= 1;
        match self.visible_ref_count {
            0 => {
                self.visible = false;
                Crossing::Hidden
            }
            n if n < 0 => Crossing::Negative,
            _ => Crossing::None,
        }
    }

    /// Overwrite the flag without touching the count.
    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Restore the expected flag. Returns the new flag if it changed.
    pub(crate) fn resync(&mut self) -> Option<bool> {
        if self.is_in_sync() {
            return None;
        }
        self.visible = self.expected_visibility();
        Some(self.visible)
    }
}

#[cfg(test)]
#[path = "drawable_record_tests.rs"]
mod tests;
