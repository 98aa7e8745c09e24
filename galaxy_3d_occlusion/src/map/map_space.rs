/// Coordinate convention between engine world space and map space.
///
/// Engine world space is Y-up. BSP maps compiled by Source-family tools
/// are Z-up and measured in map units (inches), so every query into the
/// tree converts first.

use glam::Vec3;
use super::aabb::AABB;

/// Convention used by a map's tree and leaf bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapSpace {
    /// Map space equals world space.
    Identity,
    /// Z-up map; `unit_scale` world units per map unit.
    ///
    /// world `(x, y, z)` -> map `(z, -x, y) / unit_scale`
    SourceZUp { unit_scale: f32 },
}

impl Default for MapSpace {
    fn default() -> Self {
        MapSpace::Identity
    }
}

impl MapSpace {
    /// Convert a world-space point to map space.
    pub fn world_to_map(&self, point: Vec3) -> Vec3 {
        match *self {
            MapSpace::Identity => point,
            MapSpace::SourceZUp { unit_scale } => {
                let v = point / unit_scale;
                Vec3::new(v.z, -v.x, v.y)
            }
        }
    }

    /// Convert a map-space point to world space.
    pub fn map_to_world(&self, point: Vec3) -> Vec3 {
        match *self {
            MapSpace::Identity => point,
            MapSpace::SourceZUp { unit_scale } => {
                Vec3::new(-point.y, point.z, point.x) * unit_scale
            }
        }
    }

    /// Convert a world-space box to map space (corners re-sorted after the axis flip).
    pub fn world_to_map_aabb(&self, aabb: &AABB) -> AABB {
        AABB::from_corners(self.world_to_map(aabb.min), self.world_to_map(aabb.max))
    }

    /// Convert a map-space box to world space.
    pub fn map_to_world_aabb(&self, aabb: &AABB) -> AABB {
        AABB::from_corners(self.map_to_world(aabb.min), self.map_to_world(aabb.max))
    }
}

#[cfg(test)]
#[path = "map_space_tests.rs"]
mod tests;
