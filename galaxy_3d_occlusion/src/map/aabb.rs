/// Axis-aligned bounding boxes shared by the map and scene sides.

use glam::{Vec3, Mat4};

/// Axis-Aligned Bounding Box
///
/// Scene objects store theirs in local space and transform it by their
/// world matrix; BSP nodes and leaves store theirs in map space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Build a box from two arbitrary corners (components are re-sorted).
    pub fn from_corners(a: Vec3, b: Vec3) -> AABB {
        AABB { min: a.min(b), max: a.max(b) }
    }

    /// Degenerate box around a single point.
    pub fn from_point(point: Vec3) -> AABB {
        AABB { min: point, max: point }
    }

    /// Transform this local-space AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// Grow the box by `epsilon` on every side.
    ///
    /// Object bounds are padded before leaf queries so that a face lying
    /// exactly on a cell boundary still registers in both cells.
    pub fn expanded(&self, epsilon: f32) -> AABB {
        let pad = Vec3::splat(epsilon);
        AABB { min: self.min - pad, max: self.max + pad }
    }

    /// Center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains(&AABB::from_point(point))
    }

    /// Test if this AABB intersects (overlaps) another AABB.
    ///
    /// Returns `true` if the two AABBs overlap or touch.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
