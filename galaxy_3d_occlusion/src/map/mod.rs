//! Map geometry module
//!
//! Read-only collaborators consumed by the occlusion core: the leaf
//! partition (SpatialIndex) and the cluster PVS table (VisibilityTable),
//! plus reference implementations for BSP maps.

mod aabb;
mod bsp_tree;
mod map_geometry;
mod map_space;
mod spatial_index;
mod visibility_lump;
mod visibility_table;

pub use aabb::AABB;
pub use bsp_tree::{BspTree, BspNode, BspLeaf, BspChild, BspPlane};
pub use map_geometry::{MapGeometry, ClusterId, LeafId, ClusterSet, NO_CLUSTER};
pub use map_space::MapSpace;
pub use spatial_index::SpatialIndex;
pub use visibility_lump::VisibilityLump;
pub use visibility_table::{VisibilityTable, ExplicitVisibilityTable};
