/// Tests for SceneGraph
///
/// Hierarchy validation, static inheritance, bounds, and the DrawableHost impl.

use super::*;
use crate::error::Error;
use glam::{Mat4, Vec3};

fn unit_box() -> AABB {
    AABB { min: Vec3::splat(-0.5), max: Vec3::splat(0.5) }
}

#[test]
fn test_new_is_empty() {
    let scene = SceneGraph::new();
    assert!(scene.is_empty());
    assert_eq!(scene.len(), 0);
    assert_eq!(scene.visibility_changes(), 0);
}

#[test]
fn test_add_object_starts_visible() {
    let mut scene = SceneGraph::new();
    let key = scene.add_object(SceneObjectDesc::renderable("crate", unit_box())).unwrap();
    assert!(scene.is_visible(key));
    assert_eq!(scene.object(key).unwrap().name(), "crate");
}

#[test]
fn test_add_object_with_unknown_parent_fails() {
    let mut other = SceneGraph::new();
    let foreign = other.add_object(SceneObjectDesc::container("root", ObjectFlags::STATIC)).unwrap();

    let mut scene = SceneGraph::new();
    let result = scene.add_object(SceneObjectDesc::renderable("child", unit_box()).with_parent(foreign));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_static_inherited_from_ancestor() {
    let mut scene = SceneGraph::new();
    let root = scene.add_object(SceneObjectDesc::container("world", ObjectFlags::STATIC)).unwrap();
    let group = scene
        .add_object(SceneObjectDesc::container("props", ObjectFlags::empty()).with_parent(root))
        .unwrap();
    let prop = scene
        .add_object(SceneObjectDesc::renderable("barrel", unit_box()).with_parent(group))
        .unwrap();
    let loose = scene.add_object(SceneObjectDesc::renderable("debris", unit_box())).unwrap();

    assert!(scene.is_static_in_hierarchy(prop));
    assert!(scene.is_static_in_hierarchy(group));
    assert!(!scene.is_static_in_hierarchy(loose));
}

#[test]
fn test_world_bounds_use_world_matrix() {
    let mut scene = SceneGraph::new();
    let mut desc = SceneObjectDesc::renderable("moved", unit_box());
    desc.world_matrix = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
    let key = scene.add_object(desc).unwrap();

    let bounds = scene.object(key).unwrap().world_bounds().unwrap();
    assert_eq!(bounds.min, Vec3::new(9.5, -0.5, -0.5));
    assert_eq!(bounds.max, Vec3::new(10.5, 0.5, 0.5));
}

#[test]
fn test_container_has_no_bounds() {
    let mut scene = SceneGraph::new();
    let key = scene.add_object(SceneObjectDesc::container("group", ObjectFlags::STATIC)).unwrap();
    assert!(scene.object(key).unwrap().world_bounds().is_none());
}

#[test]
fn test_drawable_host_sets_visibility() {
    let mut scene = SceneGraph::new();
    let key = scene.add_object(SceneObjectDesc::static_renderable("wall", unit_box())).unwrap();

    scene.set_drawable_visible(key, false);
    assert!(!scene.is_visible(key));
    scene.set_drawable_visible(key, true);
    assert!(scene.is_visible(key));
    assert_eq!(scene.visibility_changes(), 2);
}
