use super::*;
use crate::scene::SceneObjectKey;

fn culled_record() -> DrawableRecord {
    DrawableRecord::new(SceneObjectKey::default(), false, true)
}

#[test]
fn test_projection() {
    assert!(!DrawableRecord::projected_visibility(0));
    assert!(DrawableRecord::projected_visibility(1));
    assert!(DrawableRecord::projected_visibility(3));
    assert!(!DrawableRecord::projected_visibility(-1));
}

#[test]
fn test_only_zero_one_crossings_report() {
    let mut record = culled_record();
    assert_eq!(record.increment(), Crossing::Shown);
    assert_eq!(record.increment(), Crossing::None);
    assert_eq!(record.increment(), Crossing::None);
    assert!(record.is_visible());
    assert_eq!(record.ref_count(), 3);

    assert_eq!(record.decrement(), Crossing::None);
    assert_eq!(record.decrement(), Crossing::None);
    assert!(record.is_visible());
    assert_eq!(record.decrement(), Crossing::Hidden);
    assert!(!record.is_visible());
}

#[test]
fn test_negative_is_reported_not_clamped() {
    let mut record = culled_record();
    assert_eq!(record.decrement(), Crossing::Negative);
    assert_eq!(record.ref_count(), -1);
    assert!(!record.is_visible());
}

#[test]
fn test_override_and_resync() {
    let mut record = culled_record();
    record.increment();
    record.set_visible(false);
    assert!(!record.is_in_sync());
    assert_eq!(record.ref_count(), 1);

    assert_eq!(record.resync(), Some(true));
    assert!(record.is_in_sync());
    assert_eq!(record.resync(), None);
}

#[test]
fn test_unculled_drawable_expected_shown() {
    let mut record = DrawableRecord::new(SceneObjectKey::default(), true, false);
    assert!(record.expected_visibility());
    record.set_visible(false);
    assert_eq!(record.resync(), Some(true));
}
