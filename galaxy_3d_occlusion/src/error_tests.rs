//! Unit tests for error.rs
//!
//! Tests all Error variants, Display output, and the engine_err!/engine_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_not_loaded_display() {
    let err = Error::NotLoaded;
    assert_eq!(format!("{}", err), "No scene loaded");
}

#[test]
fn test_invalid_cluster_display() {
    let err = Error::InvalidCluster(-1);
    let display = format!("{}", err);
    assert!(display.contains("Invalid cluster id"));
    assert!(display.contains("-1"));
}

#[test]
fn test_invalid_leaf_and_drawable_display() {
    assert_eq!(format!("{}", Error::InvalidLeaf(7)), "Invalid leaf id: 7");
    assert_eq!(format!("{}", Error::InvalidDrawable(12)), "Invalid drawable index: 12");
}

#[test]
fn test_invalid_visibility_data_display() {
    let err = Error::InvalidVisibilityData("lump truncated at byte 9".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid visibility data"));
    assert!(display.contains("byte 9"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("node 3 references missing leaf".to_string());
    assert!(format!("{}", err).contains("missing leaf"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::NotLoaded;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug_and_clone() {
    let err = Error::InvalidCluster(4);
    let cloned = err.clone();
    assert_eq!(err, cloned);
    assert!(format!("{:?}", cloned).contains("InvalidCluster"));
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
fn test_engine_err_builds_invalid_resource() {
    let err = crate::engine_err!("galaxy3d::Test", "bad value {}", 42);
    assert_eq!(err, Error::InvalidResource("bad value 42".to_string()));
}

#[test]
fn test_engine_bail_returns_early() {
    fn fails(flag: bool) -> Result<u32> {
        if flag {
            crate::engine_bail!("galaxy3d::Test", "flag was set");
        }
        Ok(1)
    }

    assert_eq!(fails(false), Ok(1));
    assert_eq!(fails(true), Err(Error::InvalidResource("flag was set".to_string())));
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::NotLoaded)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::NotLoaded));
}
