//! Error types for the Galaxy3D occlusion system
//!
//! This module defines the error types used throughout the crate,
//! including precondition failures (querying before a scene is loaded,
//! out-of-range ids) and malformed map data.

use std::fmt;

/// Result type for Galaxy3D occlusion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D occlusion errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No scene is loaded (query or update issued before `on_scene_loaded`)
    NotLoaded,

    /// Cluster id outside `[0, num_clusters)`
    InvalidCluster(i32),

    /// Leaf id outside the spatial index
    InvalidLeaf(usize),

    /// Drawable index outside the drawable array
    InvalidDrawable(usize),

    /// Visibility data is truncated or inconsistent
    InvalidVisibilityData(String),

    /// Invalid resource (malformed tree descriptors, bad scene object, etc.)
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotLoaded => write!(f, "No scene loaded"),
            Error::InvalidCluster(id) => write!(f, "Invalid cluster id: {}", id),
            Error::InvalidLeaf(id) => write!(f, "Invalid leaf id: {}", id),
            Error::InvalidDrawable(index) => write!(f, "Invalid drawable index: {}", index),
            Error::InvalidVisibilityData(msg) => write!(f, "Invalid visibility data: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Log this error under `source` and hand it back (internal use)
    ///
    /// Lets call sites write `Err(Error::X.logged("galaxy3d::Foo"))` so that
    /// every error leaving the crate has been reported exactly once.
    pub(crate) fn logged(self, source: &str) -> Self {
        crate::engine_error!(source, "{}", self);
        self
    }
}

// ===== ERROR MACROS =====

/// Build an `Error::InvalidResource`, logging it at ERROR level first
///
/// # Example
///
/// ```ignore
/// let leaf = leaves.get(i).ok_or_else(|| engine_err!("galaxy3d::BspTree", "leaf {} missing", i))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidResource(message)
    }};
}

/// Return early with an `Error::InvalidResource`, logging it first
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
