//! Error types for the Galaxy3D visibility subsystem
//!
//! Every error in this crate is recoverable by the caller. The worst outcome
//! of any error path is reduced culling efficiency (more geometry drawn),
//! never missing geometry.

use std::fmt;

/// Result type for Galaxy3D visibility operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D visibility errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input rejected by an operation (object without usable AABB,
    /// object outside the octree bounds, malformed LOD thresholds)
    InvalidInput(String),

    /// Configuration values that cannot produce a working structure
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message (with file:line) and build an `Error::InvalidInput`
///
/// # Example
///
/// ```ignore
/// let aabb = objects.world_aabb(key)
///     .ok_or_else(|| engine_err!("galaxy3d::Octree", "Object {:?} has no AABB", key))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidInput(message)
    }};
}

/// Log an ERROR message (with file:line) and build an `Error::InvalidConfig`
#[macro_export]
macro_rules! engine_config_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidConfig(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
