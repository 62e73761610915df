//! Level of detail module
//!
//! Distance-based discrete LOD: per-model level tables and the system that
//! resolves them every frame.

mod lod_data;
mod lod_system;

pub use lod_data::{LodData, LodLevel, LOD_CULLED};
pub use lod_system::{LodSelection, LodStats, LodSystem};
