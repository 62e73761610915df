//! Configuration for the visibility subsystem
//!
//! Plain values supplied by the surrounding settings system. Every struct
//! has a `Default` and a `validate()` that rejects values which cannot
//! produce a working structure.

use glam::Vec3;
use crate::engine_config_err;
use crate::error::Result;

/// Octree construction parameters (fixed for the tree's lifetime)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeConfig {
    /// Center of the root cube
    pub center: Vec3,
    /// Edge length of the root cube
    pub size: f32,
    /// Maximum node depth (root = 0)
    pub max_depth: u32,
    /// Leaf capacity before subdivision
    pub max_objects_per_node: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: 1000.0,
            max_depth: 8,
            max_objects_per_node: 10,
        }
    }
}

impl OctreeConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() {
            return Err(engine_config_err!("galaxy3d::Octree", "Root center {:?} is not finite", self.center));
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(engine_config_err!("galaxy3d::Octree", "Root size must be positive and finite, got {}", self.size));
        }
        if self.max_objects_per_node == 0 {
            return Err(engine_config_err!("galaxy3d::Octree", "max_objects_per_node must be at least 1"));
        }
        Ok(())
    }
}

/// Global LOD parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodSettings {
    /// Distance multiplier offset: `adjusted = distance * (1 + lod_bias)`.
    /// Positive values switch to coarser levels sooner.
    pub lod_bias: f32,
    /// Objects whose adjusted distance exceeds this are culled.
    pub max_render_distance: f32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            lod_bias: 0.0,
            max_render_distance: 1000.0,
        }
    }
}

impl LodSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.lod_bias.is_finite() && self.lod_bias > -1.0) {
            return Err(engine_config_err!("galaxy3d::LodSystem", "lod_bias must be finite and > -1, got {}", self.lod_bias));
        }
        // +inf is allowed: no distance cull
        if !(self.max_render_distance > 0.0) {
            return Err(engine_config_err!(
                "galaxy3d::LodSystem",
                "max_render_distance must be positive, got {}",
                self.max_render_distance
            ));
        }
        Ok(())
    }
}

/// Top-level configuration for a Scene + VisibilityPipeline pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibilityConfig {
    /// Spatial index parameters; `None` disables the index and culling
    /// falls back to per-object frustum tests.
    pub octree: Option<OctreeConfig>,
    /// LOD parameters
    pub lod: LodSettings,
}

impl VisibilityConfig {
    /// Configuration with the default octree enabled.
    pub fn with_default_octree() -> Self {
        Self {
            octree: Some(OctreeConfig::default()),
            lod: LodSettings::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(octree) = &self.octree {
            octree.validate()?;
        }
        self.lod.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
