//! Per-frame visibility driver
//!
//! Runs the frame stages in their fixed order: frustum update and cull
//! (inside the culler), then LOD resolution over the surviving objects.

use crate::camera::{Camera, RenderView};
use crate::config::VisibilityConfig;
use crate::engine_trace;
use crate::error::Result;
use crate::lod::LodSystem;
use crate::scene::{CameraCuller, FrustumCuller, Scene};

/// Culling strategy plus LOD system, producing one RenderView per frame.
pub struct VisibilityPipeline {
    culler: Box<dyn CameraCuller>,
    lod_system: LodSystem,
}

impl Default for VisibilityPipeline {
    fn default() -> Self {
        Self::new(Box::new(FrustumCuller::new()), LodSystem::new())
    }
}

impl VisibilityPipeline {
    pub fn new(culler: Box<dyn CameraCuller>, lod_system: LodSystem) -> Self {
        Self { culler, lod_system }
    }

    /// FrustumCuller plus a LodSystem using the configured LOD settings.
    pub fn from_config(config: &VisibilityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            Box::new(FrustumCuller::new()),
            LodSystem::with_settings(config.lod)?,
        ))
    }

    /// Replace the culling strategy.
    pub fn set_culler(&mut self, culler: Box<dyn CameraCuller>) {
        self.culler = culler;
    }

    pub fn lod_system(&self) -> &LodSystem {
        &self.lod_system
    }

    pub fn lod_system_mut(&mut self) -> &mut LodSystem {
        &mut self.lod_system
    }

    /// Cull the scene for `camera` and resolve LODs of the visible objects.
    pub fn prepare_frame(&mut self, scene: &Scene, camera: &Camera) -> RenderView {
        let mut view = self.culler.cull(scene, camera);
        view.resolve_lods(scene, &mut self.lod_system);
        engine_trace!(
            "galaxy3d::Visibility",
            "Frame prepared: {} objects, {} visible, {} drawn, {} beyond render distance",
            scene.object_count(), view.visible_count(), view.draw_items().len(), view.lod_culled_count()
        );
        view
    }
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
