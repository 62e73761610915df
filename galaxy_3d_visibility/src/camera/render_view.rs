/// RenderView: result of one frame's visibility pass.
///
/// Created by a CameraCuller. Holds a snapshot of the camera at culling
/// time and the keys of objects that survived culling. After LOD
/// resolution it also holds the draw list handed to the renderer.
///
/// Ephemeral: lives for one frame. No Arc, no Mutex.

use crate::lod::{LodLevel, LodSystem};
use crate::scene::{ModelKey, ObjectKey, Scene};
use super::camera::Camera;

/// One object to draw, with the model chosen for its detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub object: ObjectKey,
    pub model: ModelKey,
    pub lod: LodLevel,
}

/// Result of culling plus LOD resolution for one camera.
#[derive(Debug, Clone)]
pub struct RenderView {
    camera: Camera,
    visible_objects: Vec<ObjectKey>,
    draw_items: Vec<DrawItem>,
    /// Visible objects dropped by the LOD distance cull
    lod_culled: usize,
}

impl RenderView {
    /// Create a new RenderView (crate-internal: cullers create these).
    pub(crate) fn new(camera: Camera, visible_objects: Vec<ObjectKey>) -> Self {
        Self {
            camera,
            visible_objects,
            draw_items: Vec::new(),
            lod_culled: 0,
        }
    }

    /// Camera snapshot at the time of culling.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Keys of objects that passed frustum culling.
    pub fn visible_objects(&self) -> &[ObjectKey] {
        &self.visible_objects
    }

    pub fn visible_count(&self) -> usize {
        self.visible_objects.len()
    }

    /// Draw list, filled by `resolve_lods`.
    pub fn draw_items(&self) -> &[DrawItem] {
        &self.draw_items
    }

    /// Visible objects beyond the LOD render distance.
    pub fn lod_culled_count(&self) -> usize {
        self.lod_culled
    }

    /// Pick a detail level and model for every visible object.
    ///
    /// Distance is measured from the camera snapshot to the object's
    /// reference point; the object's own bias overrides the global one.
    /// Objects resolving to `Culled` are left out of the draw list. Keys
    /// no longer present in the scene are skipped.
    pub fn resolve_lods(&mut self, scene: &Scene, lod_system: &mut LodSystem) {
        let camera_pos = self.camera.position();
        self.draw_items.clear();
        self.lod_culled = 0;

        for &key in &self.visible_objects {
            let Some(object) = scene.object(key) else {
                continue;
            };
            let selection = lod_system.select(
                object.model(),
                camera_pos,
                object.position(),
                object.lod_bias(),
            );
            match selection.model {
                Some(model) => self.draw_items.push(DrawItem {
                    object: key,
                    model,
                    lod: selection.level,
                }),
                None => self.lod_culled += 1,
            }
        }
    }
}

#[cfg(test)]
#[path = "render_view_tests.rs"]
mod tests;
