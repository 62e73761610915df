/// Camera culling strategies.
///
/// A CameraCuller determines which objects are visible from a given
/// camera. Implementations range from brute-force (return all) to
/// spatial queries through the scene's index.

use crate::camera::{Camera, Frustum, RenderView};
use super::object::ObjectKey;
use super::scene::Scene;

/// Strategy for determining visible objects from a camera.
///
/// Called once per frame before LOD resolution. The returned RenderView
/// is ephemeral.
///
/// `&mut self` allows stateful implementations (e.g. a frustum reused
/// across frames).
pub trait CameraCuller {
    /// Cull the scene against the camera and return visible objects.
    fn cull(&mut self, scene: &Scene, camera: &Camera) -> RenderView;
}

/// Brute-force culler: returns every active object (no actual culling).
///
/// Suitable for small scenes or as a baseline for comparison.
/// Ignores the spatial index entirely.
#[derive(Debug, Default)]
pub struct BruteForceCuller;

impl BruteForceCuller {
    pub fn new() -> Self {
        Self
    }
}

impl CameraCuller for BruteForceCuller {
    fn cull(&mut self, scene: &Scene, camera: &Camera) -> RenderView {
        let visible: Vec<ObjectKey> = scene.objects()
            .filter(|(_, object)| object.is_active())
            .map(|(key, _)| key)
            .collect();
        RenderView::new(*camera, visible)
    }
}

/// Frustum culler: tests object AABBs against the camera frustum.
///
/// With a spatial index: node-level query, plus every active object the
/// index refused. Without: per-object frustum test on all objects
/// (objects without bounds are always kept).
#[derive(Debug, Default)]
pub struct FrustumCuller {
    frustum: Frustum,
}

impl FrustumCuller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frustum used by the last `cull` call.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }
}

impl CameraCuller for FrustumCuller {
    fn cull(&mut self, scene: &Scene, camera: &Camera) -> RenderView {
        self.frustum.update_from_camera_pose(camera);
        let frustum = &self.frustum;

        let visible = match scene.spatial_index() {
            Some(index) => {
                let mut results = Vec::new();
                index.query_frustum(frustum, scene, &mut results);
                results.extend(scene.unindexed_objects().iter().copied().filter(|&key| {
                    scene.object(key).is_some_and(|object| object.is_active())
                }));
                results
            }
            None => {
                scene.objects()
                    .filter(|(_, object)| object.is_active())
                    .filter_map(|(key, object)| match object.world_aabb() {
                        Some(world_aabb) if !frustum.is_visible(&world_aabb) => None,
                        _ => Some(key),
                    })
                    .collect()
            }
        };

        RenderView::new(*camera, visible)
    }
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
