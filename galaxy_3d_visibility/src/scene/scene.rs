/// Scene: the set of objects the visibility subsystem culls.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. When a spatial
/// index is enabled, every mutation that changes an object's world bounds
/// is forwarded to the Octree immediately, so the index is always in sync
/// between frames.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use glam::Mat4;
use crate::config::{OctreeConfig, VisibilityConfig};
use crate::error::Result;
use crate::{engine_debug, engine_warn};
use super::object::{ModelKey, ObjectKey, ObjectSource, SceneObject, AABB};
use super::octree::Octree;
use super::scene_index::SpatialIndex;

const SOURCE: &str = "galaxy3d::Scene";

/// A collection of SceneObjects with an optional Octree.
///
/// Objects the Octree refuses (no usable AABB, or outside the root bounds)
/// are tracked in an "unindexed" set: they cannot be culled and are always
/// handed to the LOD stage when active.
pub struct Scene {
    /// Objects stored in a slot map for O(1) insert/remove
    objects: SlotMap<ObjectKey, SceneObject>,
    /// Spatial index (`None` = per-object frustum tests)
    index: Option<Octree>,
    /// Objects refused by the index
    unindexed: FxHashSet<ObjectKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene without spatial index.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            index: None,
            unindexed: FxHashSet::default(),
        }
    }

    /// Create an empty scene indexed by an Octree.
    pub fn with_octree(config: &OctreeConfig) -> Result<Self> {
        let mut scene = Self::new();
        scene.index = Some(Octree::from_config(*config)?);
        Ok(scene)
    }

    /// Create a scene from the visibility configuration.
    pub fn from_config(config: &VisibilityConfig) -> Result<Self> {
        config.validate()?;
        match &config.octree {
            Some(octree) => Self::with_octree(octree),
            None => Ok(Self::new()),
        }
    }

    // ===== OBJECTS =====

    /// Add an object and index it.
    ///
    /// Always succeeds: if the index refuses the object, it is recorded as
    /// always visible.
    pub fn create_object(&mut self, object: SceneObject) -> ObjectKey {
        let key = self.objects.insert(object);
        self.reindex(key);
        key
    }

    /// Remove an object. Returns the object, or `None` if the key is invalid.
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<SceneObject> {
        let object = self.objects.remove(key)?;
        if let Some(index) = &mut self.index {
            index.remove(key);
        }
        self.unindexed.remove(&key);
        Some(object)
    }

    /// Get an object by key
    pub fn object(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Iterate over all objects (key, object)
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    /// Get the number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Set the world matrix of an object. Returns false if key is invalid.
    pub fn set_world_matrix(&mut self, key: ObjectKey, matrix: Mat4) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            return false;
        };
        object.set_world_matrix(matrix);
        self.reindex(key);
        true
    }

    /// Replace the local bounds of an object. Returns false if key is invalid.
    pub fn set_local_bounds(&mut self, key: ObjectKey, bounds: Option<AABB>) -> bool {
        let Some(object) = self.objects.get_mut(key) else {
            return false;
        };
        object.set_local_bounds(bounds);
        self.reindex(key);
        true
    }

    /// Toggle whether an object takes part in rendering.
    ///
    /// Inactive objects stay indexed; queries filter them out.
    pub fn set_active(&mut self, key: ObjectKey, active: bool) -> bool {
        match self.objects.get_mut(key) {
            Some(object) => {
                object.set_active(active);
                true
            }
            None => false,
        }
    }

    /// Change the model drawn at LOD0. Returns false if key is invalid.
    pub fn set_model(&mut self, key: ObjectKey, model: ModelKey) -> bool {
        match self.objects.get_mut(key) {
            Some(object) => {
                object.set_model(model);
                true
            }
            None => false,
        }
    }

    /// Set or clear the per-object LOD bias. Returns false if key is invalid.
    pub fn set_lod_bias(&mut self, key: ObjectKey, lod_bias: Option<f32>) -> bool {
        match self.objects.get_mut(key) {
            Some(object) => {
                object.set_lod_bias(lod_bias);
                true
            }
            None => false,
        }
    }

    // ===== SPATIAL INDEX =====

    /// Whether an Octree is attached.
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    pub fn octree(&self) -> Option<&Octree> {
        self.index.as_ref()
    }

    /// The index as a trait object, for cullers.
    pub fn spatial_index(&self) -> Option<&dyn SpatialIndex> {
        self.index.as_ref().map(|octree| octree as &dyn SpatialIndex)
    }

    /// Objects the index refused, always drawn when active.
    ///
    /// Empty when no index is attached.
    pub fn unindexed_objects(&self) -> &FxHashSet<ObjectKey> {
        &self.unindexed
    }

    /// Attach a new Octree and index every existing object.
    pub fn enable_index(&mut self, config: &OctreeConfig) -> Result<()> {
        self.index = Some(Octree::from_config(*config)?);
        self.rebuild_index();
        Ok(())
    }

    /// Drop the Octree. Culling falls back to per-object frustum tests.
    pub fn disable_index(&mut self) {
        if self.index.take().is_some() {
            engine_debug!(SOURCE, "Spatial index disabled ({} objects)", self.objects.len());
        }
        self.unindexed.clear();
    }

    /// Clear the Octree and re-insert every object.
    pub fn rebuild_index(&mut self) {
        let Some(index) = &mut self.index else {
            return;
        };
        let keys: Vec<ObjectKey> = self.objects.keys().collect();
        self.unindexed = index.rebuild(keys, &self.objects).into_iter().collect();
        if !self.unindexed.is_empty() {
            engine_warn!(
                SOURCE,
                "{} objects cannot be indexed and will always be drawn",
                self.unindexed.len()
            );
        }
    }

    /// Bring the index entry of one object in line with its current bounds.
    fn reindex(&mut self, key: ObjectKey) {
        let Some(index) = &mut self.index else {
            return;
        };
        match index.update(key, &self.objects) {
            Ok(()) => {
                self.unindexed.remove(&key);
            }
            Err(_) => {
                self.unindexed.insert(key);
            }
        }
    }
}

impl ObjectSource for Scene {
    fn world_aabb(&self, key: ObjectKey) -> Option<AABB> {
        self.objects.world_aabb(key)
    }

    fn is_active(&self, key: ObjectKey) -> bool {
        self.objects.is_active(key)
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
