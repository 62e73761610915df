/// Spatial acceleration structures for scene queries.
///
/// A SpatialIndex indexes objects by their world-space AABB for
/// efficient frustum culling. The Octree is the engine's implementation;
/// the trait is the seam used by FrustumCuller so culling code does not
/// depend on the concrete structure.

use crate::camera::Frustum;
use crate::error::Result;
use super::object::{ObjectKey, ObjectSource};

/// Trait for spatial indexing of scene objects.
///
/// Indexes store keys only. Bounds and active flags are read from the
/// `ObjectSource` passed to each call.
pub trait SpatialIndex {
    /// Insert (or re-insert) an object using its current world AABB.
    ///
    /// Fails with `Error::InvalidInput` if the object cannot be indexed;
    /// such objects cannot be culled and must always be drawn.
    fn insert(&mut self, key: ObjectKey, objects: &dyn ObjectSource) -> Result<()>;

    /// Remove an object. Returns `false` if it was not indexed.
    fn remove(&mut self, key: ObjectKey) -> bool;

    /// Query active objects whose node intersects the frustum.
    /// Results are deduplicated and appended to `results`.
    fn query_frustum(&self, frustum: &Frustum, objects: &dyn ObjectSource, results: &mut Vec<ObjectKey>);

    /// Whether the object is currently indexed.
    fn contains(&self, key: ObjectKey) -> bool;

    /// Number of indexed objects.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all objects from the index.
    fn clear(&mut self);
}
