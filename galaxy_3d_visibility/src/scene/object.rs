/// Scene objects as seen by the visibility subsystem.
///
/// A SceneObject is the minimum the culling pipeline needs from the
/// renderer's world: bounds, a world transform, an active flag and the
/// model drawn at LOD0. Objects and models are referenced by generational
/// slotmap keys, never by pointer.

use glam::{Mat4, Vec3};
use slotmap::{new_key_type, SlotMap};

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for an object within a Scene.
    ///
    /// Keys remain valid even after other objects are removed.
    /// A key becomes invalid only when its own object is removed.
    pub struct ObjectKey;

    /// Handle to a renderable model owned by the asset layer.
    ///
    /// The visibility subsystem never dereferences it; it only maps
    /// one model handle to another (LOD variants).
    pub struct ModelKey;
}

// ===== AABB =====

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create an AABB from two corners, swapping components per axis so
    /// that `min <= max` always holds.
    ///
    /// Corners must be finite: a NaN component is silently replaced by the
    /// other corner's value. Check with `is_valid` or validate the corners
    /// first when the input is untrusted.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box of the given half extents around `center`.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Smallest AABB enclosing a sphere.
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self::from_center_half_extents(center, Vec3::splat(radius.abs()))
    }

    /// Smallest AABB enclosing all `points` (`None` if empty).
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// All components finite and `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// The 8 corners. Bit layout: bit0 = X, bit1 = Y, bit2 = Z (1 = max).
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Transform this local-space AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// Transform the 8 corners and enclose them in a new AABB.
    ///
    /// Handles any matrix, including projective ones where the Arvo method
    /// does not apply.
    pub fn transformed_corners(&self, matrix: &Mat4) -> AABB {
        let corners = self.corners().map(|corner| matrix.project_point3(corner));
        // 8 corners: never empty
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Test if this AABB fully contains another AABB.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Smallest AABB enclosing both boxes.
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

// ===== SCENE OBJECT =====

/// A cullable object.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Model drawn at LOD0
    model: ModelKey,
    /// Bounds in local space (`None`: cannot be culled, always drawn)
    local_bounds: Option<AABB>,
    /// World transform matrix
    world_matrix: Mat4,
    /// Inactive objects are never returned by queries
    active: bool,
    /// Per-object LOD bias, overriding the LodSystem's global bias
    lod_bias: Option<f32>,
}

impl SceneObject {
    /// Create an active object at the identity transform.
    pub fn new(model: ModelKey, local_bounds: Option<AABB>) -> Self {
        Self {
            model,
            local_bounds,
            world_matrix: Mat4::IDENTITY,
            active: true,
            lod_bias: None,
        }
    }

    /// Builder: set the world matrix.
    pub fn with_world_matrix(mut self, world_matrix: Mat4) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    /// Builder: set a per-object LOD bias.
    pub fn with_lod_bias(mut self, lod_bias: f32) -> Self {
        self.lod_bias = Some(lod_bias);
        self
    }

    // ===== GETTERS =====

    pub fn model(&self) -> ModelKey {
        self.model
    }

    pub fn local_bounds(&self) -> Option<&AABB> {
        self.local_bounds.as_ref()
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn lod_bias(&self) -> Option<f32> {
        self.lod_bias
    }

    /// World-space AABB, or `None` if the object has no usable bounds
    /// (missing, or not finite after transformation).
    pub fn world_aabb(&self) -> Option<AABB> {
        // glam's min/max drop NaN operands: check before transforming
        self.local_bounds
            .filter(AABB::is_valid)
            .map(|bounds| bounds.transformed(&self.world_matrix))
            .filter(AABB::is_valid)
    }

    /// Reference point used for LOD distance: world AABB center, or the
    /// world translation for unbounded objects.
    pub fn position(&self) -> Vec3 {
        match self.world_aabb() {
            Some(aabb) => aabb.center(),
            None => self.world_matrix.col(3).truncate(),
        }
    }

    // ===== SETTERS (crate-internal: Scene keeps the index in sync) =====

    pub(crate) fn set_model(&mut self, model: ModelKey) {
        self.model = model;
    }

    pub(crate) fn set_local_bounds(&mut self, local_bounds: Option<AABB>) {
        self.local_bounds = local_bounds;
    }

    pub(crate) fn set_world_matrix(&mut self, world_matrix: Mat4) {
        self.world_matrix = world_matrix;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_lod_bias(&mut self, lod_bias: Option<f32>) {
        self.lod_bias = lod_bias;
    }
}

// ===== OBJECT SOURCE =====

/// Read access to object bounds and flags.
///
/// The Octree stores only keys; it reads world AABBs and active flags
/// through this trait at insert and query time.
pub trait ObjectSource {
    /// World-space AABB of an object (`None`: unknown key or no usable bounds).
    fn world_aabb(&self, key: ObjectKey) -> Option<AABB>;

    /// Whether the object exists and is active.
    fn is_active(&self, key: ObjectKey) -> bool;
}

impl ObjectSource for SlotMap<ObjectKey, SceneObject> {
    fn world_aabb(&self, key: ObjectKey) -> Option<AABB> {
        self.get(key).and_then(SceneObject::world_aabb)
    }

    fn is_active(&self, key: ObjectKey) -> bool {
        self.get(key).is_some_and(SceneObject::is_active)
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
