/// Frustum: six clipping planes for visibility culling.
///
/// Each plane stores an inward-pointing unit normal and a distance term so
/// that `dot(normal, p) + distance` is the signed distance of `p`
/// (positive = inside). A point is inside the frustum when it is on the
/// positive side of all six planes.
///
/// The frustum is rebuilt every frame from the active camera. Until the
/// first successful update it is *uninitialized* and every test answers
/// `Inside`: culling degrades to "draw everything", never to "draw nothing".

use glam::{Mat4, Vec3};
use crate::engine_warn;
use crate::scene::AABB;
use super::camera::Camera;

/// Tolerance used by `test_aabb` so boxes touching a plane are kept.
pub const AABB_EPSILON: f32 = 1e-6;

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Result of a 3-way frustum classification.
///
/// Used by the Octree for hierarchical culling:
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect the subtree without further testing
/// - `Intersect` → collect this node's objects and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// Entirely outside the frustum
    Outside,
    /// Entirely inside the frustum
    Inside,
    /// Straddles at least one plane
    Intersect,
}

/// A half-space with an inward-pointing unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumPlane {
    /// Unit normal pointing toward the visible volume
    pub normal: Vec3,
    /// Distance term: `dot(normal, p) + distance` is the signed distance
    pub distance: f32,
}

impl FrustumPlane {
    /// Plane through `point` with the given normal (normalized here).
    ///
    /// Returns `None` if the normal has zero length or is not finite.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        let distance = -normal.dot(point);
        distance.is_finite().then_some(Self { normal, distance })
    }

    /// Signed distance from the plane to `point` (positive = inside).
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Same plane, opposite orientation.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    /// AABB corner furthest along the normal (p-vertex).
    fn positive_vertex(&self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            if self.normal.x >= 0.0 { max.x } else { min.x },
            if self.normal.y >= 0.0 { max.y } else { min.y },
            if self.normal.z >= 0.0 { max.z } else { min.z },
        )
    }

    /// AABB corner furthest against the normal (n-vertex).
    fn negative_vertex(&self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            if self.normal.x >= 0.0 { min.x } else { max.x },
            if self.normal.y >= 0.0 { min.y } else { max.y },
            if self.normal.z >= 0.0 { min.z } else { max.z },
        )
    }
}

impl Default for FrustumPlane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            distance: 0.0,
        }
    }
}

/// Six frustum planes for culling: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frustum {
    planes: [FrustumPlane; 6],
    initialized: bool,
}

impl Frustum {
    /// Create an uninitialized frustum (every test returns `Inside`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frustum directly from a camera pose.
    pub fn from_camera(camera: &Camera) -> Self {
        let mut frustum = Self::new();
        frustum.update_from_camera_pose(camera);
        frustum
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. glam projections map depth to
    /// 0..1, so the near plane is row2 alone instead of row3 + row2.
    /// A degenerate matrix yields an uninitialized frustum.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];
        let raw = [
            rows[3] + rows[0], // left
            rows[3] - rows[0], // right
            rows[3] + rows[1], // bottom
            rows[3] - rows[1], // top
            rows[2],           // near (0..1 depth)
            rows[3] - rows[2], // far
        ];

        let mut frustum = Self::new();
        for (i, plane) in raw.iter().enumerate() {
            let len = plane.truncate().length();
            if !(len > 0.0) || !plane.is_finite() {
                engine_warn!("galaxy3d::Frustum", "Degenerate view-projection matrix, frustum left uninitialized");
                return Self::new();
            }
            frustum.planes[i] = FrustumPlane {
                normal: plane.truncate() / len,
                distance: plane.w / len,
            };
        }
        frustum.initialized = true;
        frustum
    }

    /// Whether the planes come from a successful camera update.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Plane by index (`PLANE_LEFT` .. `PLANE_FAR`), `None` past `PLANE_FAR`.
    pub fn plane(&self, index: usize) -> Option<&FrustumPlane> {
        self.planes.get(index)
    }

    /// All six planes.
    pub fn planes(&self) -> &[FrustumPlane; 6] {
        &self.planes
    }

    /// Forget the current planes; every test returns `Inside` again.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Recompute the planes from the camera pose.
    pub fn update_from_camera_pose(&mut self, camera: &Camera) {
        self.update_from_camera(
            camera.position(),
            camera.front(),
            camera.right(),
            camera.up(),
            camera.fov_y_degrees(),
            camera.aspect(),
            camera.z_near(),
            camera.z_far(),
        );
    }

    /// Recompute the six planes from a camera pose.
    ///
    /// The side planes pass through the camera position; their normals are
    /// built from the far-plane edge directions. Every plane is checked
    /// against a point on the view axis between near and far and flipped if
    /// it faces away from it, so normals always point inward.
    ///
    /// Invalid parameters (non-positive FOV/aspect, `z_far <= z_near`,
    /// degenerate vectors) leave the frustum uninitialized.
    #[allow(clippy::too_many_arguments)]
    pub fn update_from_camera(
        &mut self,
        position: Vec3,
        front: Vec3,
        right: Vec3,
        up: Vec3,
        fov_y_degrees: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) {
        match Self::compute_planes(position, front, right, up, fov_y_degrees, aspect, z_near, z_far) {
            Some(planes) => {
                self.planes = planes;
                self.initialized = true;
            }
            None => {
                engine_warn!(
                    "galaxy3d::Frustum",
                    "Degenerate camera (fov {}, aspect {}, near {}, far {}), frustum left uninitialized",
                    fov_y_degrees, aspect, z_near, z_far
                );
                self.reset();
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn compute_planes(
        position: Vec3,
        front: Vec3,
        right: Vec3,
        up: Vec3,
        fov_y_degrees: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Option<[FrustumPlane; 6]> {
        let valid = fov_y_degrees > 0.0
            && fov_y_degrees < 180.0
            && aspect > 0.0
            && z_near >= 0.0
            && z_far > z_near
            && z_far.is_finite()
            && position.is_finite();
        if !valid {
            return None;
        }
        let front = front.try_normalize()?;
        let right = right.try_normalize()?;
        let up = up.try_normalize()?;

        let half_v = z_far * (fov_y_degrees.to_radians() * 0.5).tan();
        let half_h = half_v * aspect;
        let far_center = front * z_far;

        let left_edge = far_center - right * half_h;
        let right_edge = far_center + right * half_h;
        let bottom_edge = far_center - up * half_v;
        let top_edge = far_center + up * half_v;

        let planes = [
            FrustumPlane::from_point_normal(position, left_edge.cross(up))?,
            FrustumPlane::from_point_normal(position, up.cross(right_edge))?,
            FrustumPlane::from_point_normal(position, right.cross(bottom_edge))?,
            FrustumPlane::from_point_normal(position, top_edge.cross(right))?,
            FrustumPlane::from_point_normal(position + front * z_near, front)?,
            FrustumPlane::from_point_normal(position + front * z_far, -front)?,
        ];

        // Enforce inward orientation against a point inside the volume
        let interior = position + front * ((z_near + z_far) * 0.5);
        Some(planes.map(|plane| {
            if plane.signed_distance(interior) < 0.0 {
                plane.flipped()
            } else {
                plane
            }
        }))
    }

    // ===== QUERIES =====

    /// `Inside` iff the point is on the positive side of every plane,
    /// `Outside` otherwise.
    pub fn test_point(&self, point: Vec3) -> FrustumTest {
        if !self.initialized {
            return FrustumTest::Inside;
        }
        if self.planes.iter().all(|plane| plane.signed_distance(point) >= 0.0) {
            FrustumTest::Inside
        } else {
            FrustumTest::Outside
        }
    }

    /// Classify a sphere against the frustum.
    pub fn test_sphere(&self, center: Vec3, radius: f32) -> FrustumTest {
        if !self.initialized {
            return FrustumTest::Inside;
        }
        let mut all_inside = true;
        for plane in &self.planes {
            let distance = plane.signed_distance(center);
            if distance < -radius {
                return FrustumTest::Outside;
            }
            if distance <= radius {
                all_inside = false;
            }
        }
        if all_inside { FrustumTest::Inside } else { FrustumTest::Intersect }
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// Tests the positive vertex (p-vertex) and negative vertex (n-vertex)
    /// of the box against each plane:
    /// - p-vertex behind any plane by more than `AABB_EPSILON` → `Outside`
    /// - n-vertex in front of every plane by more than `AABB_EPSILON` → `Inside`
    /// - otherwise → `Intersect`
    pub fn test_aabb(&self, min: Vec3, max: Vec3) -> FrustumTest {
        if !self.initialized {
            return FrustumTest::Inside;
        }
        let mut all_inside = true;

        for plane in &self.planes {
            let p_vertex = plane.positive_vertex(min, max);
            if plane.signed_distance(p_vertex) < -AABB_EPSILON {
                return FrustumTest::Outside;
            }

            let n_vertex = plane.negative_vertex(min, max);
            if plane.signed_distance(n_vertex) <= AABB_EPSILON {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Intersect }
    }

    /// Classify a local-space AABB placed in the world by `model_matrix`.
    ///
    /// The 8 transformed corners are enclosed in a world AABB which is then
    /// passed to `test_aabb`. For rotated boxes this envelope is larger than
    /// the oriented box: some invisible objects may be kept, visible ones
    /// are never discarded. Non-finite corners or matrices cannot be
    /// placed and classify as `Intersect`.
    pub fn test_aabb_world(&self, min: Vec3, max: Vec3, model_matrix: &Mat4) -> FrustumTest {
        if !self.initialized {
            return FrustumTest::Inside;
        }
        if !(min.is_finite() && max.is_finite() && model_matrix.is_finite()) {
            return FrustumTest::Intersect;
        }
        let world = AABB::new(min, max).transformed_corners(model_matrix);
        self.test_aabb(world.min, world.max)
    }

    /// Classify an `AABB` value.
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        self.test_aabb(aabb.min, aabb.max)
    }

    /// `true` unless the AABB is entirely outside.
    pub fn is_visible(&self, aabb: &AABB) -> bool {
        self.classify_aabb(aabb) != FrustumTest::Outside
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
