/// Camera: passive camera pose container.
///
/// Holds what the frustum needs each frame: position, an orthonormal
/// front/right/up basis, vertical FOV in degrees, aspect ratio and clip
/// distances. The engine does NOT drive cameras; the caller owns them and
/// updates the pose before culling.

use glam::{Mat4, Vec3};

/// Camera pose read once per frame by the culling pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    fov_y_degrees: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
}

impl Camera {
    /// Create a camera from a position, a viewing direction and an up hint.
    ///
    /// `front` and `up` need not be unit length or orthogonal: the basis is
    /// re-orthonormalized (right = front × up, up = right × front).
    pub fn new(
        position: Vec3,
        front: Vec3,
        up: Vec3,
        fov_y_degrees: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            fov_y_degrees,
            aspect,
            z_near,
            z_far,
        };
        camera.set_orientation(front, up);
        camera
    }

    /// Create a camera at `position` looking at `target`.
    pub fn look_at(
        position: Vec3,
        target: Vec3,
        world_up: Vec3,
        fov_y_degrees: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        Self::new(position, target - position, world_up, fov_y_degrees, aspect, z_near, z_far)
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit viewing direction.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit right vector.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit up vector (orthogonal to front and right).
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view, in degrees.
    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Right-handed view matrix for this pose.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front, self.up)
    }

    /// Right-handed perspective projection for this pose.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.z_near, self.z_far)
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set the viewing direction and up hint, rebuilding the orthonormal basis.
    ///
    /// A zero `front` keeps looking down -Z; an `up` parallel to `front`
    /// falls back to the previous right vector.
    pub fn set_orientation(&mut self, front: Vec3, up: Vec3) {
        let front = front.try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = front
            .cross(up)
            .try_normalize()
            .or_else(|| front.cross(self.up).try_normalize())
            .unwrap_or(Vec3::X);
        self.front = front;
        self.right = right;
        self.up = right.cross(front);
    }

    /// Set the projection parameters.
    pub fn set_perspective(&mut self, fov_y_degrees: f32, aspect: f32, z_near: f32, z_far: f32) {
        self.fov_y_degrees = fov_y_degrees;
        self.aspect = aspect;
        self.z_near = z_near;
        self.z_far = z_far;
    }

    /// Update only the aspect ratio (window resize).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
