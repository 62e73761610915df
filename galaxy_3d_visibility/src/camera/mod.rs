//! Camera module: camera pose, frustum, and render view.
//!
//! Provides passive data containers for the visibility pipeline.
//! Cameras are owned and driven by the caller; the frustum is rebuilt from
//! the camera once per frame.

mod camera;
mod frustum;
mod render_view;

pub use camera::Camera;
pub use frustum::{
    Frustum, FrustumPlane, FrustumTest, AABB_EPSILON,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use render_view::{DrawItem, RenderView};
