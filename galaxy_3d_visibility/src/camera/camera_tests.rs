use glam::{Mat4, Vec3};
use super::*;

fn assert_vec3_near(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
}

fn create_test_camera() -> Camera {
    Camera::new(
        Vec3::new(0.0, 0.0, 10.0),
        Vec3::NEG_Z,
        Vec3::Y,
        45.0,
        16.0 / 9.0,
        0.1,
        100.0,
    )
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_new_builds_right_handed_basis() {
    let camera = create_test_camera();

    assert_vec3_near(camera.front(), Vec3::NEG_Z);
    assert_vec3_near(camera.right(), Vec3::X);
    assert_vec3_near(camera.up(), Vec3::Y);
    assert_eq!(camera.fov_y_degrees(), 45.0);
    assert_eq!(camera.z_near(), 0.1);
    assert_eq!(camera.z_far(), 100.0);
}

#[test]
fn test_camera_new_orthonormalizes_inputs() {
    let camera = Camera::new(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -5.0),
        Vec3::new(0.0, 2.0, -1.0), // not orthogonal to front
        60.0,
        1.0,
        0.1,
        50.0,
    );

    assert!((camera.front().length() - 1.0).abs() < 1e-5);
    assert!((camera.up().length() - 1.0).abs() < 1e-5);
    assert!(camera.front().dot(camera.up()).abs() < 1e-5);
    assert!(camera.front().dot(camera.right()).abs() < 1e-5);
    assert_vec3_near(camera.up(), Vec3::Y);
}

#[test]
fn test_camera_look_at() {
    let camera = Camera::look_at(
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::ZERO,
        Vec3::Y,
        45.0,
        1.0,
        0.1,
        100.0,
    );

    assert_vec3_near(camera.front(), Vec3::NEG_X);
    assert_vec3_near(camera.right(), Vec3::NEG_Z);
}

#[test]
fn test_camera_degenerate_front_falls_back() {
    let camera = Camera::new(Vec3::ZERO, Vec3::ZERO, Vec3::Y, 45.0, 1.0, 0.1, 10.0);
    assert_vec3_near(camera.front(), Vec3::NEG_Z);
}

#[test]
fn test_camera_up_parallel_to_front_keeps_valid_basis() {
    let mut camera = create_test_camera();
    camera.set_orientation(Vec3::Y, Vec3::Y);

    assert_vec3_near(camera.front(), Vec3::Y);
    assert!(camera.right().is_finite());
    assert!((camera.right().length() - 1.0).abs() < 1e-5);
    assert!(camera.front().dot(camera.up()).abs() < 1e-5);
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn test_camera_view_matrix_matches_look_at() {
    let camera = create_test_camera();
    let expected = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);

    assert!(camera.view_matrix().abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_camera_view_projection_is_projection_times_view() {
    let camera = create_test_camera();
    let expected = camera.projection_matrix() * camera.view_matrix();

    assert_eq!(camera.view_projection_matrix(), expected);
}

// ============================================================================
// Setters
// ============================================================================

#[test]
fn test_camera_setters() {
    let mut camera = create_test_camera();

    camera.set_position(Vec3::new(1.0, 2.0, 3.0));
    camera.set_perspective(90.0, 2.0, 1.0, 500.0);
    camera.set_aspect(1.5);

    assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(camera.fov_y_degrees(), 90.0);
    assert_eq!(camera.aspect(), 1.5);
    assert_eq!(camera.z_near(), 1.0);
    assert_eq!(camera.z_far(), 500.0);
}
