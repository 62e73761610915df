use glam::{Mat4, Quat, Vec3};
use crate::scene::AABB;
use super::*;

/// Camera at (0,0,10) looking down -Z, 45° FOV, square aspect.
fn reference_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::Y, 45.0, 1.0, 0.1, 100.0)
}

fn reference_frustum() -> Frustum {
    Frustum::from_camera(&reference_camera())
}

fn unit_box_at(center: Vec3) -> (Vec3, Vec3) {
    (center - Vec3::splat(0.5), center + Vec3::splat(0.5))
}

// ============================================================================
// Frustum::update_from_camera
// ============================================================================

#[test]
fn test_frustum_planes_are_unit_length() {
    let frustum = reference_frustum();

    assert!(frustum.is_initialized());
    for plane in frustum.planes() {
        assert!((plane.normal.length() - 1.0).abs() < 1e-5, "plane normal should be unit length");
    }
}

#[test]
fn test_frustum_planes_face_inward() {
    let frustum = reference_frustum();
    let on_axis = Vec3::new(0.0, 0.0, -40.0);

    for plane in frustum.planes() {
        assert!(plane.signed_distance(on_axis) > 0.0);
    }
    // Near and far normals follow the view axis
    assert!(frustum.plane(PLANE_NEAR).unwrap().normal.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    assert!(frustum.plane(PLANE_FAR).unwrap().normal.abs_diff_eq(Vec3::Z, 1e-6));
    // Side planes lean toward the axis
    assert!(frustum.plane(PLANE_LEFT).unwrap().normal.x > 0.0);
    assert!(frustum.plane(PLANE_RIGHT).unwrap().normal.x < 0.0);
    assert!(frustum.plane(PLANE_BOTTOM).unwrap().normal.y > 0.0);
    assert!(frustum.plane(PLANE_TOP).unwrap().normal.y < 0.0);
}

#[test]
fn test_frustum_orientation_enforced_for_mirrored_basis() {
    // Left-handed basis (right negated): raw cross products face outward
    let mut frustum = Frustum::new();
    frustum.update_from_camera(
        Vec3::ZERO, Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y, 60.0, 1.0, 0.1, 50.0,
    );

    assert!(frustum.is_initialized());
    assert_eq!(frustum.test_point(Vec3::new(0.0, 0.0, -10.0)), FrustumTest::Inside);
    assert_eq!(frustum.test_point(Vec3::new(0.0, 0.0, 10.0)), FrustumTest::Outside);
}

#[test]
fn test_frustum_degenerate_camera_stays_uninitialized() {
    let mut frustum = reference_frustum();

    frustum.update_from_camera(
        Vec3::ZERO, Vec3::NEG_Z, Vec3::X, Vec3::Y, 45.0, 1.0, 10.0, 5.0, // far < near
    );
    assert!(!frustum.is_initialized());

    frustum.update_from_camera(
        Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::Y, 45.0, 1.0, 0.1, 5.0, // zero front
    );
    assert!(!frustum.is_initialized());
    assert_eq!(frustum.test_point(Vec3::splat(1.0e6)), FrustumTest::Inside);
}

// ============================================================================
// Uninitialized frustum
// ============================================================================

#[test]
fn test_uninitialized_frustum_is_permissive() {
    let frustum = Frustum::new();
    let far_away = Vec3::splat(1.0e6);

    assert!(!frustum.is_initialized());
    assert_eq!(frustum.test_point(far_away), FrustumTest::Inside);
    assert_eq!(frustum.test_sphere(far_away, 1.0), FrustumTest::Inside);
    assert_eq!(frustum.test_aabb(far_away, far_away + Vec3::ONE), FrustumTest::Inside);
    assert_eq!(
        frustum.test_aabb_world(Vec3::ZERO, Vec3::ONE, &Mat4::from_translation(far_away)),
        FrustumTest::Inside,
    );
}

#[test]
fn test_reset_returns_to_uninitialized() {
    let mut frustum = reference_frustum();
    let (min, max) = unit_box_at(Vec3::new(1000.0, 0.0, 0.0));
    assert_eq!(frustum.test_aabb(min, max), FrustumTest::Outside);

    frustum.reset();
    assert_eq!(frustum.test_aabb(min, max), FrustumTest::Inside);
}

// ============================================================================
// test_point / test_sphere
// ============================================================================

#[test]
fn test_point_classification() {
    let frustum = reference_frustum();

    assert_eq!(frustum.test_point(Vec3::ZERO), FrustumTest::Inside);
    assert_eq!(frustum.test_point(Vec3::new(0.0, 0.0, 20.0)), FrustumTest::Outside); // behind
    assert_eq!(frustum.test_point(Vec3::new(0.0, 0.0, -85.0)), FrustumTest::Inside);
    assert_eq!(frustum.test_point(Vec3::new(0.0, 0.0, -95.0)), FrustumTest::Outside); // past far (z = -90)
    assert_eq!(frustum.test_point(Vec3::new(0.0, 50.0, 0.0)), FrustumTest::Outside); // above
}

#[test]
fn test_sphere_classification() {
    let frustum = reference_frustum();

    assert_eq!(frustum.test_sphere(Vec3::new(0.0, 0.0, -20.0), 1.0), FrustumTest::Inside);
    assert_eq!(frustum.test_sphere(Vec3::new(500.0, 0.0, 0.0), 1.0), FrustumTest::Outside);
    // Centered on the near plane: straddles it
    assert_eq!(frustum.test_sphere(Vec3::new(0.0, 0.0, 9.9), 1.0), FrustumTest::Intersect);
    // Outside the far plane but large enough to reach back in
    assert_eq!(frustum.test_sphere(Vec3::new(0.0, 0.0, -95.0), 10.0), FrustumTest::Intersect);
}

// ============================================================================
// test_aabb
// ============================================================================

#[test]
fn test_aabb_reference_scenario() {
    let frustum = reference_frustum();

    let (min, max) = unit_box_at(Vec3::ZERO);
    assert_eq!(frustum.test_aabb(min, max), FrustumTest::Inside);

    let (min, max) = unit_box_at(Vec3::new(1000.0, 0.0, 0.0));
    assert_eq!(frustum.test_aabb(min, max), FrustumTest::Outside);
}

#[test]
fn test_aabb_outside_each_half_space() {
    let frustum = reference_frustum();
    let outside_centers = [
        Vec3::new(-200.0, 0.0, -20.0), // left
        Vec3::new(200.0, 0.0, -20.0),  // right
        Vec3::new(0.0, -200.0, -20.0), // below
        Vec3::new(0.0, 200.0, -20.0),  // above
        Vec3::new(0.0, 0.0, 30.0),     // behind the near plane
        Vec3::new(0.0, 0.0, -300.0),   // beyond the far plane
    ];

    for center in outside_centers {
        let (min, max) = unit_box_at(center);
        assert_eq!(frustum.test_aabb(min, max), FrustumTest::Outside, "box at {:?}", center);
    }
}

#[test]
fn test_aabb_fully_inside_boxes() {
    let frustum = reference_frustum();
    let inside_centers = [
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(5.0, 5.0, -30.0),
        Vec3::new(-20.0, 0.0, -70.0),
    ];

    for center in inside_centers {
        let (min, max) = unit_box_at(center);
        assert_eq!(frustum.test_aabb(min, max), FrustumTest::Inside, "box at {:?}", center);
    }
}

#[test]
fn test_aabb_straddling_plane_intersects() {
    let frustum = reference_frustum();

    // Crosses the far plane at z = -90
    let result = frustum.test_aabb(Vec3::new(-1.0, -1.0, -95.0), Vec3::new(1.0, 1.0, -85.0));
    assert_eq!(result, FrustumTest::Intersect);

    // Contains the whole frustum
    let result = frustum.test_aabb(Vec3::splat(-1000.0), Vec3::splat(1000.0));
    assert_eq!(result, FrustumTest::Intersect);
}

#[test]
fn test_aabb_touching_plane_is_not_culled() {
    let frustum = reference_frustum();
    // Flat box lying exactly on the near plane
    let near_z = 10.0_f32 - 0.1_f32;
    let result = frustum.test_aabb(Vec3::new(-0.5, -0.5, near_z), Vec3::new(0.5, 0.5, near_z));
    assert_ne!(result, FrustumTest::Outside);
}

// ============================================================================
// test_aabb_world
// ============================================================================

#[test]
fn test_aabb_world_translation() {
    let frustum = reference_frustum();
    let (min, max) = unit_box_at(Vec3::ZERO);

    let visible = Mat4::from_translation(Vec3::new(0.0, 0.0, -20.0));
    let hidden = Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0));

    assert_eq!(frustum.test_aabb_world(min, max, &visible), FrustumTest::Inside);
    assert_eq!(frustum.test_aabb_world(min, max, &hidden), FrustumTest::Outside);
}

#[test]
fn test_aabb_world_rotated_envelope_is_conservative() {
    let frustum = reference_frustum();
    // Long thin bar rotated 45° around Y, entirely outside the right plane
    let min = Vec3::new(-10.0, -0.1, -0.1);
    let max = Vec3::new(10.0, 0.1, 0.1);
    let model = Mat4::from_rotation_translation(
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
        Vec3::new(20.0, 0.0, -20.0),
    );

    // Its world envelope reaches back into the frustum, so the bar is kept
    assert_ne!(frustum.test_aabb_world(min, max, &model), FrustumTest::Outside);
}

#[test]
fn test_aabb_world_non_finite_input_is_kept() {
    let frustum = reference_frustum();
    let hidden = Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0));
    let nan_corner = Vec3::new(f32::NAN, -0.5, -0.5);

    assert_eq!(frustum.test_aabb_world(nan_corner, Vec3::splat(0.5), &hidden), FrustumTest::Intersect);
    assert_eq!(
        frustum.test_aabb_world(Vec3::splat(-0.5), Vec3::splat(0.5), &Mat4::from_cols_array(&[f32::NAN; 16])),
        FrustumTest::Intersect
    );
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_from_view_projection_agrees_with_camera_planes() {
    let camera = reference_camera();
    let from_pose = Frustum::from_camera(&camera);
    let from_matrix = Frustum::from_view_projection(&camera.view_projection_matrix());

    assert!(from_matrix.is_initialized());
    for plane in from_matrix.planes() {
        assert!((plane.normal.length() - 1.0).abs() < 1e-4);
    }

    let samples = [
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -60.0),
        Vec3::new(0.0, 0.0, 20.0),
        Vec3::new(100.0, 0.0, -10.0),
        Vec3::new(0.0, -80.0, -10.0),
        Vec3::new(0.0, 0.0, -200.0),
    ];
    for point in samples {
        assert_eq!(from_pose.test_point(point), from_matrix.test_point(point), "point {:?}", point);
    }
}

#[test]
fn test_is_visible_and_classify_aabb() {
    let frustum = reference_frustum();
    let near_box = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let far_box = AABB::new(Vec3::splat(500.0), Vec3::splat(501.0));

    assert_eq!(frustum.classify_aabb(&near_box), FrustumTest::Inside);
    assert!(frustum.is_visible(&near_box));
    assert!(!frustum.is_visible(&far_box));
}

// ============================================================================
// Plane constants
// ============================================================================

#[test]
fn test_plane_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
    assert!(reference_frustum().plane(PLANE_FAR).is_some());
    assert!(reference_frustum().plane(6).is_none());
}
