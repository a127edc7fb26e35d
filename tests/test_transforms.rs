// tests/test_transforms.rs
// Frustum and normal-matrix properties of the fixed transform pipeline.
// RELEVANT FILES:src/transforms.rs,src/camera.rs

use glam::{Mat4, Vec4};
use kissview::camera::OrbitRotator;
use kissview::transforms::{frame_transforms, normal_matrix, ZFAR, ZNEAR};

#[test]
fn pushed_back_origin_lies_between_near_and_far() {
    let t = frame_transforms(Mat4::IDENTITY, 1.0);
    let origin_view = t.model_view * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(
        origin_view.z < -ZNEAR && origin_view.z > -ZFAR,
        "origin at view z = {}",
        origin_view.z
    );
}

#[test]
fn pushed_back_origin_is_inside_the_frustum() {
    let t = frame_transforms(Mat4::IDENTITY, 1.0);
    let clip = t.mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(clip.w > 0.0);
    let ndc = clip / clip.w;
    assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
    // WGPU clip space: depth in [0, 1]
    assert!((0.0..=1.0).contains(&ndc.z), "ndc depth {}", ndc.z);
}

#[test]
fn drag_rotation_does_not_move_the_object_out_of_frame() {
    let mut rotator = OrbitRotator::new();
    rotator.set_dragging(true);
    rotator.handle_cursor(0.0, 0.0);
    rotator.handle_cursor(450.0, -200.0);

    let t = frame_transforms(rotator.view_matrix(), 4.0 / 3.0);
    let clip = t.mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip / clip.w;
    // the rotator only rotates, so the centroid stays put
    assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
    assert!((0.0..=1.0).contains(&ndc.z));
}

#[test]
fn normal_matrix_of_rigid_model_view_matches_its_rotation() {
    let t = frame_transforms(Mat4::IDENTITY, 1.0);
    let n = normal_matrix(t.model_view);
    // for a rigid transform the normal matrix equals the rotation part;
    // transforming +Z must keep unit length
    let nz = n * Vec4::new(0.0, 0.0, 1.0, 0.0);
    let len = (nz.x * nz.x + nz.y * nz.y + nz.z * nz.z).sqrt();
    assert!((len - 1.0).abs() < 1e-4);
}

#[test]
fn singular_model_view_degrades_to_identity() {
    assert_eq!(normal_matrix(Mat4::ZERO), Mat4::IDENTITY);
    let squash = Mat4::from_scale(glam::Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(normal_matrix(squash), Mat4::IDENTITY);
}
