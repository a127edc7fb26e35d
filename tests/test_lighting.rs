// tests/test_lighting.rs
// Contract tests for the lighting parameter resolver.
// RELEVANT FILES:src/lighting/mod.rs

use glam::Mat4;
use kissview::lighting::{
    parabolic_light_position, scale_point, LightingInputs, PhongMaterial, SurfaceUniforms,
};
use kissview::transforms::frame_transforms;

#[test]
fn light_follows_the_parabola() {
    let p = parabolic_light_position(0.0);
    assert_eq!((p.x, p.y, p.z), (0.0, -2.0, 1.0));

    let p = parabolic_light_position(2.0);
    assert_eq!((p.x, p.y, p.z), (2.0, 2.0, 1.0));

    let p = parabolic_light_position(-1.5);
    assert_eq!(p.x, -1.5);
    assert!((p.y - 0.25).abs() < 1e-6);
    assert_eq!(p.z, 1.0);
}

#[test]
fn scale_point_maps_to_normalized_texture_space() {
    let s = scale_point(180.0, 0.0);
    assert!((s.x - 0.5).abs() < 1e-6);
    assert!((s.y - 0.5).abs() < 1e-6);

    let s = scale_point(0.0, 1.0);
    assert_eq!(s.x, 0.0);
    assert_eq!(s.y, 1.0);
}

#[test]
fn material_defaults_match_the_fixed_configuration() {
    let m = PhongMaterial::default();
    assert_eq!(m.shininess, 80.0);
    assert_eq!(m.uv_scale, 0.8);
    assert_eq!(m.ambient_color, [0.1, 0.6, 0.4]);
    assert_eq!(
        (m.ambient_coef, m.diffuse_coef, m.specular_coef),
        (1.0, 1.0, 1.0)
    );
}

#[test]
fn uniform_block_carries_resolved_values() {
    let transforms = frame_transforms(Mat4::IDENTITY, 1.0);
    let inputs = LightingInputs {
        light_param: 2.0,
        scale_angle_deg: 180.0,
        scale_offset: 0.0,
    };
    let block = SurfaceUniforms::assemble(&transforms, &PhongMaterial::default(), &inputs);
    assert_eq!(block.light_pos, [2.0, 2.0, 1.0]);
    assert!((block.scale_point[0] - 0.5).abs() < 1e-6);
    assert!((block.scale_point[1] - 0.5).abs() < 1e-6);
    assert_eq!(block.shininess, 80.0);
    assert_eq!(block.mvp, transforms.mvp.to_cols_array_2d());
}

#[test]
fn out_of_domain_inputs_are_resolved_defensively() {
    // the resolver clamps, so a runaway control value cannot reach the GPU
    let p = parabolic_light_position(1e9);
    assert!(p.x.is_finite() && p.y.is_finite());

    let s = scale_point(99999.0, 99.0);
    assert!((0.0..1.0).contains(&s.x));
    assert!((0.0..=1.0).contains(&s.y));
}
