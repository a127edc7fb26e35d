// src/lighting/mod.rs
// Lighting parameter resolver with GPU-aligned uniform layout
// Maps raw UI scalars into shader-ready values; all GPU types are repr(C)
// and bytemuck-compatible for upload
// RELEVANT FILES:src/renderer/mod.rs,src/shaders/surface.wgsl,tests/test_lighting.rs

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::transforms::FrameTransforms;

/// Bound for the light-path control; out-of-domain inputs are clamped here
/// so the input layer stays dumb.
pub const LIGHT_PARAM_BOUND: f32 = 3.0;

/// Point on the fixed parabola y = x^2 - 2 in the z = 1 plane.
pub fn parabolic_light_position(x: f32) -> Vec3 {
    let x = x.clamp(-LIGHT_PARAM_BOUND, LIGHT_PARAM_BOUND);
    Vec3::new(x, x * x - 2.0, 1.0)
}

/// Map the scale controls (angle in degrees, offset in [-1, 1]) into
/// normalized texture space. Angle wraps, offset clamps.
pub fn scale_point(angle_deg: f32, offset: f32) -> Vec2 {
    let angle = angle_deg.rem_euclid(360.0);
    let offset = offset.clamp(-1.0, 1.0);
    Vec2::new(angle.to_radians() / TAU, (offset + 1.0) / 2.0)
}

/// Fixed Phong material parameters. Configuration, not derived state.
#[derive(Debug, Clone, Copy)]
pub struct PhongMaterial {
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub ambient_coef: f32,
    pub diffuse_coef: f32,
    pub specular_coef: f32,
    pub shininess: f32,
    /// Texture-space scale factor applied about the scale point.
    pub uv_scale: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient_color: [0.1, 0.6, 0.4],
            diffuse_color: [1.0, 0.5, 0.5],
            specular_color: [1.0, 0.0, 1.0],
            ambient_coef: 1.0,
            diffuse_coef: 1.0,
            specular_coef: 1.0,
            shininess: 80.0,
            uv_scale: 0.8,
        }
    }
}

/// Raw per-frame control values polled from the input layer once per frame.
#[derive(Debug, Clone, Copy)]
pub struct LightingInputs {
    /// Light-path parameter (the single light slider value).
    pub light_param: f32,
    /// Scale-point angle in degrees.
    pub scale_angle_deg: f32,
    /// Scale-point offset in [-1, 1].
    pub scale_offset: f32,
}

impl Default for LightingInputs {
    fn default() -> Self {
        Self {
            light_param: 0.0,
            scale_angle_deg: 180.0,
            scale_offset: 0.0,
        }
    }
}

/// GPU uniform block for the surface shader.
///
/// Layout mirrors `SurfaceUniforms` in surface.wgsl field for field; the
/// vec3 members are padded to 16 bytes by the trailing f32 coefficient
/// packed next to each of them.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub mvp: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub ambient_color: [f32; 3],
    pub ambient_coef: f32,
    pub diffuse_color: [f32; 3],
    pub diffuse_coef: f32,
    pub specular_color: [f32; 3],
    pub specular_coef: f32,
    pub light_pos: [f32; 3],
    pub shininess: f32,
    pub scale_point: [f32; 2],
    pub uv_scale: f32,
    pub _pad: f32,
}

impl SurfaceUniforms {
    /// Assemble the per-frame uniform block from resolved transforms,
    /// material configuration and raw control values.
    pub fn assemble(
        transforms: &FrameTransforms,
        material: &PhongMaterial,
        inputs: &LightingInputs,
    ) -> Self {
        let light = parabolic_light_position(inputs.light_param);
        let scale = scale_point(inputs.scale_angle_deg, inputs.scale_offset);
        Self {
            mvp: transforms.mvp.to_cols_array_2d(),
            model_view: transforms.model_view.to_cols_array_2d(),
            normal: transforms.normal.to_cols_array_2d(),
            ambient_color: material.ambient_color,
            ambient_coef: material.ambient_coef,
            diffuse_color: material.diffuse_color,
            diffuse_coef: material.diffuse_coef,
            specular_color: material.specular_color,
            specular_coef: material.specular_coef,
            light_pos: light.to_array(),
            shininess: material.shininess,
            scale_point: scale.to_array(),
            uv_scale: material.uv_scale,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_ubo_aligned() {
        // WGSL uniform blocks require 16-byte multiples
        assert_eq!(std::mem::size_of::<SurfaceUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 272);
    }

    #[test]
    fn light_param_is_clamped() {
        let p = parabolic_light_position(100.0);
        assert_eq!(p.x, LIGHT_PARAM_BOUND);
        let p = parabolic_light_position(-100.0);
        assert_eq!(p.x, -LIGHT_PARAM_BOUND);
    }

    #[test]
    fn scale_angle_wraps_and_offset_clamps() {
        let s = scale_point(540.0, 5.0);
        assert!((s.x - 0.5).abs() < 1e-6);
        assert_eq!(s.y, 1.0);
        let s = scale_point(-90.0, -5.0);
        assert!((s.x - 0.75).abs() < 1e-6);
        assert_eq!(s.y, 0.0);
    }
}
