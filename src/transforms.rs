//! Per-frame transform pipeline: projection, model-view composition and
//! the normal matrix.
//!
//! Right-handed, GL-style camera math converted to WGPU clip space. The
//! camera is deliberately not configurable: a fixed narrow field of view
//! and tight near/far planes keep the surface framed.

use glam::{Mat4, Vec3};

/// Fixed vertical field of view (22.5 degrees).
pub const FOVY_RADIANS: f32 = std::f32::consts::PI / 8.0;
pub const ZNEAR: f32 = 8.0;
pub const ZFAR: f32 = 12.0;

/// Push-back along view Z applied after the compensating rotation.
const MODEL_PUSH_BACK: f32 = -10.0;
/// Fixed compensating rotation: axis diagonal in XY, 0.7 radians.
const MODEL_ROTATION_ANGLE: f32 = 0.7;

/// Per-frame transform set handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransforms {
    pub model_view: Mat4,
    pub normal: Mat4,
    pub mvp: Mat4,
}

/// Returns the GL->WGPU depth conversion matrix.
/// Maps GL clip-space Z [-1,1] to WGPU/Vulkan/Metal [0,1].
#[inline]
fn gl_to_wgpu() -> Mat4 {
    Mat4::from_cols_array(&[
        1.0, 0.0, 0.0, 0.0, // column 0
        0.0, 1.0, 0.0, 0.0, // column 1
        0.0, 0.0, 0.5, 0.0, // column 2
        0.0, 0.0, 0.5, 1.0, // column 3
    ])
}

/// Perspective projection for the fixed camera at the given aspect ratio.
pub fn perspective(aspect: f32) -> Mat4 {
    gl_to_wgpu() * Mat4::perspective_rh_gl(FOVY_RADIANS, aspect, ZNEAR, ZFAR)
}

fn compensating_rotation() -> Mat4 {
    Mat4::from_axis_angle(
        Vec3::new(0.707, 0.707, 0.0).normalize(),
        MODEL_ROTATION_ANGLE,
    )
}

/// Transpose of the inverse of the model-view matrix.
///
/// A singular input falls back to identity and logs a warning instead of
/// propagating NaNs into the shading stage.
pub fn normal_matrix(model_view: Mat4) -> Mat4 {
    if model_view.determinant().abs() < f32::EPSILON {
        log::warn!("singular model-view matrix; using identity normal matrix");
        return Mat4::IDENTITY;
    }
    model_view.inverse().transpose()
}

/// Compose the full per-frame transform set from the rotator's view matrix.
///
/// Order matches the fixed pipeline: push-back translation, compensating
/// rotation, then the accumulated drag rotation.
pub fn frame_transforms(view: Mat4, aspect: f32) -> FrameTransforms {
    let model_view =
        Mat4::from_translation(Vec3::new(0.0, 0.0, MODEL_PUSH_BACK)) * compensating_rotation() * view;
    let normal = normal_matrix(model_view);
    let mvp = perspective(aspect) * model_view;
    FrameTransforms {
        model_view,
        normal,
        mvp,
    }
}
