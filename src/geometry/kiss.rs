// src/geometry/kiss.rs
// Tessellation of the KISS surface, a closed quartic-like revolution surface
// Emits strip-compatible (current-u, next-u) vertex pairs with matching UVs
// RELEVANT FILES:src/geometry/mod.rs,tests/test_tessellation.rs

use std::f32::consts::TAU;

use glam::Vec3;

use super::SurfaceBuffers;
use crate::error::{RenderError, RenderResult};

// Keeps the profile derivative finite at the v = 1 pole.
const MIN_ROOT_ARG: f32 = 1e-6;

/// Radial profile of the surface of revolution: r(v) = v^2 * sqrt(1 - v).
#[inline]
fn profile(v: f32) -> f32 {
    v * v * (1.0 - v).max(0.0).sqrt()
}

/// d(profile)/dv, guarded where sqrt(1 - v) vanishes.
#[inline]
fn profile_derivative(v: f32) -> f32 {
    let root = (1.0 - v).max(MIN_ROOT_ARG).sqrt();
    2.0 * v * root - v * v / (2.0 * root)
}

/// Outward normal at lattice sample (u, v), from dP/du x dP/dv which
/// simplifies to (r cos u, r sin u, -r * r') for this parameterization.
/// Falls back to +Z where the surface pinches to the axis (r ~ 0).
fn sample_normal(u_rad: f32, v: f32) -> [f32; 3] {
    let r = profile(v);
    let n = Vec3::new(
        r * u_rad.cos(),
        r * u_rad.sin(),
        -r * profile_derivative(v),
    );
    if n.length_squared() < 1e-12 {
        [0.0, 0.0, 1.0]
    } else {
        let n = n.normalize();
        [n.x, n.y, n.z]
    }
}

fn push_sample(buffers: &mut SurfaceBuffers, u_rad: f32, v: f32) {
    let r = profile(v);
    buffers
        .positions
        .push([r * u_rad.cos(), r * u_rad.sin(), v]);
    buffers.normals.push(sample_normal(u_rad, v));
    buffers.uvs.push([u_rad / TAU, (v + 1.0) / 2.0]);
}

/// Tessellate the KISS surface at resolution `n`.
///
/// The angular parameter walks `0deg .. <360deg` in steps of `360/(n-1)`
/// degrees (exactly `n - 1` samples), the radial parameter walks `-1 ..= 1`
/// in steps of `2/(n-1)` (exactly `n` samples). Every lattice point emits
/// the pair of vertices at `(u, v)` and `(u + step, v)` so that consecutive
/// runs of `2n` vertices form a triangle strip. Loop bounds are counted in
/// integers, never accumulated in floats, so positions, normals and UVs
/// always agree in length: `2 * n * (n - 1)` vertices.
///
/// Pure and deterministic: identical `n` yields bit-identical buffers.
pub fn tessellate(n: u32) -> RenderResult<SurfaceBuffers> {
    if n <= 1 {
        return Err(RenderError::geometry(format!(
            "resolution {} is degenerate; need at least 2 subdivisions",
            n
        )));
    }

    let step_u_deg = 360.0 / (n - 1) as f32;
    let step_v = 2.0 / (n - 1) as f32;
    let angular_samples = n - 1; // u = k * step, all strictly below 360
    let radial_samples = n; // v = -1 + j * step, last sample lands on 1

    let vertex_count = 2 * (angular_samples * radial_samples) as usize;
    let mut buffers = SurfaceBuffers::with_capacity(vertex_count);

    for k in 0..angular_samples {
        let u0 = (k as f32 * step_u_deg).to_radians();
        let u1 = ((k + 1) as f32 * step_u_deg).to_radians();
        for j in 0..radial_samples {
            let v = -1.0 + j as f32 * step_v;
            push_sample(&mut buffers, u0, v);
            push_sample(&mut buffers, u1, v);
        }
    }

    Ok(buffers)
}
