//! Interactive renderer for the KISS surface, a closed quartic-like
//! revolution surface, lit with a Phong-style model.
//!
//! The crate splits into CPU-side math that is testable without a GPU
//! (geometry, transforms, lighting, camera) and the wgpu-backed renderer
//! and window loop that consume it:
//!
//! - [`geometry`] tessellates the surface into strip-compatible parallel
//!   position/normal/UV arrays.
//! - [`transforms`] composes the per-frame projection, model-view and
//!   normal matrices.
//! - [`lighting`] resolves the UI control values into shader uniforms.
//! - [`camera`] accumulates pointer-drag rotation.
//! - [`renderer`] owns GPU buffers and issues the strip draws.
//! - [`viewer`] wires everything into a winit event loop.

pub mod camera;
pub mod cli;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod renderer;
pub mod transforms;
pub mod viewer;

pub use error::{RenderError, RenderResult};
pub use geometry::{tessellate, StripLayout, SurfaceBuffers};
