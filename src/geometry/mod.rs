// src/geometry/mod.rs
// Geometry module hub: surface buffers and strip layout shared by tessellation and rendering
// RELEVANT FILES:src/geometry/kiss.rs,src/renderer/mod.rs

mod kiss;

pub use kiss::tessellate;

/// Parallel vertex arrays for triangle-strip rendering.
///
/// Index `i` in every array refers to the same lattice sample; the arrays
/// are filled by a single paired generator and can never desynchronize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl SurfaceBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_capacity),
            normals: Vec::with_capacity(vertex_capacity),
            uvs: Vec::with_capacity(vertex_capacity),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Partitioning of a vertex buffer into equal-length strips for draw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub strip_len: u32,
    pub strip_count: u32,
}

impl StripLayout {
    /// Derive the strip table from the actual vertex count, so that
    /// `strip_count * strip_len <= vertex_count` holds by construction.
    pub fn for_vertex_count(vertex_count: usize, strip_len: u32) -> Self {
        let strip_count = if strip_len == 0 {
            0
        } else {
            (vertex_count as u32) / strip_len
        };
        Self {
            strip_len,
            strip_count,
        }
    }

    /// Vertex ranges of each strip, in submission order.
    pub fn ranges(&self) -> impl Iterator<Item = std::ops::Range<u32>> + '_ {
        let len = self.strip_len;
        (0..self.strip_count).map(move |i| (i * len)..(i * len + len))
    }
}
