// src/renderer/mod.rs
// wgpu renderer owning the surface pipeline, vertex buffers and uniforms
// Buffers are replaced wholesale on upload; draws are submitted strip by strip
// RELEVANT FILES:src/geometry/mod.rs,src/lighting/mod.rs,src/shaders/surface.wgsl

mod texture;

pub use texture::{DecodedImage, TextureLoader};

use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{StripLayout, SurfaceBuffers};
use crate::lighting::{LightingInputs, PhongMaterial, SurfaceUniforms};
use crate::transforms::FrameTransforms;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// GPU device/queue plus the configured surface format.
///
/// Constructed once at startup and passed by reference into every renderer
/// call; there is no global GPU state anywhere in the crate.
pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
}

/// Owns the render pipeline and the GPU-resident vertex data for the
/// current tessellation.
pub struct SurfaceRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    texture_view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    position_buffer: wgpu::Buffer,
    normal_buffer: wgpu::Buffer,
    uv_buffer: wgpu::Buffer,
    strips: StripLayout,
    material: PhongMaterial,
    depth_view: wgpu::TextureView,
}

/// Compile the surface shader inside a validation error scope so a bad
/// module surfaces the compiler diagnostic verbatim instead of panicking.
fn create_shader(device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("surface-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/surface.wgsl").into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::shader(err.to_string()));
    }
    Ok(module)
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("surface-depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    texture_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("surface-bind-group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(texture_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

impl SurfaceRenderer {
    pub fn new(
        ctx: &RenderContext,
        buffers: &SurfaceBuffers,
        strip_len: u32,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        let shader = create_shader(&ctx.device)?;

        // Typed binding table, resolved once at pipeline creation. A missing
        // or mistyped binding fails here, not silently at draw time.
        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("surface-bindings"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(
                                    std::mem::size_of::<SurfaceUniforms>() as u64,
                                ),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("surface-pipeline-layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("surface-pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                        },
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                        },
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![2 => Float32x2],
                        },
                    ],
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // strip halves alternate winding, so culling would
                    // drop every other band
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("surface-uniforms"),
            size: std::mem::size_of::<SurfaceUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("surface-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_view = texture::placeholder(&ctx.device, &ctx.queue);
        let bind_group = create_bind_group(
            &ctx.device,
            &bind_group_layout,
            &uniform_buffer,
            &texture_view,
            &sampler,
        );

        let (position_buffer, normal_buffer, uv_buffer, strips) =
            Self::create_vertex_buffers(ctx, buffers, strip_len);
        let depth_view = create_depth_view(&ctx.device, width, height);

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            sampler,
            texture_view,
            bind_group,
            position_buffer,
            normal_buffer,
            uv_buffer,
            strips,
            material: PhongMaterial::default(),
            depth_view,
        })
    }

    fn create_vertex_buffers(
        ctx: &RenderContext,
        buffers: &SurfaceBuffers,
        strip_len: u32,
    ) -> (wgpu::Buffer, wgpu::Buffer, wgpu::Buffer, StripLayout) {
        let position_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("surface-positions"),
                contents: bytemuck::cast_slice(&buffers.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let normal_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("surface-normals"),
                contents: bytemuck::cast_slice(&buffers.normals),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uv_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("surface-texcoords"),
                contents: bytemuck::cast_slice(&buffers.uvs),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let strips = StripLayout::for_vertex_count(buffers.vertex_count(), strip_len);
        (position_buffer, normal_buffer, uv_buffer, strips)
    }

    /// Replace the GPU vertex data wholesale with a new tessellation.
    /// The previous buffers are dropped; no partial update path exists.
    pub fn upload(&mut self, ctx: &RenderContext, buffers: &SurfaceBuffers, strip_len: u32) {
        let (positions, normals, uvs, strips) = Self::create_vertex_buffers(ctx, buffers, strip_len);
        self.position_buffer = positions;
        self.normal_buffer = normals;
        self.uv_buffer = uvs;
        self.strips = strips;
        log::debug!(
            "uploaded {} vertices in {} strips of {}",
            buffers.vertex_count(),
            strips.strip_count,
            strips.strip_len
        );
    }

    /// Swap in a decoded image; the bind group is rebuilt around it.
    pub fn set_texture(&mut self, ctx: &RenderContext, image: &DecodedImage) {
        self.texture_view = texture::upload_rgba(
            &ctx.device,
            &ctx.queue,
            &image.rgba,
            image.width,
            image.height,
            "surface-texture",
        );
        self.bind_group = create_bind_group(
            &ctx.device,
            &self.bind_group_layout,
            &self.uniform_buffer,
            &self.texture_view,
            &self.sampler,
        );
        log::info!("surface texture ready ({}x{})", image.width, image.height);
    }

    pub fn resize(&mut self, ctx: &RenderContext, width: u32, height: u32) {
        self.depth_view = create_depth_view(&ctx.device, width, height);
    }

    /// Bind attributes and uniforms, then issue one triangle-strip draw per
    /// strip of the current layout.
    pub fn draw_frame(
        &self,
        ctx: &RenderContext,
        target: &wgpu::TextureView,
        transforms: &FrameTransforms,
        inputs: &LightingInputs,
    ) {
        let uniforms = SurfaceUniforms::assemble(transforms, &self.material, inputs);
        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("surface-encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("surface-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.set_vertex_buffer(0, self.position_buffer.slice(..));
            pass.set_vertex_buffer(1, self.normal_buffer.slice(..));
            pass.set_vertex_buffer(2, self.uv_buffer.slice(..));
            for range in self.strips.ranges() {
                pass.draw(range, 0..1);
            }
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}
