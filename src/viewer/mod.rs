// src/viewer/mod.rs
// Interactive windowed viewer for the KISS surface
// - Creates the window and wgpu surface with winit 0.29
// - Mouse drag rotates the view; keyboard controls stand in for sliders
// - Polls control state once per frame and redraws continuously

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use crate::camera::OrbitRotator;
use crate::error::{RenderError, RenderResult};
use crate::geometry;
use crate::lighting::{LightingInputs, LIGHT_PARAM_BOUND};
use crate::renderer::{RenderContext, SurfaceRenderer, TextureLoader};
use crate::transforms::frame_transforms;

pub const MIN_RESOLUTION: u32 = 2;
pub const MAX_RESOLUTION: u32 = 200;

const LIGHT_STEP: f32 = 0.1;
const OFFSET_STEP: f32 = 0.05;
const ANGLE_STEP_DEG: f32 = 5.0;
const RESOLUTION_STEP: u32 = 2;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
    /// Tessellation resolution (angular subdivision count).
    pub resolution: u32,
    pub texture_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "KISS Surface Viewer".to_string(),
            vsync: true,
            resolution: 20,
            texture_path: None,
        }
    }
}

/// Keyboard-driven scalar controls for the light path and scale point.
/// The render path polls this once per frame and never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct SliderState {
    pub light_param: f32,
    pub scale_angle_deg: f32,
    pub scale_offset: f32,
}

impl Default for SliderState {
    fn default() -> Self {
        let inputs = LightingInputs::default();
        Self {
            light_param: inputs.light_param,
            scale_angle_deg: inputs.scale_angle_deg,
            scale_offset: inputs.scale_offset,
        }
    }
}

impl SliderState {
    pub fn inputs(&self) -> LightingInputs {
        LightingInputs {
            light_param: self.light_param,
            scale_angle_deg: self.scale_angle_deg,
            scale_offset: self.scale_offset,
        }
    }
}

struct FpsCounter {
    frames: u32,
    last_report: Instant,
    current_fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            last_report: Instant::now(),
            current_fps: 0.0,
        }
    }

    fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.last_report.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.current_fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.last_report = Instant::now();
            Some(self.current_fps)
        } else {
            None
        }
    }
}

struct Viewer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    ctx: RenderContext,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: SurfaceRenderer,
    rotator: OrbitRotator,
    sliders: SliderState,
    loader: TextureLoader,
    resolution: u32,
    fps_counter: FpsCounter,
}

impl Viewer {
    async fn new(window: Arc<Window>, config: ViewerConfig) -> RenderResult<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| RenderError::surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::device("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("kissview-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let ctx = RenderContext {
            device,
            queue,
            surface_format,
        };

        let resolution = config.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION);
        let buffers = geometry::tessellate(resolution)?;
        let renderer = SurfaceRenderer::new(
            &ctx,
            &buffers,
            resolution,
            surface_config.width,
            surface_config.height,
        )?;

        let mut loader = TextureLoader::new();
        if let Some(path) = config.texture_path {
            loader.request(path);
        }

        log::info!(
            "viewer ready: {} vertices at resolution {}",
            buffers.vertex_count(),
            resolution
        );

        Ok(Self {
            window,
            surface,
            ctx,
            surface_config,
            renderer,
            rotator: OrbitRotator::new(),
            sliders: SliderState::default(),
            loader,
            resolution,
            fps_counter: FpsCounter::new(),
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.ctx.device, &self.surface_config);
            self.renderer
                .resize(&self.ctx, new_size.width, new_size.height);
        }
    }

    /// Regenerate the tessellation and replace GPU buffers wholesale.
    fn set_resolution(&mut self, resolution: u32) {
        let resolution = resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION);
        if resolution == self.resolution {
            return;
        }
        match geometry::tessellate(resolution) {
            Ok(buffers) => {
                self.renderer.upload(&self.ctx, &buffers, resolution);
                self.resolution = resolution;
                log::info!("resolution changed to {}", resolution);
            }
            Err(err) => log::error!("tessellation failed: {}", err),
        }
    }

    fn handle_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                if *button == MouseButton::Left {
                    self.rotator.set_dragging(*state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.rotator
                    .handle_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(keycode) = key_event.physical_key {
                    self.handle_key(keycode);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, keycode: KeyCode) {
        match keycode {
            KeyCode::ArrowLeft => {
                self.sliders.light_param = (self.sliders.light_param - LIGHT_STEP)
                    .clamp(-LIGHT_PARAM_BOUND, LIGHT_PARAM_BOUND);
            }
            KeyCode::ArrowRight => {
                self.sliders.light_param = (self.sliders.light_param + LIGHT_STEP)
                    .clamp(-LIGHT_PARAM_BOUND, LIGHT_PARAM_BOUND);
            }
            KeyCode::ArrowDown => {
                self.sliders.scale_offset =
                    (self.sliders.scale_offset - OFFSET_STEP).clamp(-1.0, 1.0);
            }
            KeyCode::ArrowUp => {
                self.sliders.scale_offset =
                    (self.sliders.scale_offset + OFFSET_STEP).clamp(-1.0, 1.0);
            }
            KeyCode::KeyQ => {
                self.sliders.scale_angle_deg =
                    (self.sliders.scale_angle_deg - ANGLE_STEP_DEG).rem_euclid(360.0);
            }
            KeyCode::KeyE => {
                self.sliders.scale_angle_deg =
                    (self.sliders.scale_angle_deg + ANGLE_STEP_DEG).rem_euclid(360.0);
            }
            KeyCode::Minus => {
                self.set_resolution(self.resolution.saturating_sub(RESOLUTION_STEP));
            }
            KeyCode::Equal => {
                self.set_resolution(self.resolution + RESOLUTION_STEP);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // finished texture loads land here, superseded ones are discarded
        if let Some(image) = self.loader.poll() {
            self.renderer.set_texture(&self.ctx, &image);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.surface_config.width as f32 / self.surface_config.height as f32;
        let transforms = frame_transforms(self.rotator.view_matrix(), aspect);
        self.renderer
            .draw_frame(&self.ctx, &view, &transforms, &self.sliders.inputs());

        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            self.window.set_title(&format!(
                "KISS Surface Viewer | N: {} | light: {:.1} | FPS: {:.1}",
                self.resolution, self.sliders.light_param, fps
            ));
        }

        Ok(())
    }
}

/// Create the window and drive the event loop until exit.
pub fn run_viewer(config: ViewerConfig) -> anyhow::Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .build(&event_loop)?,
    );

    println!("KISS Surface Viewer");
    println!("Controls:");
    println!("  Drag        - Rotate the view");
    println!("  Left/Right  - Move the light along its parabolic path");
    println!("  Up/Down     - Texture scale-point offset");
    println!("  Q/E         - Texture scale-point angle");
    println!("  -/=         - Decrease/increase tessellation resolution");
    println!("  Esc         - Exit");

    let mut viewer_opt: Option<Viewer> = None;

    event_loop.run(move |event, elwt| {
        match event {
            Event::Resumed => {
                // surface creation must wait for Resumed on some platforms
                if viewer_opt.is_none() {
                    match pollster::block_on(Viewer::new(Arc::clone(&window), config.clone())) {
                        Ok(v) => viewer_opt = Some(v),
                        Err(e) => {
                            // fatal-at-init: report and abort setup, no retry
                            eprintln!("Sorry, could not initialize the graphics context: {}", e);
                            log::error!("viewer init failed: {}", e);
                            elwt.exit();
                        }
                    }
                }
            }
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                if matches!(event, WindowEvent::CloseRequested) {
                    elwt.exit();
                    return;
                }
                let Some(viewer) = viewer_opt.as_mut() else {
                    return;
                };
                viewer.handle_input(event);
                match event {
                    WindowEvent::KeyboardInput {
                        event: key_event, ..
                    } => {
                        if key_event.state == ElementState::Pressed {
                            if let PhysicalKey::Code(KeyCode::Escape) = key_event.physical_key {
                                elwt.exit();
                            }
                        }
                    }
                    WindowEvent::Resized(physical_size) => {
                        viewer.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => match viewer.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = viewer.window.inner_size();
                            viewer.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("Out of GPU memory, exiting");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            log::warn!("surface timeout, skipping frame");
                        }
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
