//! WebGPU back-end for the [`Renderer`] trait.
//!
//! Chunk meshes arrive as chunk-local vertices plus a world offset. They are translated
//! into one frame-wide vertex list per pass, uploaded in `end_frame` and drawn in a
//! single render pass: opaque triangles, then transparent triangles, then the outline
//! of the targeted block.
//!
//! # Resources
//!
//! - Group 0: the camera uniform, rewritten every `begin_frame`
//! - Group 1: the block atlas and its sampler
//! - One growable vertex buffer per pass, reused across frames

use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::{info, warn};
use thiserror::Error;
use winit::window::Window;

use super::renderer::{RenderPass, Renderer};
use super::texture::{AtlasImage, Texture};
use super::vertex::Vertex;
use crate::engine_state::camera_state::{camera::CameraUniform, CameraState};

const SHADER_SOURCE: &str = include_str!("shaders/voxel.wgsl");

const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.45,
    g: 0.65,
    b: 0.95,
    a: 1.0,
};

const OUTLINE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// How far the outline sits outside the block so it does not z-fight with its faces.
const OUTLINE_MARGIN: f32 = 0.002;

/// Vertices in a block outline: twelve edges as a line list.
const OUTLINE_VERTICES: usize = 24;

/// Errors raised while opening the GPU.
#[derive(Error, Debug)]
pub enum GpuRendererError {
    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("could not open device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("the adapter offers no surface format")]
    UnsupportedSurface,
}

/// A vertex buffer that is rewritten every frame and grows to the largest frame seen.
struct FrameVertexBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl FrameVertexBuffer {
    const INITIAL_CAPACITY: usize = 1 << 12;

    fn new(device: &wgpu::Device, label: &'static str) -> Self {
        FrameVertexBuffer {
            label,
            buffer: Self::allocate(device, label, Self::INITIAL_CAPACITY),
            capacity: Self::INITIAL_CAPACITY,
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) {
        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.label, self.capacity);
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.len = vertices.len() as u32;
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, pipeline: &wgpu::RenderPipeline) {
        if self.len == 0 {
            return;
        }
        let bytes = self.len as wgpu::BufferAddress * std::mem::size_of::<Vertex>() as wgpu::BufferAddress;
        render_pass.set_pipeline(pipeline);
        render_pass.set_vertex_buffer(0, self.buffer.slice(..bytes));
        render_pass.draw(0..self.len, 0..1);
    }
}

/// Draws the world into a window surface with wgpu.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    depth_texture: Texture,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    atlas_bind_group_layout: wgpu::BindGroupLayout,
    atlas_bind_group: wgpu::BindGroup,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,
    opaque_vertices: Vec<Vertex>,
    transparent_vertices: Vec<Vertex>,
    outline_vertices: Vec<Vertex>,
    opaque_buffer: FrameVertexBuffer,
    transparent_buffer: FrameVertexBuffer,
    outline_buffer: FrameVertexBuffer,
}

impl GpuRenderer {
    /// Opens the GPU and configures a surface for `window`, blocking until it is ready.
    pub fn new(window: Arc<Window>) -> Result<Self, GpuRendererError> {
        pollster::block_on(Self::create(window))
    }

    async fn create(window: Arc<Window>) -> Result<Self, GpuRendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Voxel Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(GpuRendererError::UnsupportedSurface)?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_texture = Texture::create_depth_texture(&device, &surface_config, "Depth Texture");

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let atlas_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Atlas Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
        let blank = Texture::from_atlas(&device, &queue, &AtlasImage::blank());
        let atlas_bind_group = Self::atlas_bind_group(&device, &atlas_bind_group_layout, &blank);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Voxel Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &atlas_bind_group_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Voxel Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let build = |label: &str,
                     fragment_entry: &str,
                     topology: wgpu::PrimitiveTopology,
                     blend: wgpu::BlendState,
                     depth_write_enabled: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: match topology {
                        wgpu::PrimitiveTopology::TriangleList => Some(wgpu::Face::Back),
                        _ => None,
                    },
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: Texture::DEPTH_FORMAT,
                    depth_write_enabled,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };
        let opaque_pipeline = build(
            "Opaque Pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::REPLACE,
            true,
        );
        let transparent_pipeline = build(
            "Transparent Pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );
        let outline_pipeline = build(
            "Outline Pipeline",
            "fs_line",
            wgpu::PrimitiveTopology::LineList,
            wgpu::BlendState::REPLACE,
            false,
        );

        let opaque_buffer = FrameVertexBuffer::new(&device, "Opaque Vertices");
        let transparent_buffer = FrameVertexBuffer::new(&device, "Transparent Vertices");
        let outline_buffer = FrameVertexBuffer::new(&device, "Outline Vertices");

        info!(
            "GPU renderer ready: {:?} surface at {}x{}",
            format, surface_config.width, surface_config.height
        );

        Ok(GpuRenderer {
            surface,
            device,
            queue,
            surface_config,
            depth_texture,
            camera_buffer,
            camera_bind_group,
            atlas_bind_group_layout,
            atlas_bind_group,
            opaque_pipeline,
            transparent_pipeline,
            outline_pipeline,
            opaque_vertices: Vec::new(),
            transparent_vertices: Vec::new(),
            outline_vertices: Vec::new(),
            opaque_buffer,
            transparent_buffer,
            outline_buffer,
        })
    }

    fn atlas_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Atlas Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture =
            Texture::create_depth_texture(&self.device, &self.surface_config, "Depth Texture");
    }
}

impl Renderer for GpuRenderer {
    fn upload_atlas(&mut self, atlas: &AtlasImage) {
        let texture = Texture::from_atlas(&self.device, &self.queue, atlas);
        self.atlas_bind_group =
            Self::atlas_bind_group(&self.device, &self.atlas_bind_group_layout, &texture);
    }

    fn begin_frame(&mut self, camera: &CameraState) {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&camera.camera_uniform),
        );
        self.opaque_vertices.clear();
        self.transparent_vertices.clear();
        self.outline_vertices.clear();
    }

    fn draw_chunk_mesh(&mut self, offset: Vector3<f32>, vertices: &[Vertex], pass: RenderPass) {
        let target = match pass {
            RenderPass::Opaque => &mut self.opaque_vertices,
            RenderPass::Transparent => &mut self.transparent_vertices,
        };
        append_translated(target, offset, vertices);
    }

    fn draw_block_highlight(&mut self, block: Point3<i32>) {
        self.outline_vertices.extend_from_slice(&outline_vertices(block));
    }

    fn end_frame(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                return;
            }
            Err(err) => {
                warn!("Skipping frame: {}", err);
                return;
            }
        };

        self.opaque_buffer
            .upload(&self.device, &self.queue, &self.opaque_vertices);
        self.transparent_buffer
            .upload(&self.device, &self.queue, &self.transparent_vertices);
        self.outline_buffer
            .upload(&self.device, &self.queue, &self.outline_vertices);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("World Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_bind_group(1, &self.atlas_bind_group, &[]);
            self.opaque_buffer
                .draw(&mut render_pass, &self.opaque_pipeline);
            self.transparent_buffer
                .draw(&mut render_pass, &self.transparent_pipeline);
            self.outline_buffer
                .draw(&mut render_pass, &self.outline_pipeline);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
    }
}

/// Appends chunk-local `vertices` to `target`, moved into world space by `offset`.
fn append_translated(target: &mut Vec<Vertex>, offset: Vector3<f32>, vertices: &[Vertex]) {
    target.extend(vertices.iter().map(|vertex| Vertex {
        position: [
            vertex.position[0] + offset.x,
            vertex.position[1] + offset.y,
            vertex.position[2] + offset.z,
        ],
        ..*vertex
    }));
}

/// The twelve edges of a block's box as a line list, slightly outside the block.
fn outline_vertices(block: Point3<i32>) -> [Vertex; OUTLINE_VERTICES] {
    let min = [
        block.x as f32 - OUTLINE_MARGIN,
        block.y as f32 - OUTLINE_MARGIN,
        block.z as f32 - OUTLINE_MARGIN,
    ];
    let max = [
        block.x as f32 + 1.0 + OUTLINE_MARGIN,
        block.y as f32 + 1.0 + OUTLINE_MARGIN,
        block.z as f32 + 1.0 + OUTLINE_MARGIN,
    ];
    // Corner `i` takes the max on axis `a` when bit `a` of `i` is set.
    let corner = |i: usize| Vertex {
        position: [
            if i & 1 == 0 { min[0] } else { max[0] },
            if i & 2 == 0 { min[1] } else { max[1] },
            if i & 4 == 0 { min[2] } else { max[2] },
        ],
        uv: [0.0, 0.0],
        color: OUTLINE_COLOR,
    };

    let mut vertices = [Vertex::default(); OUTLINE_VERTICES];
    let mut next = 0;
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                vertices[next] = corner(i);
                vertices[next + 1] = corner(i | bit);
                next += 2;
            }
        }
    }
    vertices
}
