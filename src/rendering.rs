//! Rendering system with wgpu pipelines for the wave scene.
//!
//! Three pipelines share two small uniform buffers: the lit solid surface,
//! the translucent wire overlays (line lists), and the unlit point clouds
//! (foam, sparks, halo). Dirty buffers are re-uploaded before each pass.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::error;
use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::params::CaptureConfig;
use crate::scene::Scene;
use crate::surface::{ColorVertex, SurfaceVertex};

/// Graphics initialization failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Per-frame globals (view-projection + clock)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    time: f32,
    _padding: [f32; 3],
}

/// Light rig uniform: ambient term, three point lights, surface base color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct LightsUniform {
    ambient: [f32; 4],
    positions: [[f32; 4]; 3],
    colors: [[f32; 4]; 3],
    surface_color: [f32; 4],
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    wave_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    solid_buffer: wgpu::Buffer,
    tri_index_buffer: wgpu::Buffer,
    overlay_buffers: [wgpu::Buffer; 2],
    line_index_buffer: wgpu::Buffer,
    foam_buffer: wgpu::Buffer,
    spark_buffer: wgpu::Buffer,
    halo_buffer: wgpu::Buffer,
    globals_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    wave_bind_group: wgpu::BindGroup,
    unlit_bind_group: wgpu::BindGroup,
    tri_index_count: u32,
    line_index_count: u32,
    foam_count: u32,
    spark_count: u32,
    halo_count: u32,
    surface_color: [f32; 3],
    capture_config: Option<CaptureConfig>,
}

impl RenderSystem {
    /// Create new rendering system against the given window
    pub async fn new(
        window: Arc<winit::window::Window>,
        scene: &Scene,
        surface_color: [f32; 3],
        capture_config: Option<CaptureConfig>,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if capture_config.is_some() {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let wave_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wave Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("wave.wgsl").into()),
        });
        let unlit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Unlit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("unlit.wgsl").into()),
        });

        // Vertex and index buffers
        let solid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Vertex Buffer"),
            contents: bytemuck::cast_slice(&scene.surface.solid),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let tri_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Index Buffer"),
            contents: bytemuck::cast_slice(&scene.surface.mesh.tri_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let overlay_buffers = [0, 1].map(|k| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Overlay Vertex Buffer"),
                contents: bytemuck::cast_slice(&scene.surface.overlays[k]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        });
        let line_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Line Index Buffer"),
            contents: bytemuck::cast_slice(&scene.surface.mesh.line_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let foam_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Foam Vertex Buffer"),
            contents: bytemuck::cast_slice(&scene.foam.points),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let spark_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spark Vertex Buffer"),
            contents: bytemuck::cast_slice(&scene.sparks.points),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let halo_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Halo Vertex Buffer"),
            contents: bytemuck::cast_slice(&scene.halo.points),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        // Uniform buffers
        let globals = Globals {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            time: 0.0,
            _padding: [0.0; 3],
        };
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::cast_slice(&[globals]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights = Self::lights_uniform(scene, surface_color);
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[lights]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Bind groups: wave sees globals + lights, unlit sees globals only
        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let wave_bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Wave Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });
        let wave_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wave Bind Group"),
            layout: &wave_bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let unlit_bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Unlit Bind Group Layout"),
            entries: &[uniform_entry(0)],
        });
        let unlit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Unlit Bind Group"),
            layout: &unlit_bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // Pipelines
        let surface_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SurfaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        };
        let color_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        };

        let wave_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wave Pipeline Layout"),
            bind_group_layouts: &[&wave_bind_layout],
            push_constant_ranges: &[],
        });
        let wave_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wave Pipeline"),
            layout: Some(&wave_layout),
            vertex: wgpu::VertexState {
                module: &wave_shader,
                entry_point: Some("vs_main"),
                buffers: &[surface_vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &wave_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let unlit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Unlit Pipeline Layout"),
            bind_group_layouts: &[&unlit_bind_layout],
            push_constant_ranges: &[],
        });
        let unlit_pipeline = |topology, label| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&unlit_layout),
                vertex: wgpu::VertexState {
                    module: &unlit_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[color_vertex_layout.clone()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &unlit_shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };
        let line_pipeline = unlit_pipeline(wgpu::PrimitiveTopology::LineList, "Overlay Pipeline");
        let point_pipeline = unlit_pipeline(wgpu::PrimitiveTopology::PointList, "Point Pipeline");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            wave_pipeline,
            line_pipeline,
            point_pipeline,
            solid_buffer,
            tri_index_buffer,
            overlay_buffers,
            line_index_buffer,
            foam_buffer,
            spark_buffer,
            halo_buffer,
            globals_buffer,
            lights_buffer,
            wave_bind_group,
            unlit_bind_group,
            tri_index_count: scene.surface.mesh.tri_indices.len() as u32,
            line_index_count: scene.surface.mesh.line_indices.len() as u32,
            foam_count: scene.foam.points.len() as u32,
            spark_count: scene.sparks.points.len() as u32,
            halo_count: scene.halo.points.len() as u32,
            surface_color,
            capture_config,
        })
    }

    fn lights_uniform(scene: &Scene, surface_color: [f32; 3]) -> LightsUniform {
        let rig = &scene.lights;
        let [ar, ag, ab] = rig.ambient_color;
        let ai = rig.ambient_intensity;
        LightsUniform {
            ambient: [ar * ai, ag * ai, ab * ai, 0.0],
            positions: rig.lights.map(|l| {
                let p = l.position;
                [p.x, p.y, p.z, 0.0]
            }),
            colors: rig
                .lights
                .map(|l| [l.color[0] * l.intensity, l.color[1] * l.intensity, l.color[2] * l.intensity, 0.0]),
            surface_color: [surface_color[0], surface_color[1], surface_color[2], 1.0],
        }
    }

    /// Reconfigure the swapchain after a host resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Re-upload dirty vertex buffers and the per-frame uniforms
    pub fn upload(&self, scene: &mut Scene) {
        if scene.surface.take_solid_dirty() {
            self.queue
                .write_buffer(&self.solid_buffer, 0, bytemuck::cast_slice(&scene.surface.solid));
        }
        if scene.surface.take_overlays_dirty() {
            for k in 0..2 {
                self.queue.write_buffer(
                    &self.overlay_buffers[k],
                    0,
                    bytemuck::cast_slice(&scene.surface.overlays[k]),
                );
            }
        }
        if scene.foam.take_dirty() {
            self.queue
                .write_buffer(&self.foam_buffer, 0, bytemuck::cast_slice(&scene.foam.points));
        }
        if scene.sparks.take_dirty() {
            self.queue
                .write_buffer(&self.spark_buffer, 0, bytemuck::cast_slice(&scene.sparks.points));
        }
        if scene.halo.take_dirty() {
            self.queue
                .write_buffer(&self.halo_buffer, 0, bytemuck::cast_slice(&scene.halo.points));
        }

        let (view_proj, _eye) = scene.view_proj();
        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
            time: scene.clock_s(),
            _padding: [0.0; 3],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::cast_slice(&[globals]));

        let lights = Self::lights_uniform(scene, self.surface_color);
        self.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&[lights]));
    }

    /// Render a frame (and optionally capture it)
    pub fn render(&self, frame_num: usize) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.012,
                            g: 0.012,
                            b: 0.024,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Solid wave surface
            render_pass.set_pipeline(&self.wave_pipeline);
            render_pass.set_bind_group(0, &self.wave_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.solid_buffer.slice(..));
            render_pass.set_index_buffer(self.tri_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.tri_index_count, 0, 0..1);

            // Wire overlays
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_bind_group(0, &self.unlit_bind_group, &[]);
            render_pass.set_index_buffer(self.line_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            for buffer in &self.overlay_buffers {
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw_indexed(0..self.line_index_count, 0, 0..1);
            }

            // Point clouds
            render_pass.set_pipeline(&self.point_pipeline);
            render_pass.set_vertex_buffer(0, self.foam_buffer.slice(..));
            render_pass.draw(0..self.foam_count, 0..1);
            render_pass.set_vertex_buffer(0, self.spark_buffer.slice(..));
            render_pass.draw(0..self.spark_count, 0..1);
            render_pass.set_vertex_buffer(0, self.halo_buffer.slice(..));
            render_pass.draw(0..self.halo_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(ref config) = self.capture_config {
            self.capture_frame(frame_num, config, &output);
        }

        output.present();

        Ok(())
    }

    /// Capture a frame to disk (capture mode only)
    fn capture_frame(&self, frame_num: usize, config: &CaptureConfig, texture: &wgpu::SurfaceTexture) {
        let (width, height) = (self.config.width, self.config.height);
        let bytes_per_pixel = 4; // RGBA8
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = (unpadded_bytes_per_row + align - 1) / align * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Capture Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, |_| {});
        self.device.poll(wgpu::Maintain::Wait);

        let data = buffer_slice.get_mapped_range();
        let mut image_data = vec![0u8; (width * height * bytes_per_pixel) as usize];
        for y in 0..height {
            let padded_offset = (y * padded_bytes_per_row) as usize;
            let unpadded_offset = (y * unpadded_bytes_per_row) as usize;
            image_data[unpadded_offset..unpadded_offset + unpadded_bytes_per_row as usize]
                .copy_from_slice(&data[padded_offset..padded_offset + unpadded_bytes_per_row as usize]);
        }
        drop(data);
        buffer.unmap();

        let frame_path = format!("{}/frame_{:05}.png", config.frames_dir(), frame_num);
        if let Err(e) =
            image::save_buffer(&frame_path, &image_data, width, height, image::ColorType::Rgba8)
        {
            error!("failed to save frame {frame_num}: {e}");
        }
    }
}
