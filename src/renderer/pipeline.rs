//! WebGPU render pipeline setup
//!
//! Overlays draw into an offscreen accumulation texture that survives between
//! frames, so `Clear::Fade` and `Clear::Keep` can build persistence trails.
//! The texture is copied to the surface at the end of each frame. Surfaces
//! that refuse `COPY_DST` fall back to drawing straight to the swapchain with
//! a full clear every frame.

use wgpu::util::DeviceExt;

use super::present::{Clear, DrawList};
use super::vertex::Vertex;
use crate::Viewport;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Surface size in device pixels
    pub size: (u32, u32),
    /// Layout size the draw lists are authored in
    pub viewport: Viewport,
    accumulation: Option<wgpu::Texture>,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        viewport: Viewport,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("portfolio-fx-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        // The page must show through wherever the overlay is transparent
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let persistent = surface_caps.usages.contains(wgpu::TextureUsages::COPY_DST);
        if !persistent {
            log::warn!("surface does not accept copies; trails disabled");
        }

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if persistent {
            usage |= wgpu::TextureUsages::COPY_DST;
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
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
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [0.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let accumulation =
            persistent.then(|| create_accumulation(&device, config.format, config.width, config.height));

        let size = (config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size,
            viewport,
            accumulation,
        })
    }

    /// Whether fades and kept frames are honoured
    pub fn is_persistent(&self) -> bool {
        self.accumulation.is_some()
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32, viewport: Viewport) {
        self.viewport = viewport;
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            if self.accumulation.is_some() {
                self.accumulation = Some(create_accumulation(
                    &self.device,
                    self.config.format,
                    new_width,
                    new_height,
                ));
            }
        }
    }

    /// Reconfigure after `SurfaceError::Lost`
    pub fn reconfigure(&mut self) {
        let (w, h) = self.size;
        self.resize(w, h, self.viewport);
    }

    /// Convert layout pixels (origin top-left, y down) to clip space
    pub fn screen_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        screen_to_ndc(self.viewport, x, y)
    }

    /// Upload the draw list and render it
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let mut ndc_vertices: Vec<Vertex> = Vec::with_capacity(list.vertices.len() + 6);
        if let Clear::Fade(alpha) = list.clear
            && self.is_persistent()
        {
            ndc_vertices.extend(fade_quad(alpha));
        }
        ndc_vertices.extend(list.vertices.iter().map(|v| {
            let (x, y) = self.screen_to_ndc(v.position[0], v.position[1]);
            Vertex::new(x, y, v.color)
        }));

        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let accumulation_view = self
            .accumulation
            .as_ref()
            .map(|tex| tex.create_view(&wgpu::TextureViewDescriptor::default()));

        let (target, load) = match &accumulation_view {
            Some(view) => {
                let load = match list.clear {
                    Clear::Full => wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    Clear::Fade(_) | Clear::Keep => wgpu::LoadOp::Load,
                };
                (view, load)
            }
            None => (&surface_view, wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        if let Some(accumulation) = &self.accumulation {
            encoder.copy_texture_to_texture(
                accumulation.as_image_copy(),
                output.texture.as_image_copy(),
                wgpu::Extent3d {
                    width: self.config.width,
                    height: self.config.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Blank the canvas once the last overlay has closed
    pub fn clear(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.render(&DrawList {
            clear: Clear::Full,
            vertices: Vec::new(),
        })
    }
}

fn create_accumulation(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("accumulation"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

pub fn screen_to_ndc(viewport: Viewport, x: f32, y: f32) -> (f32, f32) {
    let w = viewport.width.max(1.0);
    let h = viewport.height.max(1.0);
    (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
}

/// Clip-space quad darkening the previous frame
fn fade_quad(alpha: f32) -> [Vertex; 6] {
    let c = [0.0, 0.0, 0.0, alpha.clamp(0.0, 1.0)];
    [
        Vertex::new(-1.0, -1.0, c),
        Vertex::new(1.0, -1.0, c),
        Vertex::new(1.0, 1.0, c),
        Vertex::new(-1.0, -1.0, c),
        Vertex::new(1.0, 1.0, c),
        Vertex::new(-1.0, 1.0, c),
    ]
}
