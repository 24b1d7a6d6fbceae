//! wgpu implementation of [`RenderBackend`] for the carousel stage
//!
//! Frames are drawn in one pass: every item with the lit mesh pipeline, then,
//! when the frame is composited with a highlight, the selected items again
//! with the inverted-hull outline pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::Matrix4;
use wardrobe_core::{
    Composite, Error, FrameDesc, GeometryHandle, GpuResource, Material, MaterialHandle, RenderBackend,
    Result, SurfaceSize, TextureData, TextureHandle, TriangleMesh,
};
use winit::window::Window;

use crate::device::GpuContext;
use crate::mesh::{mesh_to_vertices, CameraUniform, LightUniform, MaterialUniform, MeshVertex, ModelUniform};
use crate::shaders::{MESH_SHADER, OUTLINE_SHADER};

/// nalgebra projections target OpenGL clip space (z in -1..1); wgpu wants 0..1
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct StageRenderConfig {
    pub enable_multisampling: bool,
    pub vsync: bool,
}

impl Default for StageRenderConfig {
    fn default() -> Self {
        Self {
            enable_multisampling: true,
            vsync: true,
        }
    }
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    double_sided: bool,
}

/// Forward renderer presenting into a winit window
pub struct StageRenderer {
    context: GpuContext,
    surface: Option<wgpu::Surface<'static>>,
    surface_config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    msaa_view: Option<wgpu::TextureView>,
    depth_view: wgpu::TextureView,

    material_layout: wgpu::BindGroupLayout,
    model_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    outline_frame_bind_group: wgpu::BindGroup,

    mesh_pipeline: wgpu::RenderPipeline,
    mesh_double_sided_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,

    white_texture: GpuTexture,
    sampler: wgpu::Sampler,

    next_id: u64,
    geometries: HashMap<GeometryHandle, GpuGeometry>,
    textures: HashMap<TextureHandle, GpuTexture>,
    materials: HashMap<MaterialHandle, GpuMaterial>,
}

impl StageRenderer {
    pub async fn new(window: Arc<Window>, config: StageRenderConfig) -> Result<Self> {
        let size = window.inner_size();
        let (context, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("Surface reports no formats".to_string()))?;

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
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);

        let sample_count = if config.enable_multisampling { 4 } else { 1 };
        let msaa_view = create_msaa_view(&context.device, &surface_config, sample_count);
        let depth_view = create_depth_view(&context.device, &surface_config, sample_count);

        let uniform_entry = |binding: u32, visibility: wgpu::ShaderStages| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let both = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        let frame_layout =
            context.create_bind_group_layout("stage_frame_layout", &[uniform_entry(0, both), uniform_entry(1, both)]);
        let outline_frame_layout = context.create_bind_group_layout("stage_outline_frame_layout", &[uniform_entry(0, both)]);
        let model_layout = context.create_bind_group_layout("stage_model_layout", &[uniform_entry(0, both)]);
        let material_layout = context.create_bind_group_layout(
            "stage_material_layout",
            &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
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
        );

        let camera_buffer = context.create_buffer_init(
            "Camera Buffer",
            &[CameraUniform::new(Matrix4::identity(), nalgebra::Point3::origin())],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let light_buffer = context.create_buffer_init(
            "Light Buffer",
            &[LightUniform::from(&wardrobe_core::LightRig::default())],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let frame_bind_group = context.create_bind_group(
            "stage_frame_bind_group",
            &frame_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        );
        let outline_frame_bind_group = context.create_bind_group(
            "stage_outline_frame_bind_group",
            &outline_frame_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        );

        let mesh_shader = context.create_shader_module("Stage Mesh Shader", MESH_SHADER);
        let outline_shader = context.create_shader_module("Stage Outline Shader", OUTLINE_SHADER);

        let mesh_layout = context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Stage Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &material_layout, &model_layout],
            push_constant_ranges: &[],
        });
        let outline_layout = context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Stage Outline Pipeline Layout"),
            bind_group_layouts: &[&outline_frame_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let targets = PipelineTargets {
            format: surface_format,
            sample_count,
        };
        let mesh_pipeline = create_pipeline(
            &context.device,
            &mesh_layout,
            &mesh_shader,
            ("vs_main", "fs_main"),
            Some(wgpu::Face::Back),
            &targets,
            "Stage Mesh",
        );
        let mesh_double_sided_pipeline = create_pipeline(
            &context.device,
            &mesh_layout,
            &mesh_shader,
            ("vs_main", "fs_main"),
            None,
            &targets,
            "Stage Mesh Double Sided",
        );
        // Front faces culled: only the extruded shell's far side survives
        let outline_pipeline = create_pipeline(
            &context.device,
            &outline_layout,
            &outline_shader,
            ("vs_outline", "fs_outline"),
            Some(wgpu::Face::Front),
            &targets,
            "Stage Outline",
        );

        let white_texture = upload_texture(
            &context,
            &TextureData {
                width: 1,
                height: 1,
                pixels: vec![255; 4],
            },
        );
        let sampler = context.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Stage Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::info!(
            "Stage renderer ready: {}x{} {:?}, {}x MSAA",
            surface_config.width,
            surface_config.height,
            surface_format,
            sample_count
        );

        Ok(Self {
            context,
            surface: Some(surface),
            surface_config,
            sample_count,
            msaa_view,
            depth_view,
            material_layout,
            model_layout,
            camera_buffer,
            light_buffer,
            frame_bind_group,
            outline_frame_bind_group,
            mesh_pipeline,
            mesh_double_sided_pipeline,
            outline_pipeline,
            white_texture,
            sampler,
            next_id: 0,
            geometries: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
        })
    }

    /// Resources currently resident on the GPU, excluding renderer internals
    pub fn live_resources(&self) -> usize {
        self.geometries.len() + self.textures.len() + self.materials.len()
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn reconfigure(&mut self) {
        if let Some(surface) = &self.surface {
            surface.configure(&self.context.device, &self.surface_config);
        }
        self.msaa_view = create_msaa_view(&self.context.device, &self.surface_config, self.sample_count);
        self.depth_view = create_depth_view(&self.context.device, &self.surface_config, self.sample_count);
    }

    fn model_bind_group(&self, uniform: ModelUniform) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = self
            .context
            .create_buffer_init("Model Buffer", &[uniform], wgpu::BufferUsages::UNIFORM);
        let bind_group = self.context.create_bind_group(
            "stage_model_bind_group",
            &self.model_layout,
            &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        );
        (buffer, bind_group)
    }
}

impl RenderBackend for StageRenderer {
    fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure();
    }

    fn create_geometry(&mut self, mesh: &TriangleMesh) -> Result<GeometryHandle> {
        if mesh.is_empty() {
            return Err(Error::Gpu("cannot upload an empty mesh".to_string()));
        }
        let (vertices, indices) = mesh_to_vertices(mesh);
        let geometry = GpuGeometry {
            vertex_buffer: self
                .context
                .create_buffer_init("Mesh Vertex Buffer", &vertices, wgpu::BufferUsages::VERTEX),
            index_buffer: self
                .context
                .create_buffer_init("Mesh Index Buffer", &indices, wgpu::BufferUsages::INDEX),
            index_count: indices.len() as u32,
        };
        let handle = GeometryHandle(self.allocate());
        self.geometries.insert(handle, geometry);
        Ok(handle)
    }

    fn create_texture(&mut self, texture: &TextureData) -> Result<TextureHandle> {
        if texture.pixels.len() != (texture.width * texture.height * 4) as usize || texture.width == 0 {
            return Err(Error::Gpu("texture size mismatch".to_string()));
        }
        let uploaded = upload_texture(&self.context, texture);
        let handle = TextureHandle(self.allocate());
        self.textures.insert(handle, uploaded);
        Ok(handle)
    }

    fn create_material(&mut self, material: &Material, map: Option<TextureHandle>) -> Result<MaterialHandle> {
        let view = match map {
            Some(handle) => {
                &self
                    .textures
                    .get(&handle)
                    .ok_or_else(|| Error::Gpu(format!("unknown texture {:?}", handle)))?
                    .view
            }
            None => &self.white_texture.view,
        };

        let buffer = self.context.create_buffer_init(
            "Material Buffer",
            &[MaterialUniform::new(material, map.is_some())],
            wgpu::BufferUsages::UNIFORM,
        );
        let bind_group = self.context.create_bind_group(
            "stage_material_bind_group",
            &self.material_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        );

        let handle = MaterialHandle(self.allocate());
        self.materials.insert(
            handle,
            GpuMaterial {
                buffer,
                bind_group,
                double_sided: material.double_sided,
            },
        );
        Ok(handle)
    }

    fn release(&mut self, resource: GpuResource) -> Result<()> {
        match resource {
            GpuResource::Geometry(handle) => {
                let geometry = self
                    .geometries
                    .remove(&handle)
                    .ok_or_else(|| Error::Gpu(format!("double release of {:?}", resource)))?;
                geometry.vertex_buffer.destroy();
                geometry.index_buffer.destroy();
            }
            GpuResource::Texture(handle) => {
                let texture = self
                    .textures
                    .remove(&handle)
                    .ok_or_else(|| Error::Gpu(format!("double release of {:?}", resource)))?;
                texture.texture.destroy();
            }
            GpuResource::Material(handle) => {
                let material = self
                    .materials
                    .remove(&handle)
                    .ok_or_else(|| Error::Gpu(format!("double release of {:?}", resource)))?;
                material.buffer.destroy();
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &FrameDesc<'_>) -> Result<()> {
        let Some(surface) = &self.surface else {
            return Err(Error::Gpu("render after dispose".to_string()));
        };

        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {:?}", e))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj = OPENGL_TO_WGPU_MATRIX * frame.projection * frame.view;
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(view_proj, frame.eye)),
        );
        self.context
            .queue
            .write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&LightUniform::from(&frame.lights)));

        let highlight = match &frame.composite {
            Composite::Highlighted(style) => Some(style),
            Composite::Direct => None,
        };

        // Resolve handles and per-draw bind groups before the pass borrows them
        let mut resolved = Vec::with_capacity(frame.draws.len());
        for draw in frame.draws {
            let geometry = self
                .geometries
                .get(&draw.geometry)
                .ok_or_else(|| Error::Gpu(format!("unknown geometry {:?}", draw.geometry)))?;
            let material = self
                .materials
                .get(&draw.material)
                .ok_or_else(|| Error::Gpu(format!("unknown material {:?}", draw.material)))?;
            let style = highlight.filter(|_| draw.highlighted);
            let (_buffer, model) = self.model_bind_group(ModelUniform::new(draw.model, style));
            resolved.push((geometry, material, model, style.is_some()));
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stage Render Encoder"),
            });

        let (color_attachment, resolve_target) = match &self.msaa_view {
            Some(msaa_view) => (msaa_view, Some(&view)),
            None => (&view, None),
        };
        let [r, g, b] = frame.clear_color;

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stage Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_attachment,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (geometry, material, model, _) in &resolved {
                let pipeline = if material.double_sided {
                    &self.mesh_double_sided_pipeline
                } else {
                    &self.mesh_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &material.bind_group, &[]);
                render_pass.set_bind_group(2, model, &[]);
                render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                render_pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }

            if highlight.is_some() {
                render_pass.set_pipeline(&self.outline_pipeline);
                render_pass.set_bind_group(0, &self.outline_frame_bind_group, &[]);
                for (geometry, _, model, _) in resolved.iter().filter(|(_, _, _, outlined)| *outlined) {
                    render_pass.set_bind_group(1, model, &[]);
                    render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
                }
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        let leaked = self.live_resources();
        if leaked > 0 {
            log::warn!("Disposing renderer with {} live resources", leaked);
        }
        for (_, geometry) in self.geometries.drain() {
            geometry.vertex_buffer.destroy();
            geometry.index_buffer.destroy();
        }
        for (_, texture) in self.textures.drain() {
            texture.texture.destroy();
        }
        for (_, material) in self.materials.drain() {
            material.buffer.destroy();
        }
        self.white_texture.texture.destroy();
        self.surface = None;
        log::debug!("Stage renderer disposed");
    }
}

struct PipelineTargets {
    format: wgpu::TextureFormat,
    sample_count: u32,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs_entry, fs_entry): (&str, &str),
    cull_mode: Option<wgpu::Face>,
    targets: &PipelineTargets,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Render Pipeline", label)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: vs_entry,
            buffers: &[MeshVertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: fs_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format: targets.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: targets.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

fn create_msaa_view(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, sample_count: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_texture(context: &GpuContext, data: &TextureData) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Material Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    context.queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &data.pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { texture, view }
}
