use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::collections::BTreeMap;
use std::time::Duration;
use walkroom_assets::{TextureAsset, TextureId, TextureStore};
use walkroom_common::ObjectId;
use walkroom_render::FirstPersonCamera;
use walkroom_scene::{Material, Scene, SceneEvent, SceneObject, Side, WaterParams};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    time: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct QuadUniforms {
    model: [[f32; 4]; 4],
    size_repeat: [f32; 4],
    flags: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct WaterUniforms {
    model: [[f32; 4]; 4],
    size_scale: [f32; 4],
    color: [f32; 4],
    flow: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// Unit quad in the XY plane, front face toward +Z.
///
/// UV origin is the top-left texel, so images appear upright.
fn quad_mesh() -> (Vec<Vertex>, Vec<u16>) {
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [-0.5, -0.5], uv: [0.0, 1.0] },
        Vertex { position: [ 0.5, -0.5], uv: [1.0, 1.0] },
        Vertex { position: [ 0.5,  0.5], uv: [1.0, 0.0] },
        Vertex { position: [-0.5,  0.5], uv: [0.0, 0.0] },
    ];
    let indices: Vec<u16> = vec![0, 1, 2, 2, 3, 0];
    (vertices, indices)
}

fn srgb_to_linear(c: f32) -> f64 {
    let c = c as f64;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    /// Frame currently uploaded (animated textures only).
    frame: usize,
    /// Scene time when playback began.
    started: Duration,
}

struct QuadBinding {
    object: ObjectId,
    _uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct WaterBinding {
    bind_group: wgpu::BindGroup,
}

/// wgpu-based room renderer.
pub struct WgpuRenderer {
    quad_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    quad_layout: wgpu::BindGroupLayout,
    water_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    quad_index_count: u32,
    textures: BTreeMap<TextureId, GpuTexture>,
    fallback: GpuTexture,
    quads: Vec<QuadBinding>,
    water: Vec<WaterBinding>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
        store: &TextureStore,
        elapsed: Duration,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                time: [0.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let quad_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
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

        let water_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water_bind_group_layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("repeat_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x2,
                1 => Float32x2,
            ],
        };

        // Textured quad pipeline
        let quad_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::QUAD_SHADER.into()),
        });

        let quad_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &quad_layout],
            push_constant_ranges: &[],
        });

        let quad_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&quad_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &quad_shader,
                entry_point: Some("vs_quad"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout.clone()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &quad_shader,
                entry_point: Some("fs_quad"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Face visibility is decided per object in the fragment shader.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Water pipeline
        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("water_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::WATER_SHADER.into()),
        });

        let water_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("water_pipeline_layout"),
                bind_group_layouts: &[&frame_layout, &water_layout],
                push_constant_ranges: &[],
            });

        let water_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("water_pipeline"),
            layout: Some(&water_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &water_shader,
                entry_point: Some("vs_water"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &water_shader,
                entry_point: Some("fs_water"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Quad mesh
        let (quad_verts, quad_indices) = quad_mesh();
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&quad_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let quad_index_count = quad_indices.len() as u32;

        let fallback = upload_pixels(device, queue, "fallback_texture", 1, 1, &[255, 0, 255, 255]);
        let fallback = GpuTexture {
            view: fallback.create_view(&Default::default()),
            texture: fallback,
            frame: 0,
            started: Duration::ZERO,
        };

        let [r, g, b] = scene.background();
        let clear_color = wgpu::Color {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
            a: 1.0,
        };

        let depth_texture = Self::create_depth_texture(device, width, height);

        let mut renderer = Self {
            quad_pipeline,
            water_pipeline,
            frame_buffer,
            frame_bind_group,
            quad_layout,
            water_layout,
            sampler,
            quad_vertex_buffer,
            quad_index_buffer,
            quad_index_count,
            textures: BTreeMap::new(),
            fallback,
            quads: Vec::new(),
            water: Vec::new(),
            depth_texture,
            surface_format,
            clear_color,
        };

        for obj in scene.objects() {
            match obj.material {
                Material::Textured { texture, .. } => {
                    renderer.ensure_texture(device, queue, store, texture, elapsed);
                    let binding = renderer.create_quad_binding(device, obj);
                    renderer.quads.push(binding);
                }
                Material::Water(params) => {
                    let binding = renderer.create_water_binding(device, obj, &params);
                    renderer.water.push(binding);
                }
            }
        }

        tracing::debug!(
            quads = renderer.quads.len(),
            water = renderer.water.len(),
            textures = renderer.textures.len(),
            "renderer initialized"
        );
        renderer
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Apply scene changes and advance animated textures to `elapsed`.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        events: &[SceneEvent],
        store: &TextureStore,
        elapsed: Duration,
    ) {
        for event in events {
            match *event {
                SceneEvent::TextureReplaced { object, new, .. } => {
                    self.ensure_texture(device, queue, store, new, elapsed);
                    let Some(obj) = scene.get(object) else {
                        tracing::warn!("texture swap for unknown object {object}");
                        continue;
                    };
                    let binding = self.create_quad_binding(device, obj);
                    match self.quads.iter_mut().find(|q| q.object == object) {
                        Some(slot) => *slot = binding,
                        None => self.quads.push(binding),
                    }
                }
            }
        }

        if !events.is_empty() {
            let in_use = scene.textures_in_use();
            self.textures.retain(|id, _| in_use.contains(id));
        }

        for (id, gpu) in self.textures.iter_mut() {
            let Some(asset) = store.get(*id).filter(|a| a.is_animated()) else {
                continue;
            };
            let frame = asset.frame_at(elapsed.saturating_sub(gpu.started));
            if frame != gpu.frame {
                write_frame(queue, &gpu.texture, asset, frame);
                gpu.frame = frame;
            }
        }
    }

    /// Render one frame of the room.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FirstPersonCamera,
        elapsed: Duration,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                time: [elapsed.as_secs_f32(), 0.0, 0.0, 0.0],
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
            pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // Opaque quads
            pass.set_pipeline(&self.quad_pipeline);
            for quad in &self.quads {
                pass.set_bind_group(1, &quad.bind_group, &[]);
                pass.draw_indexed(0..self.quad_index_count, 0, 0..1);
            }

            // Water, blended over what is already drawn
            pass.set_pipeline(&self.water_pipeline);
            for water in &self.water {
                pass.set_bind_group(1, &water.bind_group, &[]);
                pass.draw_indexed(0..self.quad_index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn ensure_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        store: &TextureStore,
        id: TextureId,
        elapsed: Duration,
    ) {
        if self.textures.contains_key(&id) {
            return;
        }
        let Some(asset) = store.get(id) else {
            tracing::error!("texture {id} missing from store; drawing fallback");
            return;
        };
        let (w, h) = asset.dimensions();
        let texture = upload_pixels(device, queue, "scene_texture", w, h, asset.frame(0));
        let view = texture.create_view(&Default::default());
        self.textures.insert(
            id,
            GpuTexture {
                texture,
                view,
                frame: 0,
                started: elapsed,
            },
        );
        tracing::debug!("uploaded texture {id} ({w}x{h}, {} frames)", asset.frame_count());
    }

    fn create_quad_binding(&self, device: &wgpu::Device, obj: &SceneObject) -> QuadBinding {
        let (texture, repeat, side) = match obj.material {
            Material::Textured {
                texture,
                repeat,
                side,
            } => (Some(texture), repeat, side),
            Material::Water(_) => (None, [1.0, 1.0], Side::Double),
        };
        let uniforms = QuadUniforms {
            model: obj.transform.matrix().to_cols_array_2d(),
            size_repeat: [obj.quad.width, obj.quad.height, repeat[0], repeat[1]],
            flags: [if side == Side::Front { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let view = texture
            .and_then(|id| self.textures.get(&id))
            .map(|t| &t.view)
            .unwrap_or(&self.fallback.view);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_bind_group"),
            layout: &self.quad_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
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
        });
        QuadBinding {
            object: obj.id,
            _uniform_buffer: uniform_buffer,
            bind_group,
        }
    }

    fn create_water_binding(
        &self,
        device: &wgpu::Device,
        obj: &SceneObject,
        params: &WaterParams,
    ) -> WaterBinding {
        let [r, g, b] = params.color;
        let uniforms = WaterUniforms {
            model: obj.transform.matrix().to_cols_array_2d(),
            size_scale: [obj.quad.width, obj.quad.height, params.scale, 0.0],
            color: [r, g, b, 1.0],
            flow: [params.flow_direction.x, params.flow_direction.y, 0.0, 0.0],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("water_uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("water_bind_group"),
            layout: &self.water_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        WaterBinding { bind_group }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

fn upload_pixels(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: texture_extent(width, height),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_pixels(queue, &texture, width, height, rgba);
    texture
}

fn write_frame(queue: &wgpu::Queue, texture: &wgpu::Texture, asset: &TextureAsset, frame: usize) {
    let (w, h) = asset.dimensions();
    write_pixels(queue, texture, w, h, asset.frame(frame));
}

fn write_pixels(queue: &wgpu::Queue, texture: &wgpu::Texture, width: u32, height: u32, rgba: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        texture_extent(width, height),
    );
}
