//! wgpu Renderer
//!
//! `RenderContext` on top of a window surface. Every node gets its own
//! uniform buffer and bind group (uniforms + texture + repeating sampler);
//! pipelines are created on first use per material state.
//!
//! Draw order: opaque nodes first, then translucent nodes back to front.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{Mat4, Quat};
use image::RgbaImage;
use winit::window::Window;

use super::context::{FrameView, MeshHandle, RenderContext, TextureHandle};
use super::gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
use super::shader::{GlobalUniforms, ObjectUniforms, SCENE_SHADER};
use crate::error::SceneError;
use crate::material::{Material, Side};
use crate::mesh::{MeshBuffers, MeshVertex};
use crate::scene::{NodeId, SceneNode};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture: Option<TextureHandle>,
}

/// Render state that selects a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    double_sided: bool,
    blended: bool,
    depth_write: bool,
    offset: bool,
    wireframe: bool,
}

impl PipelineKey {
    fn for_material(material: &Material, wireframe: bool) -> Self {
        Self {
            double_sided: material.side == Side::Double,
            blended: material.transparent,
            depth_write: material.depth_write,
            offset: material.polygon_offset,
            wireframe: wireframe || material.wireframe,
        }
    }
}

struct DrawItem {
    node: NodeId,
    mesh: MeshHandle,
    key: PipelineKey,
    depth: f32,
}

/// Window renderer.
pub struct WgpuRenderer {
    gpu: GpuContext,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    object_layout: wgpu::BindGroupLayout,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    meshes: HashMap<MeshHandle, GpuMesh>,
    textures: HashMap<TextureHandle, GpuTexture>,
    objects: HashMap<NodeId, ObjectSlot>,
    next_mesh: u32,
    next_texture: u32,
    warned_wireframe: bool,
}

impl WgpuRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, SceneError> {
        let gpu = GpuContext::new(window, GpuContextConfig::default())?;
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let globals: GlobalUniforms = bytemuck::Zeroable::zeroed();
        let globals_buffer = gpu.create_uniform_buffer("Globals", &globals);
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // Surface textures tile across walls and floors
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Repeat Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white_texture = gpu.create_rgba_texture("White Texture", 1, 1, &[255, 255, 255, 255]);
        let white = GpuTexture {
            view: white_texture.create_view(&wgpu::TextureViewDescriptor::default()),
            _texture: white_texture,
        };

        Ok(Self {
            gpu,
            shader,
            pipeline_layout,
            object_layout,
            globals_buffer,
            globals_bind_group,
            sampler,
            white,
            pipelines: HashMap::new(),
            meshes: HashMap::new(),
            textures: HashMap::new(),
            objects: HashMap::new(),
            next_mesh: 0,
            next_texture: 0,
            warned_wireframe: false,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    fn create_pipeline(&self, key: PipelineKey) -> wgpu::RenderPipeline {
        let blend = if key.blended {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };
        let bias = if key.offset {
            wgpu::DepthBiasState {
                constant: -2,
                slope_scale: -1.0,
                clamp: 0.0,
            }
        } else {
            wgpu::DepthBiasState::default()
        };

        self.gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.gpu.format(),
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: if key.double_sided {
                        None
                    } else {
                        Some(wgpu::Face::Back)
                    },
                    polygon_mode: if key.wireframe {
                        wgpu::PolygonMode::Line
                    } else {
                        wgpu::PolygonMode::Fill
                    },
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: key.depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias,
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    fn object_bind_group(&self, buffer: &wgpu::Buffer, texture: Option<TextureHandle>) -> wgpu::BindGroup {
        let view = texture
            .and_then(|handle| self.textures.get(&handle))
            .map_or(&self.white.view, |t| &t.view);
        self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &self.object_layout,
            entries: &[
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
        })
    }

    /// Write a node's uniforms, creating or rebinding its slot as needed.
    fn prepare_object(&mut self, id: NodeId, node: &SceneNode, model: Mat4) {
        let uniforms = ObjectUniforms::new(model, &node.material);
        let texture = node.material.texture;
        match self.objects.get(&id) {
            Some(slot) if slot.texture == texture => {
                self.gpu.write_buffer(&slot.buffer, &uniforms);
            }
            Some(slot) => {
                self.gpu.write_buffer(&slot.buffer, &uniforms);
                let bind_group = self.object_bind_group(&slot.buffer, texture);
                if let Some(slot) = self.objects.get_mut(&id) {
                    slot.bind_group = bind_group;
                    slot.texture = texture;
                }
            }
            None => {
                let buffer = self.gpu.create_uniform_buffer("Object Uniforms", &uniforms);
                let bind_group = self.object_bind_group(&buffer, texture);
                self.objects.insert(
                    id,
                    ObjectSlot {
                        buffer,
                        bind_group,
                        texture,
                    },
                );
            }
        }
    }
}

impl RenderContext for WgpuRenderer {
    fn upload_mesh(&mut self, mesh: &MeshBuffers) -> MeshHandle {
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        let vertices = mesh.to_vertices();
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer: self.gpu.create_vertex_buffer("Mesh Vertices", &vertices),
                index_buffer: self.gpu.create_index_buffer("Mesh Indices", &mesh.indices),
                index_count: mesh.indices.len() as u32,
            },
        );
        handle
    }

    fn upload_texture(&mut self, image: &RgbaImage) -> TextureHandle {
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        let (width, height) = image.dimensions();
        let texture = self
            .gpu
            .create_rgba_texture("Surface Texture", width, height, image.as_raw());
        self.textures.insert(
            handle,
            GpuTexture {
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
                _texture: texture,
            },
        );
        handle
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        self.meshes.remove(&handle);
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(&handle);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), SceneError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(SceneError::RendererInit("out of GPU memory".into()));
            }
            Err(e) => {
                tracing::warn!("[WgpuRenderer] Skipping frame: {:?}", e);
                return Ok(());
            }
        };

        self.gpu
            .write_buffer(&self.globals_buffer, &GlobalUniforms::from_frame(frame));

        let wireframe = frame.wireframe && self.gpu.wireframe_supported;
        if frame.wireframe && !self.gpu.wireframe_supported && !self.warned_wireframe {
            tracing::warn!("[WgpuRenderer] Wireframe requested but not supported by this adapter");
            self.warned_wireframe = true;
        }

        let camera_rotation = Quat::from_mat4(&frame.camera.view.inverse());
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        for (id, node) in frame.graph.iter() {
            seen.insert(id);
            if !node.visible || !self.meshes.contains_key(&node.mesh) {
                continue;
            }
            let t = node.transform;
            let model = if node.billboard {
                Mat4::from_scale_rotation_translation(t.scale, camera_rotation, t.translation)
            } else {
                t.matrix()
            };
            self.prepare_object(id, node, model);
            let mut key = PipelineKey::for_material(&node.material, wireframe);
            key.wireframe &= self.gpu.wireframe_supported;
            items.push(DrawItem {
                node: id,
                mesh: node.mesh,
                key,
                depth: t.translation.distance_squared(frame.camera.position),
            });
        }
        self.objects.retain(|id, _| seen.contains(id));

        // Opaque first; translucent back to front
        items.sort_by(|a, b| {
            a.key
                .blended
                .cmp(&b.key.blended)
                .then_with(|| {
                    if a.key.blended {
                        b.depth.total_cmp(&a.depth)
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
        });

        for item in &items {
            if !self.pipelines.contains_key(&item.key) {
                let pipeline = self.create_pipeline(item.key);
                self.pipelines.insert(item.key, pipeline);
            }
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let [r, g, b] = frame.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
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
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for item in &items {
                let (Some(pipeline), Some(mesh), Some(slot)) = (
                    self.pipelines.get(&item.key),
                    self.meshes.get(&item.mesh),
                    self.objects.get(&item.node),
                ) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &slot.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn dispose(&mut self) {
        self.objects.clear();
        self.meshes.clear();
        self.textures.clear();
        self.pipelines.clear();
    }
}
