use glam::Mat4;
use tracing::{debug, warn};
use wgpu::*;

use crate::controller::PhysicsWorld;
use crate::model::Scene;
use crate::utils::{Mesh, MeshBuffer, Vertex};
use crate::view::GpuContext;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Per-object uniform block, laid out like `ObjectUniform` in the shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, view: Mat4, projection: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
        }
    }
}

/// Uploaded geometry with a flat colour.
pub struct RenderMesh {
    pub buffer: MeshBuffer,
    pub color: [f32; 3],
}

impl RenderMesh {
    pub fn new(device: &Device, mesh: &Mesh, color: [f32; 3]) -> Self {
        if mesh.is_empty() {
            warn!(?color, "uploading an empty mesh");
        }
        debug!(triangles = mesh.triangle_count(), ?color, "mesh uploaded");
        Self { buffer: mesh.upload(device), color }
    }

    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        if self.buffer.index_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.buffer.vertex_buffer.slice(..));
        pass.set_index_buffer(self.buffer.index_buffer.slice(..), IndexFormat::Uint32);
        pass.draw_indexed(0..self.buffer.index_count, 0, 0..1);
    }
}

/// The unshaded flat-colour program: one vertex and one fragment source.
pub struct UnshadedShader {
    pub bind_group_layout: BindGroupLayout,
    pub pipeline: RenderPipeline,
    pub wireframe_pipeline: Option<RenderPipeline>,
}

impl UnshadedShader {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let vert = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("unshaded_vert"),
            source: ShaderSource::Wgsl(include_str!("../shaders/unshaded_vert.wgsl").into()),
        });
        let frag = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("unshaded_frag"),
            source: ShaderSource::Wgsl(include_str!("../shaders/unshaded_frag.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("unshaded_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = create_pipeline(device, &layout, &vert, &frag, format, PolygonMode::Fill, "unshaded_pipeline");
        let wireframe_pipeline = if device.features().contains(Features::POLYGON_MODE_LINE) {
            Some(create_pipeline(device, &layout, &vert, &frag, format, PolygonMode::Line, "unshaded_wireframe_pipeline"))
        } else {
            tracing::warn!("POLYGON_MODE_LINE unsupported, wireframe mode disabled");
            None
        };

        Self { bind_group_layout, pipeline, wireframe_pipeline }
    }

    /// Bind the program for the draws that follow. Falls back to filled
    /// polygons when wireframe is unavailable.
    pub fn use_program(&self, pass: &mut RenderPass<'_>, wireframe: bool) {
        match (&self.wireframe_pipeline, wireframe) {
            (Some(wf), true) => pass.set_pipeline(wf),
            _ => pass.set_pipeline(&self.pipeline),
        }
    }

    /// Uniform buffer plus bind group for one object's uniforms.
    pub fn create_object_binding(&self, device: &Device) -> (Buffer, BindGroup) {
        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some("object_uniform"),
            size: std::mem::size_of::<ObjectUniform>() as BufferAddress,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
        });
        (buffer, bind_group)
    }
}

fn create_pipeline(
    device: &Device,
    layout: &PipelineLayout,
    vert: &ShaderModule,
    frag: &ShaderModule,
    format: TextureFormat,
    polygon_mode: PolygonMode,
    label: &str,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: VertexState {
            module: vert,
            entry_point: Some("vs_main"),
            buffers: &[VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
                step_mode: VertexStepMode::Vertex,
                attributes: &[
                    VertexAttribute { offset: 0, shader_location: 0, format: VertexFormat::Float32x3 },
                    VertexAttribute { offset: 12, shader_location: 1, format: VertexFormat::Float32x3 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(FragmentState {
            module: frag,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState { format, blend: Some(BlendState::REPLACE), write_mask: ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            // the walls are seen from inside the box
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

/// Tessellated overlay ready for drawing on top of the scene.
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
}

/// Everything needed to draw a frame besides the scene itself.
pub struct RenderState {
    pub shader: UnshadedShader,
    pub depth_texture: Texture,
    pub depth_view: TextureView,
    pub clear_color: Color,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl RenderState {
    pub fn new(gpu: &GpuContext, clear_color: Color) -> Self {
        let shader = UnshadedShader::new(&gpu.device, gpu.format);
        let (depth_texture, depth_view) = create_depth_texture(&gpu.device, gpu.config.width, gpu.config.height);
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format, egui_wgpu::RendererOptions::default());

        Self { shader, depth_texture, depth_view, clear_color, egui_renderer }
    }

    pub fn resize(&mut self, device: &Device, width: u32, height: u32) {
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Clear, draw moving then static objects, draw the overlay, present.
    pub fn draw_frame(
        &mut self,
        gpu: &GpuContext,
        scene: &Scene,
        world: &PhysicsWorld,
        view: Mat4,
        projection: Mat4,
        wireframe: bool,
        overlay: Option<OverlayFrame>,
    ) -> Result<(), SurfaceError> {
        let frame = gpu.surface.get_current_texture()?;
        let target = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.shader.use_program(&mut rp, wireframe);
            scene.draw(&gpu.queue, &mut rp, view, projection, world);
        }

        if let Some(overlay) = overlay {
            self.draw_overlay(gpu, &mut encoder, &target, overlay);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn draw_overlay(&mut self, gpu: &GpuContext, encoder: &mut CommandEncoder, target: &TextureView, overlay: OverlayFrame) {
        for (id, image_delta) in &overlay.textures_delta.set {
            self.egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            encoder,
            &overlay.primitives,
            &overlay.screen_descriptor,
        );

        {
            let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &overlay.primitives, &overlay.screen_descriptor);
        }

        for id in &overlay.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
