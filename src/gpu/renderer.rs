//! GPU renderer for the hero scene.
//!
//! Draws the decimated point cloud through the scan-reveal shader, then the
//! pathway connectors and anchor markers once the sweep has completed. Line
//! draws share one uniform buffer addressed with dynamic offsets.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::gpu::mesh::{LineGeometry, LineRange};
use crate::gpu::pipeline;
use crate::pathway::{ANCHORS, PATHWAYS};
use crate::point_cloud::PointCloud;
use crate::scene::BrainScene;

/// Uniform buffer alignment (WebGPU minUniformBufferOffsetAlignment is typically 256 bytes)
const UNIFORM_ALIGNMENT: usize = 256;

/// Connector line tint.
const PATHWAY_COLOR: [f32; 4] = [0.35, 0.9, 1.0, 1.0];

/// Anchor marker tint.
const MARKER_COLOR: [f32; 4] = [1.0, 0.82, 0.45, 1.0];

/// Opacity below which a line draw is skipped entirely.
const OPACITY_EPSILON: f32 = 0.005;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    scan_y: f32,
    glow_band: f32,
    _pad: [f32; 2],
}

/// Per-draw line uniforms, padded to one dynamic-offset slot.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineUniforms {
    color: [f32; 4],
    /// x = opacity, yzw unused.
    params: [f32; 4],
    _padding: [f32; 56],
}

impl LineUniforms {
    fn new(color: [f32; 4], opacity: f32) -> Self {
        Self {
            color,
            params: [opacity, 0.0, 0.0, 0.0],
            _padding: [0.0; 56],
        }
    }
}

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    width: u32,
    height: u32,

    point_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    globals_buffer: wgpu::Buffer,
    line_uniform_buffer: wgpu::Buffer,

    point_buffer: Option<wgpu::Buffer>,
    point_count: u32,

    line_buffer: wgpu::Buffer,
    pathway_ranges: Vec<LineRange>,
    marker_ranges: Vec<LineRange>,
}

impl Renderer {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_slots = PATHWAYS.len() + ANCHORS.len();
        let line_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Uniform Buffer"),
            size: (line_slots * UNIFORM_ALIGNMENT) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &line_uniform_buffer,
                        offset: 0,
                        size: NonZeroU64::new(UNIFORM_ALIGNMENT as u64),
                    }),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let point_pipeline = pipeline::create_point_pipeline(&device, &pipeline_layout, color_format);
        let line_pipeline = pipeline::create_line_pipeline(&device, &pipeline_layout, color_format);

        let line_geometry = LineGeometry::build();
        let line_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: bytemuck::cast_slice(&line_geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            device,
            queue,
            width,
            height,
            point_pipeline,
            line_pipeline,
            bind_group,
            globals_buffer,
            line_uniform_buffer,
            point_buffer: None,
            point_count: 0,
            line_buffer,
            pathway_ranges: line_geometry.pathway_ranges,
            marker_ranges: line_geometry.marker_ranges,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Replace the point buffer after a geometry swap.
    pub fn upload_geometry(&mut self, cloud: &PointCloud) {
        self.point_count = cloud.point_count() as u32;
        self.point_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Point Cloud Vertex Buffer"),
                contents: bytemuck::cast_slice(&cloud.positions),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    pub fn render(&mut self, view: &wgpu::TextureView, scene: &mut BrainScene) {
        if scene.take_geometry_dirty() {
            self.upload_geometry(scene.cloud());
        }

        let aspect = self.width.max(1) as f32 / self.height.max(1) as f32;
        let globals = Globals {
            view_proj: scene
                .camera()
                .view_projection_matrix(aspect)
                .to_cols_array_2d(),
            scan_y: scene.scan_coordinate(),
            glow_band: scene.glow_band(),
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let pathway_opacities = scene.pathway_opacities();
        let marker_pulses = scene.marker_pulses();
        let mut slots = Vec::with_capacity(pathway_opacities.len() + marker_pulses.len());
        for &opacity in &pathway_opacities {
            slots.push(LineUniforms::new(PATHWAY_COLOR, opacity));
        }
        for &pulse in &marker_pulses {
            slots.push(LineUniforms::new(MARKER_COLOR, pulse));
        }
        self.queue
            .write_buffer(&self.line_uniform_buffer, 0, bytemuck::cast_slice(&slots));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.008,
                            g: 0.016,
                            b: 0.045,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(points) = self.point_buffer.as_ref() {
                pass.set_pipeline(&self.point_pipeline);
                pass.set_bind_group(0, &self.bind_group, &[0]);
                pass.set_vertex_buffer(0, points.slice(..));
                pass.draw(0..self.point_count, 0..1);
            }

            if scene.is_complete() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.line_buffer.slice(..));

                for (i, range) in self.pathway_ranges.iter().enumerate() {
                    if pathway_opacities[i] <= OPACITY_EPSILON {
                        continue;
                    }
                    let offset = (i * UNIFORM_ALIGNMENT) as wgpu::DynamicOffset;
                    pass.set_bind_group(0, &self.bind_group, &[offset]);
                    pass.draw(range.start..range.start + range.count, 0..1);
                }

                for (j, range) in self.marker_ranges.iter().enumerate() {
                    if marker_pulses[j] <= OPACITY_EPSILON {
                        continue;
                    }
                    let offset =
                        ((self.pathway_ranges.len() + j) * UNIFORM_ALIGNMENT) as wgpu::DynamicOffset;
                    pass.set_bind_group(0, &self.bind_group, &[offset]);
                    pass.draw(range.start..range.start + range.count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
