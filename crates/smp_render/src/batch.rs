//! CPU-built quad mesh streamed to the GPU once per frame.
//!
//! Callers hand over a back-to-front list of [`Quad`]s. `build_mesh` turns
//! them into one vertex/index buffer pair plus a list of draw calls, merging
//! consecutive quads that share a texture so each run needs a single
//! `draw_indexed`. Buffers grow to the next power of two and never shrink.

use std::collections::HashMap;
use std::sync::Arc;

use smp_core::geometry::Rect;
use wgpu::util::DeviceExt;

use crate::camera::Camera2D;
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;
use crate::vertex::QuadVertex;

/// Texture key of the built-in 1x1 white texture used for solid fills.
pub const WHITE_TEXTURE: &str = "__white";

pub const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// One axis-aligned sprite. `rect` is in world units with a top-left origin;
/// `uv` is `[u0, v0, u1, v1]` where `(u0, v0)` maps to the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad<'a> {
    pub texture_key: &'a str,
    pub rect: Rect,
    pub uv: [f32; 4],
    pub color: [f32; 4],
}

impl<'a> Quad<'a> {
    pub fn solid(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            texture_key: WHITE_TEXTURE,
            rect,
            uv: FULL_UV,
            color,
        }
    }

    pub fn textured(texture_key: &'a str, rect: Rect, uv: [f32; 4]) -> Self {
        Self {
            texture_key,
            rect,
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

pub fn build_mesh(quads: &[Quad<'_>]) -> (Vec<QuadVertex>, Vec<u32>, Vec<DrawCall>) {
    let mut vertices = Vec::with_capacity(quads.len() * 4);
    let mut indices = Vec::with_capacity(quads.len() * 6);
    let mut draw_calls: Vec<DrawCall> = Vec::with_capacity(8);

    for quad in quads {
        let Rect { x, y, w, h } = quad.rect;
        let [u0, v0, u1, v1] = quad.uv;
        let base_index = vertices.len() as u32;

        vertices.push(QuadVertex {
            position: [x, y],
            tex_coords: [u0, v0],
            color: quad.color,
        });
        vertices.push(QuadVertex {
            position: [x + w, y],
            tex_coords: [u1, v0],
            color: quad.color,
        });
        vertices.push(QuadVertex {
            position: [x + w, y + h],
            tex_coords: [u1, v1],
            color: quad.color,
        });
        vertices.push(QuadVertex {
            position: [x, y + h],
            tex_coords: [u0, v1],
            color: quad.color,
        });

        let draw_start = indices.len() as u32;
        indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
        push_draw_call(&mut draw_calls, quad.texture_key, draw_start, 6);
    }

    (vertices, indices, draw_calls)
}

/// Append a draw call, merging with the previous one when the texture matches
/// and the indices are contiguous.
pub fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: &str,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key: Arc::from(texture_key),
        index_start,
        index_count,
    });
}

pub fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<&str> = None;
    for draw in draw_calls {
        let key: &str = &draw.texture_key;
        if current != Some(key) {
            current = Some(key);
            binds += 1;
        }
    }
    binds
}

struct GpuSpriteTexture {
    /// Held so the texture lives as long as its bind group.
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Owns the sprite pipeline, every loaded texture and the per-frame buffers.
pub struct SpriteBatch {
    pipeline: SpritePipeline,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_capacity: usize,
    index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    quad_count: usize,
}

impl SpriteBatch {
    pub fn new(gpu: &GpuContext, camera: &Camera2D) -> Self {
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let mut batch = Self {
            pipeline,
            textures: HashMap::new(),
            vertex_buffer: create_vertex_buffer(&gpu.device, 1),
            index_buffer: create_index_buffer(&gpu.device, 1),
            camera_buffer,
            camera_bind_group,
            vertex_capacity: 1,
            index_capacity: 1,
            draw_calls: Vec::new(),
            quad_count: 0,
        };
        let white = Texture::white(&gpu.device, &gpu.queue);
        batch.insert_texture(gpu, WHITE_TEXTURE, white);
        batch
    }

    pub fn insert_texture(&mut self, gpu: &GpuContext, key: &str, texture: Texture) {
        let bind_group = self
            .pipeline
            .create_texture_bind_group(&gpu.device, &texture);
        self.textures.insert(
            Arc::from(key),
            GpuSpriteTexture {
                _texture: texture,
                bind_group,
            },
        );
    }

    pub fn draw_call_count(&self) -> usize {
        self.draw_calls.len()
    }

    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    pub fn texture_bind_count(&self) -> usize {
        count_texture_binds(&self.draw_calls)
    }

    /// Rebuild the mesh from `quads` and upload it together with the camera.
    pub fn prepare(&mut self, gpu: &GpuContext, camera: &Camera2D, quads: &[Quad<'_>]) {
        let (vertices, indices, draw_calls) = build_mesh(quads);
        self.ensure_capacity(&gpu.device, vertices.len(), indices.len());
        self.quad_count = quads.len();
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );
    }

    /// Clear `view` to `clear_color` and draw the prepared mesh.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sprite Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        if self.draw_calls.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut last_bound: Option<&str> = None;
        for draw in &self.draw_calls {
            let Some(texture) = self.textures.get(&draw.texture_key) else {
                log::warn!("Skipping draw with unknown texture '{}'", draw.texture_key);
                continue;
            };
            if last_bound != Some(&*draw.texture_key) {
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                last_bound = Some(&*draw.texture_key);
            }
            render_pass.draw_indexed(
                draw.index_start..(draw.index_start + draw.index_count),
                0,
                0..1,
            );
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<QuadVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
