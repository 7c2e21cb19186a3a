//! StrokeCanvas: owns the committed stroke geometry and its GPU state.
//!
//! Geometry arrives incrementally, one segment mesh at a time, and is
//! appended to growing vertex/index buffers; `render` draws whatever is
//! committed without recomputing anything, so frame cost is independent of
//! stroke length. Appends, draws and snapshots all take `&mut self`, which
//! serializes them per the single-producer contract.

use std::sync::Arc;

use log::debug;
use stroke_core::{Rgba, RibbonVertex, SegmentMesh, StrokeStyle};

use crate::error::{CanvasError, Result};
use crate::mesh_store::MeshStore;
use crate::pipeline::StrokeRenderer;
use crate::snapshot::read_texture_rgba;

const INITIAL_VERTEX_CAPACITY: usize = 1024;
const INITIAL_INDEX_CAPACITY: usize = 2048;

/// Texture format used for offscreen snapshot rendering and readback.
const SNAPSHOT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct StrokeCanvas {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    renderer: StrokeRenderer,
    snapshot_renderer: StrokeRenderer,
    store: MeshStore,
    vertex_buf: wgpu::Buffer,
    vertex_capacity: usize,
    index_buf: wgpu::Buffer,
    index_capacity: usize,
    vp_buf: wgpu::Buffer,
    color_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    style: StrokeStyle,
    background: Rgba,
    width: u32,
    height: u32,
}

impl StrokeCanvas {
    /// Create a canvas rendering to targets of `target_format`.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        target_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        style: StrokeStyle,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CanvasError::GraphicsInit(format!(
                "zero-sized canvas target {width}x{height}"
            )));
        }

        let renderer = StrokeRenderer::new(&device, target_format);
        let snapshot_renderer = StrokeRenderer::new(&device, SNAPSHOT_FORMAT);
        let vertex_buf = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);
        let index_buf = create_index_buffer(&device, INITIAL_INDEX_CAPACITY);
        let (vp_buf, color_buf, bind_group) = renderer.create_uniforms(&device);

        let canvas = Self {
            device,
            queue,
            renderer,
            snapshot_renderer,
            store: MeshStore::new(),
            vertex_buf,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            index_buf,
            index_capacity: INITIAL_INDEX_CAPACITY,
            vp_buf,
            color_buf,
            bind_group,
            style,
            background: Rgba::TRANSPARENT,
            width,
            height,
        };
        canvas.write_viewport_uniform();
        canvas.write_color_uniform();
        Ok(canvas)
    }

    /// Create a canvas with its own headless device; used for snapshot
    /// rendering without a window (and for GPU-backed tests).
    pub fn headless(width: u32, height: u32, style: StrokeStyle) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .ok_or_else(|| CanvasError::GraphicsInit("no suitable GPU adapter".into()))?;
        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))
                .map_err(|e| CanvasError::GraphicsInit(e.to_string()))?;
        Self::new(
            Arc::new(device),
            Arc::new(queue),
            SNAPSHOT_FORMAT,
            width,
            height,
            style,
        )
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
        self.write_color_uniform();
    }

    /// Clear color used when rendering to the screen. Snapshots always use a
    /// transparent background regardless of this setting.
    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.write_viewport_uniform();
    }

    /// True iff at least one stroke point was committed since the last erase.
    pub fn has_signature(&self) -> bool {
        !self.store.is_empty()
    }

    /// Append new triangles to the committed geometry. Amortized O(1): the
    /// CPU store grows by Vec doubling and the GPU buffers double when they
    /// run out of capacity; only the not-yet-uploaded tail is written.
    pub fn append_segment_mesh(&mut self, mesh: &SegmentMesh) {
        self.store.append(mesh);
        self.ensure_capacity();
        self.upload_dirty();
    }

    /// Clear all committed strokes; the next render produces only the
    /// background (fully transparent by default).
    pub fn erase(&mut self) {
        self.store.clear();
    }

    /// Draw everything committed into `view`. Invocable every display
    /// refresh; geometry is never recomputed here.
    pub fn render(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let clear = wgpu::Color {
            r: self.background.r as f64,
            g: self.background.g as f64,
            b: self.background.b as f64,
            a: self.background.a as f64,
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stroke-canvas-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if self.store.index_count() > 0 {
            self.renderer.record(
                &mut pass,
                &self.bind_group,
                &self.vertex_buf,
                &self.index_buf,
                self.store.index_count() as u32,
            );
        }
    }

    /// Render the committed strokes into an offscreen buffer and read the
    /// pixels back. The background is transparent wherever no stroke was
    /// drawn; the image reflects exactly the geometry committed at the
    /// moment of the call.
    pub fn snapshot(&mut self) -> Result<image::RgbaImage> {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("snapshot-target"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SNAPSHOT_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Snapshot uniforms are created per call; snapshots are rare and the
        // snapshot pipeline's layout must own its bind group.
        let (vp_buf, color_buf, bind_group) = self.snapshot_renderer.create_uniforms(&self.device);
        self.queue.write_buffer(
            &vp_buf,
            0,
            bytemuck::cast_slice(&StrokeRenderer::viewport_contents(self.width, self.height)),
        );
        self.queue.write_buffer(
            &color_buf,
            0,
            bytemuck::cast_slice(&StrokeRenderer::color_contents(self.style.color())),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("snapshot-encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("snapshot-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if self.store.index_count() > 0 {
                self.snapshot_renderer.record(
                    &mut pass,
                    &bind_group,
                    &self.vertex_buf,
                    &self.index_buf,
                    self.store.index_count() as u32,
                );
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        read_texture_rgba(&self.device, &self.queue, &texture, self.width, self.height)
    }

    fn ensure_capacity(&mut self) {
        let mut grew = false;
        if self.store.vertex_count() > self.vertex_capacity {
            while self.store.vertex_count() > self.vertex_capacity {
                self.vertex_capacity *= 2;
            }
            self.vertex_buf = create_vertex_buffer(&self.device, self.vertex_capacity);
            grew = true;
        }
        if self.store.index_count() > self.index_capacity {
            while self.store.index_count() > self.index_capacity {
                self.index_capacity *= 2;
            }
            self.index_buf = create_index_buffer(&self.device, self.index_capacity);
            grew = true;
        }
        if grew {
            debug!(
                "stroke buffers grown to {} vertices / {} indices",
                self.vertex_capacity, self.index_capacity
            );
            // New buffers start empty; resend everything once.
            self.store.invalidate_upload();
        }
    }

    fn upload_dirty(&mut self) {
        let (voff, verts) = self.store.dirty_vertices();
        if !verts.is_empty() {
            self.queue.write_buffer(
                &self.vertex_buf,
                (voff * std::mem::size_of::<RibbonVertex>()) as u64,
                bytemuck::cast_slice(verts),
            );
        }
        let (ioff, indices) = self.store.dirty_indices();
        if !indices.is_empty() {
            self.queue.write_buffer(
                &self.index_buf,
                (ioff * std::mem::size_of::<u32>()) as u64,
                bytemuck::cast_slice(indices),
            );
        }
        self.store.mark_uploaded();
    }

    fn write_viewport_uniform(&self) {
        self.queue.write_buffer(
            &self.vp_buf,
            0,
            bytemuck::cast_slice(&StrokeRenderer::viewport_contents(self.width, self.height)),
        );
    }

    fn write_color_uniform(&self) {
        self.queue.write_buffer(
            &self.color_buf,
            0,
            bytemuck::cast_slice(&StrokeRenderer::color_contents(self.style.color())),
        );
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("stroke-vertices"),
        size: (capacity * std::mem::size_of::<RibbonVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("stroke-indices"),
        size: (capacity * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
