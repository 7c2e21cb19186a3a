//! Framebuffer readback: GPU texture → CPU bitmap.

use crate::error::{CanvasError, Result};

/// Read back an RGBA8 texture into an image (blocking). Creates its own
/// encoder and submit; rows are 256-byte aligned for the copy and unpadded
/// on the way out.
pub fn read_texture_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<image::RgbaImage> {
    let bytes_per_row = (4 * width + 255) & !255;
    let buffer_size = (bytes_per_row * height) as u64;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("snapshot-readback"),
        size: buffer_size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("snapshot-readback-encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    rx.recv()
        .map_err(|e| CanvasError::Readback(e.to_string()))?
        .map_err(|e| CanvasError::Readback(e.to_string()))?;

    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((4 * width * height) as usize);
    for y in 0..height {
        let row_start = (y * bytes_per_row) as usize;
        pixels.extend_from_slice(&data[row_start..row_start + (4 * width) as usize]);
    }
    drop(data);
    buffer.unmap();

    image::RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| CanvasError::Readback("pixel buffer size mismatch".into()))
}
