use anyhow::{Context, Result};

use super::{Gpu, TargetTextures};

/// Tightly packed RGBA8 rows, top row first.
pub struct ColorImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ColorImage {
    /// Pixel at storage row `y` (top-left origin).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = ((y * self.width + x) * 4) as usize;
        self.pixels.get(at..at + 4)?.try_into().ok()
    }
}

/// Copies the color texture of `textures` back to the CPU. Blocks until done.
pub fn read_color(gpu: &Gpu, textures: &TargetTextures) -> Result<ColorImage> {
    let format = textures.color().format();
    anyhow::ensure!(
        format.block_copy_size(None) == Some(4),
        "readback needs a 4-byte color format, got {format:?}"
    );

    let width = textures.color().width();
    let height = textures.color().height();
    let unpadded = width * 4;
    let bytes_per_row = unpadded.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

    let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("fixgl readback"),
        size: u64::from(bytes_per_row) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("fixgl readback encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: textures.color(),
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: None,
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    gpu.device()
        .poll(wgpu::PollType::wait_indefinitely())
        .context("failed to wait for readback")?;
    receiver
        .recv()
        .context("readback callback dropped")?
        .context("failed to map readback buffer")?;

    let mut pixels = Vec::with_capacity((unpadded * height) as usize);
    {
        let mapped = slice.get_mapped_range();
        for row in mapped.chunks_exact(bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..unpadded as usize]);
        }
    }
    buffer.unmap();

    Ok(ColorImage { width, height, pixels })
}
