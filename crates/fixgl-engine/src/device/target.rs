use crate::context::RenderTarget;

use super::Gpu;

/// Color + depth/stencil textures backing one [`RenderTarget`].
pub struct TargetTextures {
    target: RenderTarget,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_stencil_view: wgpu::TextureView,
}

impl TargetTextures {
    pub fn new(gpu: &Gpu, target: RenderTarget) -> Self {
        let size = wgpu::Extent3d {
            width: target.width.max(1),
            height: target.height.max(1),
            depth_or_array_layers: 1,
        };
        let label = if target.is_display() { "fixgl display" } else { "fixgl offscreen" };

        let color = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: gpu.color_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let depth_stencil = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("fixgl depth/stencil"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: gpu.depth_stencil_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_stencil_view = depth_stencil.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            target,
            color,
            color_view,
            depth_stencil_view,
        }
    }

    #[inline]
    pub fn target(&self) -> RenderTarget {
        self.target
    }

    #[inline]
    pub fn color(&self) -> &wgpu::Texture {
        &self.color
    }

    #[inline]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    #[inline]
    pub fn depth_stencil_view(&self) -> &wgpu::TextureView {
        &self.depth_stencil_view
    }
}
