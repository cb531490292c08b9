/// Initialization parameters for the headless GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Features the device must have. Device creation fails without them.
    pub required_features: wgpu::Features,

    /// Features enabled only when the adapter offers them.
    ///
    /// Line and point polygon modes live here: without them the backend falls
    /// back to filled triangles.
    pub optional_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Color format of render targets.
    ///
    /// Readback assumes a 4-byte-per-pixel format.
    pub color_format: wgpu::TextureFormat,

    /// Combined depth/stencil format of render targets.
    pub depth_stencil_format: wgpu::TextureFormat,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::POLYGON_MODE_LINE | wgpu::Features::POLYGON_MODE_POINT,
            required_limits: wgpu::Limits::default(),
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_stencil_format: wgpu::TextureFormat::Depth24PlusStencil8,
        }
    }
}
