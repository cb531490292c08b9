use anyhow::{Context, Result};

use super::GpuInit;

/// Owns the wgpu core objects for headless rendering.
///
/// - creates and stores Instance/Device/Queue
/// - records which optional features were actually granted
pub struct Gpu {
    /// Kept alive for the lifetime of the device.
    #[allow(dead_code)]
    instance: wgpu::Instance,

    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Features enabled on `device`.
    features: wgpu::Features,

    init: GpuInit,
}

impl Gpu {
    /// Creates a GPU context without a surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let granted_optional = init.optional_features & adapter.features();
        let missing_optional = init.optional_features.difference(granted_optional);
        if !missing_optional.is_empty() {
            log::info!("gpu: optional features unavailable: {missing_optional:?}");
        }
        let features = init.required_features | granted_optional;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("fixgl device"),
                required_features: features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("gpu: {} ({:?})", info.name, info.backend);

        Ok(Self {
            instance,
            device,
            queue,
            features,
            init,
        })
    }

    /// Blocking variant of [`Gpu::new`] for synchronous callers.
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Features enabled on the device, optional ones included.
    pub fn features(&self) -> wgpu::Features {
        self.features
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.init.color_format
    }

    pub fn depth_stencil_format(&self) -> wgpu::TextureFormat {
        self.init.depth_stencil_format
    }
}
