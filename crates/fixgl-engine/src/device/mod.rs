//! wgpu execution of the hardware command interface.
//!
//! [`Gpu`] owns the adapter/device/queue, [`TargetTextures`] back one render target,
//! and [`WgpuHw`] turns [`crate::hw::HwContext`] calls into cached render pipelines
//! and a per-scene render pass. [`read_color`] copies a target back to the CPU.

mod backend;
mod gpu;
mod init;
mod pipeline;
mod readback;
mod target;

pub use backend::{scissor_rect, triangle_list, wgpu_viewport, DrawUniforms, WgpuHw};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use pipeline::{PipelineCache, PipelineKey};
pub use readback::{read_color, ColorImage};
pub use target::TargetTextures;
