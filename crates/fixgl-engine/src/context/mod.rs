//! Client-visible GL state and the context that reconciles it onto hardware.
//!
//! - [`CapabilityState`]: pure data, every toggle and parameter
//! - [`RenderTarget`] / [`RowOrder`]: where drawing goes and how its rows are stored
//! - [`GlContext`]: the public GL surface; owns the state and the hardware context

mod caps;
mod config;
mod fixed_function;
mod gl_context;
mod target;

pub use caps::{CapabilityState, DepthRange, StencilParams};
pub use config::ContextConfig;
pub use fixed_function::{AlphaTest, BlendState, FixedFunctionState, FogState};
pub use gl_context::{GlContext, Phase};
pub use target::{Orientation, RenderTarget, RowOrder, TargetKind};
