//! Dependency resolvers.
//!
//! Each resolver reads a handful of [`CapabilityState`](crate::context::CapabilityState)
//! fields and derives the hardware configuration for them. The pure
//! `resolve_*` functions do the derivation; the `apply_*` functions push it.
//! Resolvers never fail: combinations the hardware cannot express become
//! degenerate outcomes instead of errors.

mod cull;
mod depth_stencil;
mod fog;
mod polygon_offset;

pub use cull::{apply_cull, resolve_cull, CullResolution};
pub use depth_stencil::{
    apply_depth_func, apply_depth_write, apply_stencil, resolve_depth_func, resolve_stencil,
};
pub use fog::{resolve_fog, InternalFog};
pub use polygon_offset::{
    apply_polygon_offset, bias_for_mode, resolve_polygon_offset, DepthBias, OffsetEnables,
};
