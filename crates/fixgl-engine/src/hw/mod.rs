//! Hardware command interface.
//!
//! This is the narrow, side-aware command set the state engine reconciles onto.
//! Settings are split per face where the hardware splits them, and there is no
//! clear command: clears are synthesized from draws (see [`crate::clear`]).
//!
//! Implementations:
//! - [`RecordingHw`]: records commands and the latest value of every setting
//! - [`crate::device::WgpuHw`]: executes them on a wgpu device

mod recorder;
mod types;

pub use recorder::{HwCmd, HwSnapshot, RecordingHw};
pub use types::{
    ClipRegion, DepthWrite, HardwareViewport, HwCull, HwPolygonMode, Primitive, ProgramId,
    StencilConfig, Uniform,
};

use crate::gl::CompareFunc;

/// Synchronous hardware context.
///
/// Every call takes effect for subsequent draws only. Callers own ordering;
/// implementations must not reorder or coalesce state changes across draws.
pub trait HwContext {
    fn set_cull_mode(&mut self, mode: HwCull);

    fn set_front_depth_bias(&mut self, factor: i32, units: i32);
    fn set_back_depth_bias(&mut self, factor: i32, units: i32);

    fn set_front_polygon_mode(&mut self, mode: HwPolygonMode);
    fn set_back_polygon_mode(&mut self, mode: HwPolygonMode);

    /// Replaces the whole viewport transform. There is no partial update.
    fn set_viewport(&mut self, viewport: HardwareViewport);

    /// Depth comparison for both faces. Disabling the depth test is `Always`.
    fn set_depth_func(&mut self, func: CompareFunc);
    fn set_depth_write(&mut self, write: DepthWrite);

    fn set_front_stencil(&mut self, stencil: StencilConfig);
    fn set_back_stencil(&mut self, stencil: StencilConfig);

    /// Point size and line width share one register per face; both are set.
    fn set_point_line_width(&mut self, width: f32);

    /// `None` disables region clipping.
    fn set_region_clip(&mut self, region: Option<ClipRegion>);

    fn set_vertex_program(&mut self, program: ProgramId);
    fn set_fragment_program(&mut self, program: ProgramId);

    /// Writes `data` into the default uniform buffer of the bound vertex program.
    fn set_vertex_uniform(&mut self, uniform: Uniform, data: &[f32]);
    /// Writes `data` into the default uniform buffer of the bound fragment program.
    fn set_fragment_uniform(&mut self, uniform: Uniform, data: &[f32]);

    fn draw(&mut self, primitive: Primitive, indices: &[u16]);
}

impl<T: HwContext + ?Sized> HwContext for &mut T {
    fn set_cull_mode(&mut self, mode: HwCull) {
        (**self).set_cull_mode(mode)
    }
    fn set_front_depth_bias(&mut self, factor: i32, units: i32) {
        (**self).set_front_depth_bias(factor, units)
    }
    fn set_back_depth_bias(&mut self, factor: i32, units: i32) {
        (**self).set_back_depth_bias(factor, units)
    }
    fn set_front_polygon_mode(&mut self, mode: HwPolygonMode) {
        (**self).set_front_polygon_mode(mode)
    }
    fn set_back_polygon_mode(&mut self, mode: HwPolygonMode) {
        (**self).set_back_polygon_mode(mode)
    }
    fn set_viewport(&mut self, viewport: HardwareViewport) {
        (**self).set_viewport(viewport)
    }
    fn set_depth_func(&mut self, func: CompareFunc) {
        (**self).set_depth_func(func)
    }
    fn set_depth_write(&mut self, write: DepthWrite) {
        (**self).set_depth_write(write)
    }
    fn set_front_stencil(&mut self, stencil: StencilConfig) {
        (**self).set_front_stencil(stencil)
    }
    fn set_back_stencil(&mut self, stencil: StencilConfig) {
        (**self).set_back_stencil(stencil)
    }
    fn set_point_line_width(&mut self, width: f32) {
        (**self).set_point_line_width(width)
    }
    fn set_region_clip(&mut self, region: Option<ClipRegion>) {
        (**self).set_region_clip(region)
    }
    fn set_vertex_program(&mut self, program: ProgramId) {
        (**self).set_vertex_program(program)
    }
    fn set_fragment_program(&mut self, program: ProgramId) {
        (**self).set_fragment_program(program)
    }
    fn set_vertex_uniform(&mut self, uniform: Uniform, data: &[f32]) {
        (**self).set_vertex_uniform(uniform, data)
    }
    fn set_fragment_uniform(&mut self, uniform: Uniform, data: &[f32]) {
        (**self).set_fragment_uniform(uniform, data)
    }
    fn draw(&mut self, primitive: Primitive, indices: &[u16]) {
        (**self).draw(primitive, indices)
    }
}
