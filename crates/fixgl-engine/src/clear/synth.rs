use crate::context::{CapabilityState, Orientation, RenderTarget, RowOrder};
use crate::gl::{ClearMask, CompareFunc, StencilOp};
use crate::hw::{
    DepthWrite, HwContext, HwCull, HwPolygonMode, Primitive, ProgramId, StencilConfig, Uniform,
};
use crate::resolve::{apply_cull, apply_depth_func, apply_depth_write, apply_stencil, resolve_cull};
use crate::transform::{full_target_viewport, viewport_transform};

/// Clip-space corners of the clear fan, `vec2[4]`, counter-clockwise.
pub const CLEAR_FAN_POSITIONS: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0];

pub const CLEAR_FAN_INDICES: [u16; 4] = [0, 1, 2, 3];

/// Everything the synthesizer reads. It writes nothing back.
#[derive(Debug, Copy, Clone)]
pub struct ClearEnv<'a> {
    /// Client state: clear values, and the settings restored afterwards.
    pub state: &'a CapabilityState,
    pub target: &'a RenderTarget,
    pub rows: RowOrder,
    /// Client programs to rebind after the clear draws, if any were bound.
    pub client_programs: Option<(ProgramId, ProgramId)>,
}

/// Clears the buffers in `mask`, in color, depth, stencil order.
///
/// Returns the suppress-geometry flag produced by re-resolving culling at the end.
/// An empty mask issues no commands and returns `None`.
pub fn synthesize_clear<H: HwContext + ?Sized>(
    hw: &mut H,
    mask: ClearMask,
    env: &ClearEnv<'_>,
) -> Option<bool> {
    if mask.is_empty() {
        return None;
    }
    let state = env.state;

    hw.set_viewport(full_target_viewport(env.target, env.rows));
    hw.set_cull_mode(HwCull::None);

    if mask.contains(ClearMask::COLOR) {
        begin_pass(hw, DepthWrite::Disabled, ProgramId::CLEAR_COLOR);
        hw.set_fragment_uniform(Uniform::ClearColor, &state.clear_color.to_array());
        draw_fan(hw);
        end_pass(hw, state);
    }

    if mask.contains(ClearMask::DEPTH) {
        begin_pass(hw, DepthWrite::Enabled, ProgramId::CLEAR_DEPTH_STENCIL);
        hw.set_fragment_uniform(Uniform::ClearDepth, &[state.clear_depth]);
        draw_fan(hw);
        end_pass(hw, state);
    }

    if mask.contains(ClearMask::STENCIL) {
        begin_pass(hw, DepthWrite::Disabled, ProgramId::CLEAR_DEPTH_STENCIL);
        let replace_all = StencilConfig {
            func: CompareFunc::Never,
            stencil_fail: StencilOp::Replace,
            depth_fail: StencilOp::Replace,
            depth_pass: StencilOp::Replace,
            reference: (state.clear_stencil & 0xFF) as u8,
            compare_mask: 0,
            write_mask: 0xFF,
        };
        hw.set_front_stencil(replace_all);
        hw.set_back_stencil(replace_all);
        hw.set_fragment_uniform(Uniform::ClearDepth, &[1.0]);
        hw.set_fragment_uniform(Uniform::ClearStencil, &[state.clear_stencil as f32]);
        draw_fan(hw);
        end_pass(hw, state);
        apply_stencil(hw, state);
    }

    if let Some((vertex, fragment)) = env.client_programs {
        hw.set_vertex_program(vertex);
        hw.set_fragment_program(fragment);
    }

    hw.set_viewport(viewport_transform(state.viewport, state.depth_range, env.target, env.rows));
    let resolution = resolve_cull(
        state.cull_face,
        state.front_face,
        state.cull_target,
        Orientation::of(env.target, env.rows),
    );
    Some(apply_cull(hw, resolution))
}

fn begin_pass<H: HwContext + ?Sized>(hw: &mut H, write: DepthWrite, fragment: ProgramId) {
    hw.set_depth_func(CompareFunc::Always);
    hw.set_depth_write(write);
    hw.set_front_polygon_mode(HwPolygonMode::TriangleFill);
    hw.set_back_polygon_mode(HwPolygonMode::TriangleFill);
    hw.set_vertex_program(ProgramId::CLEAR_VERTEX);
    hw.set_fragment_program(fragment);
}

fn draw_fan<H: HwContext + ?Sized>(hw: &mut H) {
    hw.set_vertex_uniform(Uniform::ClearPosition, &CLEAR_FAN_POSITIONS);
    hw.draw(Primitive::TriangleFan, &CLEAR_FAN_INDICES);
}

fn end_pass<H: HwContext + ?Sized>(hw: &mut H, state: &CapabilityState) {
    apply_depth_func(hw, state);
    apply_depth_write(hw, state);
    hw.set_front_polygon_mode(state.polygon_mode_front.into());
    hw.set_back_polygon_mode(state.polygon_mode_back.into());
}
