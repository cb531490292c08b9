use crate::context::CapabilityState;
use crate::gl::CompareFunc;
use crate::hw::{DepthWrite, HwContext, StencilConfig};

/// Disabled depth test is expressed as an always-pass comparison.
#[inline]
pub fn resolve_depth_func(state: &CapabilityState) -> CompareFunc {
    if state.depth_test { state.depth_func } else { CompareFunc::Always }
}

/// Stencil configuration for both faces.
pub fn resolve_stencil(state: &CapabilityState) -> StencilConfig {
    if !state.stencil_test {
        return StencilConfig::PASSTHROUGH;
    }
    let p = &state.stencil;
    StencilConfig {
        func: p.func,
        stencil_fail: p.stencil_fail,
        depth_fail: p.depth_fail,
        depth_pass: p.depth_pass,
        reference: p.reference.clamp(0, 0xFF) as u8,
        compare_mask: (p.mask & 0xFF) as u8,
        write_mask: 0xFF,
    }
}

pub fn apply_depth_func<H: HwContext + ?Sized>(hw: &mut H, state: &CapabilityState) {
    hw.set_depth_func(resolve_depth_func(state));
}

pub fn apply_depth_write<H: HwContext + ?Sized>(hw: &mut H, state: &CapabilityState) {
    hw.set_depth_write(DepthWrite::from_mask(state.depth_mask));
}

pub fn apply_stencil<H: HwContext + ?Sized>(hw: &mut H, state: &CapabilityState) {
    let config = resolve_stencil(state);
    hw.set_front_stencil(config);
    hw.set_back_stencil(config);
}
