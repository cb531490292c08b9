use crate::coords::{ColorRgba, Vec4};
use crate::gl::{BlendFactor, CompareFunc};
use crate::resolve::{resolve_fog, InternalFog};

use super::CapabilityState;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FogState {
    pub mode: InternalFog,
    pub density: f32,
    pub start: f32,
    pub end: f32,
    pub color: ColorRgba,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlphaTest {
    pub func: CompareFunc,
    pub reference: f32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendState {
    pub enabled: bool,
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

/// Resolved inputs for fixed-function vertex/fragment evaluation.
///
/// Program selection and patching consume this; nothing here reaches the
/// hardware command interface directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedFunctionState {
    pub fog: FogState,
    /// `None` when the alpha test is disabled.
    pub alpha_test: Option<AlphaTest>,
    /// Eye-space plane 0, `None` when clipping is disabled.
    pub clip_plane0: Option<Vec4>,
    pub texture_2d: bool,
    pub blend: BlendState,
    pub fast_texture_compression: bool,
}

impl FixedFunctionState {
    pub(crate) fn resolve(state: &CapabilityState, eye_plane0: Vec4, fast_compression: bool) -> Self {
        Self {
            fog: FogState {
                mode: resolve_fog(state.fog, state.fog_mode),
                density: state.fog_density,
                start: state.fog_start,
                end: state.fog_end,
                color: state.fog_color,
            },
            alpha_test: state.alpha_test.then_some(AlphaTest {
                func: state.alpha_func,
                reference: state.alpha_ref,
            }),
            clip_plane0: state.clip_plane0.then_some(eye_plane0),
            texture_2d: state.texture_2d,
            blend: BlendState {
                enabled: state.blend,
                src: state.blend_src,
                dst: state.blend_dst,
            },
            fast_texture_compression: fast_compression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_features_resolve_to_none() {
        let s = CapabilityState::default();
        let ff = FixedFunctionState::resolve(&s, Vec4::new(1.0, 0.0, 0.0, 0.0), false);
        assert_eq!(ff.fog.mode, InternalFog::Disabled);
        assert_eq!(ff.alpha_test, None);
        assert_eq!(ff.clip_plane0, None);
        assert!(!ff.blend.enabled);
    }

    #[test]
    fn enabled_features_carry_parameters() {
        let mut s = CapabilityState::default();
        s.alpha_test = true;
        s.alpha_func = CompareFunc::Greater;
        s.alpha_ref = 0.5;
        s.clip_plane0 = true;
        s.fog = true;
        let plane = Vec4::new(0.0, 1.0, 0.0, -1.0);
        let ff = FixedFunctionState::resolve(&s, plane, true);
        assert_eq!(ff.alpha_test, Some(AlphaTest { func: CompareFunc::Greater, reference: 0.5 }));
        assert_eq!(ff.clip_plane0, Some(plane));
        assert_eq!(ff.fog.mode, InternalFog::Exp);
        assert!(ff.fast_texture_compression);
    }
}
