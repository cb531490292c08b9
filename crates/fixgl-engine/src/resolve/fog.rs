use crate::gl::FogMode;
use crate::gl::types::GLenum;

/// Fog equation consumed by fixed-function fragment evaluation.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum InternalFog {
    #[default]
    Disabled,
    Linear,
    Exp,
    Exp2,
}

/// Maps fog enable + raw mode token to the internal equation.
///
/// Unrecognized mode tokens resolve to `Exp2` rather than failing.
pub fn resolve_fog(enabled: bool, mode: GLenum) -> InternalFog {
    if !enabled {
        return InternalFog::Disabled;
    }
    match FogMode::from_gl_lenient(mode) {
        FogMode::Linear => InternalFog::Linear,
        FogMode::Exp => InternalFog::Exp,
        FogMode::Exp2 => InternalFog::Exp2,
    }
}
