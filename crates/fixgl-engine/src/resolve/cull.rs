use crate::context::Orientation;
use crate::gl::{CullTarget, Face, FrontFace};
use crate::hw::{HwContext, HwCull};

/// Outcome of the cull resolver.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CullResolution {
    /// Program this hardware cull mode.
    Hardware(HwCull),
    /// `FRONT_AND_BACK`: no single winding expresses it. Draw dispatch must skip
    /// primitive submission entirely; the hardware cull mode is left untouched.
    SuppressGeometry,
}

impl CullResolution {
    #[inline]
    pub const fn suppresses_geometry(self) -> bool {
        matches!(self, CullResolution::SuppressGeometry)
    }
}

/// Derives the hardware cull winding from client cull state.
///
/// On an upright target, culling back faces discards the winding opposite to
/// `front_face` as seen by the hardware's Y-down screen space, and culling front
/// faces discards `front_face` itself. An inverted target mirrors the winding.
pub fn resolve_cull(
    enabled: bool,
    front_face: FrontFace,
    target: CullTarget,
    orientation: Orientation,
) -> CullResolution {
    if !enabled {
        return CullResolution::Hardware(HwCull::None);
    }

    let upright = match (target, front_face) {
        (Face::Back, FrontFace::Cw) => HwCull::Ccw,
        (Face::Back, FrontFace::Ccw) => HwCull::Cw,
        (Face::Front, FrontFace::Ccw) => HwCull::Ccw,
        (Face::Front, FrontFace::Cw) => HwCull::Cw,
        (Face::FrontAndBack, _) => return CullResolution::SuppressGeometry,
    };

    CullResolution::Hardware(match orientation {
        Orientation::Upright => upright,
        Orientation::Inverted => upright.flipped(),
    })
}

/// Pushes a resolution to the hardware. Returns the suppress-geometry flag.
pub fn apply_cull<H: HwContext + ?Sized>(hw: &mut H, resolution: CullResolution) -> bool {
    match resolution {
        CullResolution::Hardware(mode) => {
            hw.set_cull_mode(mode);
            false
        }
        CullResolution::SuppressGeometry => {
            log::debug!("cull FRONT_AND_BACK: suppressing all geometry");
            true
        }
    }
}
