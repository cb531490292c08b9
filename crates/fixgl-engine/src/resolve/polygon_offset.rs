use crate::context::CapabilityState;
use crate::gl::PolygonMode;
use crate::hw::HwContext;

/// Integer depth bias as the hardware takes it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DepthBias {
    pub factor: i32,
    pub units: i32,
}

impl DepthBias {
    pub const ZERO: DepthBias = DepthBias { factor: 0, units: 0 };

    /// Truncates toward zero (saturating), like a C float-to-int cast.
    #[inline]
    pub fn from_floats(factor: f32, units: f32) -> Self {
        Self { factor: factor as i32, units: units as i32 }
    }
}

/// The three `GL_POLYGON_OFFSET_*` enables.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct OffsetEnables {
    pub fill: bool,
    pub line: bool,
    pub point: bool,
}

impl OffsetEnables {
    #[inline]
    pub fn of(state: &CapabilityState) -> Self {
        Self {
            fill: state.polygon_offset_fill,
            line: state.polygon_offset_line,
            point: state.polygon_offset_point,
        }
    }

    /// The enable that governs a face drawn in `mode`.
    #[inline]
    pub const fn governing(self, mode: PolygonMode) -> bool {
        match mode {
            PolygonMode::Fill => self.fill,
            PolygonMode::Line => self.line,
            PolygonMode::Point => self.point,
        }
    }
}

/// Bias for one face: `(factor, units)` if the enable matching the face's
/// current polygon mode is set, zero otherwise.
#[inline]
pub fn bias_for_mode(mode: PolygonMode, enables: OffsetEnables, factor: f32, units: f32) -> DepthBias {
    if enables.governing(mode) {
        DepthBias::from_floats(factor, units)
    } else {
        DepthBias::ZERO
    }
}

/// `(front, back)` depth bias for the current state.
pub fn resolve_polygon_offset(state: &CapabilityState) -> (DepthBias, DepthBias) {
    let enables = OffsetEnables::of(state);
    let (factor, units) = (state.polygon_offset_factor, state.polygon_offset_units);
    (
        bias_for_mode(state.polygon_mode_front, enables, factor, units),
        bias_for_mode(state.polygon_mode_back, enables, factor, units),
    )
}

pub fn apply_polygon_offset<H: HwContext + ?Sized>(hw: &mut H, state: &CapabilityState) {
    let (front, back) = resolve_polygon_offset(state);
    hw.set_front_depth_bias(front.factor, front.units);
    hw.set_back_depth_bias(back.factor, back.units);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::RecordingHw;

    fn state_with_offset(factor: f32, units: f32) -> CapabilityState {
        let mut s = CapabilityState::default();
        s.polygon_offset_factor = factor;
        s.polygon_offset_units = units;
        s
    }

    #[test]
    fn line_enable_does_not_bias_filled_face() {
        let mut s = state_with_offset(2.0, 4.0);
        s.polygon_offset_line = true;
        let (front, back) = resolve_polygon_offset(&s);
        assert_eq!(front, DepthBias::ZERO);
        assert_eq!(back, DepthBias::ZERO);
    }

    #[test]
    fn switching_mode_alone_applies_bias() {
        let mut s = state_with_offset(2.0, 4.0);
        s.polygon_offset_line = true;
        s.polygon_mode_front = PolygonMode::Line;
        let (front, back) = resolve_polygon_offset(&s);
        assert_eq!(front, DepthBias { factor: 2, units: 4 });
        assert_eq!(back, DepthBias::ZERO);
    }

    #[test]
    fn faces_resolve_independently() {
        let mut s = state_with_offset(1.0, 1.0);
        s.polygon_offset_point = true;
        s.polygon_offset_fill = true;
        s.polygon_mode_front = PolygonMode::Point;
        s.polygon_mode_back = PolygonMode::Line;
        let (front, back) = resolve_polygon_offset(&s);
        assert_eq!(front, DepthBias { factor: 1, units: 1 });
        assert_eq!(back, DepthBias::ZERO);
    }

    #[test]
    fn fractional_bias_truncates_toward_zero() {
        assert_eq!(DepthBias::from_floats(1.9, -2.7), DepthBias { factor: 1, units: -2 });
    }

    #[test]
    fn apply_writes_both_faces() {
        let mut s = state_with_offset(3.0, 5.0);
        s.polygon_offset_fill = true;
        let mut hw = RecordingHw::new();
        apply_polygon_offset(&mut hw, &s);
        assert_eq!(hw.snapshot().front_depth_bias, Some((3, 5)));
        assert_eq!(hw.snapshot().back_depth_bias, Some((3, 5)));
    }
}
