use crate::coords::{ColorRgba, PixelRect, Vec4};
use crate::gl::types::{GL_EXP, GLenum};
use crate::gl::{BlendFactor, Capability, CompareFunc, CullTarget, FogMode, FrontFace, PolygonMode, StencilOp};

/// Client-visible depth range, already clamped to `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    #[inline]
    pub fn new(near: f64, far: f64) -> Self {
        Self {
            near: near.clamp(0.0, 1.0) as f32,
            far: far.clamp(0.0, 1.0) as f32,
        }
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        Self { near: 0.0, far: 1.0 }
    }
}

/// Stencil test parameters shared by both faces.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StencilParams {
    pub func: CompareFunc,
    pub reference: i32,
    pub mask: u32,
    pub stencil_fail: StencilOp,
    pub depth_fail: StencilOp,
    pub depth_pass: StencilOp,
}

impl Default for StencilParams {
    fn default() -> Self {
        Self {
            func: CompareFunc::Always,
            reference: 0,
            mask: u32::MAX,
            stencil_fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            depth_pass: StencilOp::Keep,
        }
    }
}

/// Every capability and parameter the client can set.
///
/// Always a legal *requested* configuration. It may describe combinations the
/// hardware cannot express directly (cull `FRONT_AND_BACK`); resolvers handle
/// those. Never written by the clear synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityState {
    // ── toggles ───────────────────────────────────────────────────────────
    pub depth_test: bool,
    pub stencil_test: bool,
    pub blend: bool,
    pub scissor_test: bool,
    pub cull_face: bool,
    pub polygon_offset_fill: bool,
    pub polygon_offset_line: bool,
    pub polygon_offset_point: bool,
    pub texture_2d: bool,
    pub alpha_test: bool,
    pub fog: bool,
    pub clip_plane0: bool,

    // ── rasterization ─────────────────────────────────────────────────────
    pub cull_target: CullTarget,
    pub front_face: FrontFace,
    pub polygon_mode_front: PolygonMode,
    pub polygon_mode_back: PolygonMode,
    pub polygon_offset_factor: f32,
    pub polygon_offset_units: f32,
    pub line_width: f32,
    pub point_size: f32,

    // ── fog ───────────────────────────────────────────────────────────────
    /// Raw `GL_FOG_MODE` token as the client set it. Decoded leniently.
    pub fog_mode: GLenum,
    pub fog_density: f32,
    pub fog_start: f32,
    pub fog_end: f32,
    pub fog_color: ColorRgba,

    // ── clip plane ────────────────────────────────────────────────────────
    /// Plane 0 in object space, as last specified.
    pub clip_plane0_equation: Vec4,

    // ── depth / stencil / blend / alpha ───────────────────────────────────
    pub depth_func: CompareFunc,
    pub depth_mask: bool,
    pub stencil: StencilParams,
    pub blend_src: BlendFactor,
    pub blend_dst: BlendFactor,
    pub alpha_func: CompareFunc,
    pub alpha_ref: f32,

    // ── window-space rectangles ───────────────────────────────────────────
    pub viewport: PixelRect,
    pub depth_range: DepthRange,
    pub scissor: PixelRect,

    // ── clear values ──────────────────────────────────────────────────────
    pub clear_color: ColorRgba,
    pub clear_depth: f32,
    pub clear_stencil: i32,
}

impl CapabilityState {
    /// GL initial state for a context whose default framebuffer is `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        let full = PixelRect::new(0, 0, width as i32, height as i32);
        Self {
            depth_test: false,
            stencil_test: false,
            blend: false,
            scissor_test: false,
            cull_face: false,
            polygon_offset_fill: false,
            polygon_offset_line: false,
            polygon_offset_point: false,
            texture_2d: false,
            alpha_test: false,
            fog: false,
            clip_plane0: false,

            cull_target: CullTarget::Back,
            front_face: FrontFace::Ccw,
            polygon_mode_front: PolygonMode::Fill,
            polygon_mode_back: PolygonMode::Fill,
            polygon_offset_factor: 0.0,
            polygon_offset_units: 0.0,
            line_width: 1.0,
            point_size: 1.0,

            fog_mode: GL_EXP,
            fog_density: 1.0,
            fog_start: 0.0,
            fog_end: 1.0,
            fog_color: ColorRgba::transparent(),

            clip_plane0_equation: Vec4::zero(),

            depth_func: CompareFunc::Less,
            depth_mask: true,
            stencil: StencilParams::default(),
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            alpha_func: CompareFunc::Always,
            alpha_ref: 0.0,

            viewport: full,
            depth_range: DepthRange::default(),
            scissor: full,

            clear_color: ColorRgba::transparent(),
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }

    /// Current value of a boolean capability.
    pub fn is_enabled(&self, cap: Capability) -> bool {
        match cap {
            Capability::DepthTest => self.depth_test,
            Capability::StencilTest => self.stencil_test,
            Capability::Blend => self.blend,
            Capability::ScissorTest => self.scissor_test,
            Capability::CullFace => self.cull_face,
            Capability::PolygonOffsetFill => self.polygon_offset_fill,
            Capability::PolygonOffsetLine => self.polygon_offset_line,
            Capability::PolygonOffsetPoint => self.polygon_offset_point,
            Capability::Texture2d => self.texture_2d,
            Capability::AlphaTest => self.alpha_test,
            Capability::Fog => self.fog,
            Capability::ClipPlane0 => self.clip_plane0,
        }
    }

    /// Writes a boolean capability. Pure data; resolvers run elsewhere.
    pub fn set_enabled(&mut self, cap: Capability, on: bool) {
        let slot = match cap {
            Capability::DepthTest => &mut self.depth_test,
            Capability::StencilTest => &mut self.stencil_test,
            Capability::Blend => &mut self.blend,
            Capability::ScissorTest => &mut self.scissor_test,
            Capability::CullFace => &mut self.cull_face,
            Capability::PolygonOffsetFill => &mut self.polygon_offset_fill,
            Capability::PolygonOffsetLine => &mut self.polygon_offset_line,
            Capability::PolygonOffsetPoint => &mut self.polygon_offset_point,
            Capability::Texture2d => &mut self.texture_2d,
            Capability::AlphaTest => &mut self.alpha_test,
            Capability::Fog => &mut self.fog,
            Capability::ClipPlane0 => &mut self.clip_plane0,
        };
        *slot = on;
    }

    /// Fog mode as the fragment stage will see it.
    #[inline]
    pub fn fog_mode(&self) -> FogMode {
        FogMode::from_gl_lenient(self.fog_mode)
    }
}

impl Default for CapabilityState {
    fn default() -> Self {
        Self::new(960, 544)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_gl_defaults() {
        let s = CapabilityState::new(960, 544);
        assert!(!s.depth_test && !s.cull_face && !s.fog);
        assert_eq!(s.cull_target, CullTarget::Back);
        assert_eq!(s.front_face, FrontFace::Ccw);
        assert_eq!(s.fog_mode(), FogMode::Exp);
        assert_eq!(s.viewport, PixelRect::new(0, 0, 960, 544));
        assert_eq!(s.depth_range, DepthRange { near: 0.0, far: 1.0 });
        assert!(s.depth_mask);
    }

    #[test]
    fn set_enabled_touches_only_its_field() {
        let mut s = CapabilityState::default();
        let before = s.clone();
        s.set_enabled(Capability::PolygonOffsetLine, true);
        assert!(s.is_enabled(Capability::PolygonOffsetLine));
        s.polygon_offset_line = false;
        assert_eq!(s, before);
    }

    #[test]
    fn depth_range_is_clamped() {
        let r = DepthRange::new(-0.5, 2.0);
        assert_eq!(r, DepthRange { near: 0.0, far: 1.0 });
    }
}
