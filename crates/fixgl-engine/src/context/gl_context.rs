use crate::clear::{synthesize_clear, ClearEnv};
use crate::coords::{ColorRgba, Mat4, PixelRect, Vec4};
use crate::gl::types::{
    GL_CLIP_PLANE0, GL_FASTEST, GLbitfield, GLclampf, GLdouble, GLenum, GLfloat, GLint, GLsizei,
    GLuint,
};
use crate::gl::{
    BlendFactor, Capability, ClearMask, CompareFunc, ErrorSlot, Face, FogParam, FrontFace,
    GlError, GlResult, HintTarget, PolygonMode, StencilOp,
};
use crate::hw::{HwContext, HwPolygonMode, ProgramId};
use crate::resolve::{
    apply_cull, apply_depth_func, apply_depth_write, apply_polygon_offset, apply_stencil,
    resolve_cull,
};
use crate::transform::{eye_space_plane, region_clip_for, viewport_transform};

use super::{
    CapabilityState, ContextConfig, DepthRange, FixedFunctionState, Orientation, RenderTarget,
};

/// Call phase of the context.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    /// Between `begin_geometry` and `end_geometry`. State changes are rejected.
    Geometry,
}

/// The fixed-function GL state machine bound to one hardware context.
///
/// Every setter validates its arguments, updates [`CapabilityState`], and then
/// immediately re-runs the resolvers that read the changed fields. Failing calls
/// change nothing, latch their error (see [`GlContext::get_error`]) and also
/// return it.
///
/// Single-threaded: the context is `&mut self` throughout and owns its hardware.
#[derive(Debug)]
pub struct GlContext<H: HwContext> {
    hw: H,
    config: ContextConfig,
    state: CapabilityState,
    target: RenderTarget,
    errors: ErrorSlot,
    phase: Phase,

    modelview: Mat4,
    eye_plane0: Vec4,

    suppress_geometry: bool,
    fast_texture_compression: bool,
    client_programs: Option<(ProgramId, ProgramId)>,
}

impl<H: HwContext> GlContext<H> {
    /// Creates a context drawing into the display and pushes the full initial
    /// GL state to `hw`.
    pub fn new(hw: H, config: ContextConfig) -> Self {
        let target = config.display_target();
        log::info!(
            "gl context: display {}x{}, offscreen rows {:?}, error checking {}",
            target.width,
            target.height,
            config.offscreen_rows,
            if config.error_checking { "on" } else { "off" },
        );

        let mut ctx = Self {
            hw,
            state: CapabilityState::new(target.width, target.height),
            target,
            config,
            errors: ErrorSlot::new(),
            phase: Phase::Idle,
            modelview: Mat4::identity(),
            eye_plane0: Vec4::zero(),
            suppress_geometry: false,
            fast_texture_compression: false,
            client_programs: None,
        };
        ctx.sync_all();
        ctx
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> &CapabilityState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    #[inline]
    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn hw(&self) -> &H {
        &self.hw
    }

    #[inline]
    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn into_hw(self) -> H {
        self.hw
    }

    /// Draw dispatch must skip primitive submission while this is set
    /// (culling `FRONT_AND_BACK`).
    #[inline]
    pub fn suppress_geometry(&self) -> bool {
        self.suppress_geometry
    }

    /// Eye-space clip plane 0 as last computed, whether or not it is enabled.
    #[inline]
    pub fn eye_clip_plane(&self) -> Vec4 {
        self.eye_plane0
    }

    /// Resolved fixed-function inputs for program selection.
    pub fn fixed_function(&self) -> FixedFunctionState {
        FixedFunctionState::resolve(&self.state, self.eye_plane0, self.fast_texture_compression)
    }

    // ── errors ────────────────────────────────────────────────────────────

    /// `glGetError`: returns the latched error code and clears it.
    pub fn get_error(&mut self) -> GLenum {
        self.errors.take_code()
    }

    /// Latched error without clearing it.
    pub fn peek_error(&self) -> Option<GlError> {
        self.errors.peek()
    }

    fn latch(&mut self, op: &'static str, err: GlError) {
        log::debug!("{op}: {err}");
        self.errors.record(err);
    }

    fn run(&mut self, op: &'static str, f: impl FnOnce(&mut Self) -> GlResult) -> GlResult {
        let result = f(self);
        if let Err(err) = result {
            self.latch(op, err);
        }
        result
    }

    /// Value/phase check; skipped entirely when error checking is off.
    fn validate(&self, ok: bool, err: GlError) -> GlResult {
        if ok || !self.config.error_checking { Ok(()) } else { Err(err) }
    }

    fn outside_geometry(&self) -> GlResult {
        self.validate(self.phase == Phase::Idle, GlError::InvalidOperation)
    }

    // ── capabilities ──────────────────────────────────────────────────────

    /// `glEnable`.
    pub fn enable(&mut self, cap: GLenum) -> GlResult {
        self.run("glEnable", |ctx| ctx.set_capability(cap, true))
    }

    /// `glDisable`.
    pub fn disable(&mut self, cap: GLenum) -> GlResult {
        self.run("glDisable", |ctx| ctx.set_capability(cap, false))
    }

    /// `glIsEnabled`. Unknown tokens latch `GL_INVALID_ENUM` and read as disabled.
    pub fn is_enabled(&mut self, cap: GLenum) -> bool {
        match Capability::from_gl(cap) {
            Some(cap) => self.state.is_enabled(cap),
            None => {
                self.latch("glIsEnabled", GlError::InvalidEnum);
                false
            }
        }
    }

    fn set_capability(&mut self, token: GLenum, on: bool) -> GlResult {
        self.outside_geometry()?;
        let cap = decode(Capability::from_gl(token))?;
        self.state.set_enabled(cap, on);

        match cap {
            Capability::DepthTest => apply_depth_func(&mut self.hw, &self.state),
            Capability::StencilTest => apply_stencil(&mut self.hw, &self.state),
            Capability::ScissorTest => self.sync_region_clip(),
            Capability::CullFace => self.sync_cull(),
            Capability::PolygonOffsetFill
            | Capability::PolygonOffsetLine
            | Capability::PolygonOffsetPoint => apply_polygon_offset(&mut self.hw, &self.state),
            Capability::ClipPlane0 => {
                if on {
                    self.sync_eye_plane();
                }
            }
            Capability::Blend | Capability::Texture2d | Capability::AlphaTest | Capability::Fog => {}
        }
        Ok(())
    }

    // ── rasterization ─────────────────────────────────────────────────────

    /// `glPolygonMode`.
    pub fn set_polygon_mode(&mut self, face: GLenum, mode: GLenum) -> GlResult {
        self.run("glPolygonMode", |ctx| {
            let face = decode(Face::from_gl(face))?;
            let mode = decode(PolygonMode::from_gl(mode))?;
            let hw_mode = HwPolygonMode::from(mode);

            if matches!(face, Face::Front | Face::FrontAndBack) {
                ctx.state.polygon_mode_front = mode;
                ctx.hw.set_front_polygon_mode(hw_mode);
            }
            if matches!(face, Face::Back | Face::FrontAndBack) {
                ctx.state.polygon_mode_back = mode;
                ctx.hw.set_back_polygon_mode(hw_mode);
            }
            apply_polygon_offset(&mut ctx.hw, &ctx.state);
            Ok(())
        })
    }

    /// `glPolygonOffset`.
    pub fn set_polygon_offset(&mut self, factor: GLfloat, units: GLfloat) {
        self.state.polygon_offset_factor = factor;
        self.state.polygon_offset_units = units;
        apply_polygon_offset(&mut self.hw, &self.state);
    }

    /// `glCullFace`.
    pub fn set_cull_face(&mut self, mode: GLenum) -> GlResult {
        self.run("glCullFace", |ctx| {
            ctx.state.cull_target = decode(Face::from_gl(mode))?;
            if ctx.state.cull_face {
                ctx.sync_cull();
            }
            Ok(())
        })
    }

    /// `glFrontFace`.
    pub fn set_front_face(&mut self, mode: GLenum) -> GlResult {
        self.run("glFrontFace", |ctx| {
            ctx.state.front_face = decode(FrontFace::from_gl(mode))?;
            if ctx.state.cull_face {
                ctx.sync_cull();
            }
            Ok(())
        })
    }

    /// `glLineWidth`. Shares the hardware point/line width register.
    pub fn set_line_width(&mut self, width: GLfloat) -> GlResult {
        self.run("glLineWidth", |ctx| {
            ctx.validate(width > 0.0, GlError::InvalidValue)?;
            ctx.state.line_width = width;
            ctx.hw.set_point_line_width(width);
            Ok(())
        })
    }

    /// `glPointSize`. Shares the hardware point/line width register.
    pub fn set_point_size(&mut self, size: GLfloat) -> GlResult {
        self.run("glPointSize", |ctx| {
            ctx.validate(size > 0.0, GlError::InvalidValue)?;
            ctx.state.point_size = size;
            ctx.hw.set_point_line_width(size);
            Ok(())
        })
    }

    /// `glHint`. Only the texture compression hint is recognized.
    pub fn set_hint(&mut self, target: GLenum, mode: GLenum) -> GlResult {
        self.run("glHint", |ctx| {
            match decode(HintTarget::from_gl(target))? {
                HintTarget::TextureCompression => {
                    ctx.fast_texture_compression = mode == GL_FASTEST;
                }
            }
            Ok(())
        })
    }

    // ── viewport / depth range / scissor ──────────────────────────────────

    /// `glViewport`. Negative extents are rejected and the previous viewport kept.
    pub fn set_viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) -> GlResult {
        self.run("glViewport", |ctx| {
            let rect = PixelRect::new(x, y, width, height);
            ctx.validate(!rect.has_negative_extent(), GlError::InvalidValue)?;
            ctx.state.viewport = rect;
            ctx.sync_viewport();
            Ok(())
        })
    }

    /// `glDepthRange`. Inputs are clamped to `[0, 1]`.
    pub fn set_depth_range(&mut self, near: GLdouble, far: GLdouble) {
        self.state.depth_range = DepthRange::new(near, far);
        self.sync_viewport();
    }

    /// `glDepthRangef`.
    pub fn set_depth_rangef(&mut self, near: GLclampf, far: GLclampf) {
        self.set_depth_range(f64::from(near), f64::from(far));
    }

    /// `glScissor`.
    pub fn set_scissor(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) -> GlResult {
        self.run("glScissor", |ctx| {
            let rect = PixelRect::new(x, y, width, height);
            ctx.validate(!rect.has_negative_extent(), GlError::InvalidValue)?;
            ctx.state.scissor = rect;
            if ctx.state.scissor_test {
                ctx.sync_region_clip();
            }
            Ok(())
        })
    }

    // ── depth / stencil ───────────────────────────────────────────────────

    /// `glDepthFunc`.
    pub fn set_depth_func(&mut self, func: GLenum) -> GlResult {
        self.run("glDepthFunc", |ctx| {
            ctx.state.depth_func = decode(CompareFunc::from_gl(func))?;
            apply_depth_func(&mut ctx.hw, &ctx.state);
            Ok(())
        })
    }

    /// `glDepthMask`.
    pub fn set_depth_mask(&mut self, enabled: bool) {
        self.state.depth_mask = enabled;
        apply_depth_write(&mut self.hw, &self.state);
    }

    /// `glStencilFunc`, applied to both faces.
    pub fn set_stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint) -> GlResult {
        self.run("glStencilFunc", |ctx| {
            let func = decode(CompareFunc::from_gl(func))?;
            ctx.state.stencil.func = func;
            ctx.state.stencil.reference = reference;
            ctx.state.stencil.mask = mask;
            apply_stencil(&mut ctx.hw, &ctx.state);
            Ok(())
        })
    }

    /// `glStencilOp`, applied to both faces.
    pub fn set_stencil_op(&mut self, sfail: GLenum, dpfail: GLenum, dppass: GLenum) -> GlResult {
        self.run("glStencilOp", |ctx| {
            let sfail = decode(StencilOp::from_gl(sfail))?;
            let dpfail = decode(StencilOp::from_gl(dpfail))?;
            let dppass = decode(StencilOp::from_gl(dppass))?;
            ctx.state.stencil.stencil_fail = sfail;
            ctx.state.stencil.depth_fail = dpfail;
            ctx.state.stencil.depth_pass = dppass;
            apply_stencil(&mut ctx.hw, &ctx.state);
            Ok(())
        })
    }

    // ── blend / alpha ─────────────────────────────────────────────────────

    /// `glBlendFunc`. `GL_SRC_ALPHA_SATURATE` is only valid as a source factor.
    pub fn set_blend_func(&mut self, src: GLenum, dst: GLenum) -> GlResult {
        self.run("glBlendFunc", |ctx| {
            let src = decode(BlendFactor::from_gl(src))?;
            let dst = match BlendFactor::from_gl(dst) {
                Some(BlendFactor::SrcAlphaSaturate) | None => return Err(GlError::InvalidEnum),
                Some(dst) => dst,
            };
            ctx.state.blend_src = src;
            ctx.state.blend_dst = dst;
            Ok(())
        })
    }

    /// `glAlphaFunc`. The reference is clamped to `[0, 1]`.
    pub fn set_alpha_func(&mut self, func: GLenum, reference: GLclampf) -> GlResult {
        self.run("glAlphaFunc", |ctx| {
            ctx.state.alpha_func = decode(CompareFunc::from_gl(func))?;
            ctx.state.alpha_ref = reference.clamp(0.0, 1.0);
            Ok(())
        })
    }

    // ── fog ───────────────────────────────────────────────────────────────

    /// `glFogf`. `GL_FOG_MODE` takes a token value; unknown modes are kept and
    /// evaluated as `GL_EXP2`.
    pub fn set_fog(&mut self, pname: GLenum, value: GLfloat) -> GlResult {
        self.run("glFogf", |ctx| ctx.fog_scalar(pname, value, value as GLenum))
    }

    /// `glFogi`.
    pub fn set_fogi(&mut self, pname: GLenum, value: GLint) -> GlResult {
        self.run("glFogi", |ctx| ctx.fog_scalar(pname, value as GLfloat, value as GLenum))
    }

    /// `glFogfv`. `GL_FOG_COLOR` needs four values, every other name one.
    pub fn set_fogv(&mut self, pname: GLenum, params: &[GLfloat]) -> GlResult {
        self.run("glFogfv", |ctx| match decode(FogParam::from_gl(pname))? {
            FogParam::Color => match params {
                &[r, g, b, a, ..] => {
                    ctx.state.fog_color = clamp_color(r, g, b, a);
                    Ok(())
                }
                _ => Err(GlError::InvalidValue),
            },
            _ => {
                let &value = params.first().ok_or(GlError::InvalidValue)?;
                ctx.fog_scalar(pname, value, value as GLenum)
            }
        })
    }

    /// `glFogfv(GL_FOG_COLOR, ..)`.
    pub fn set_fog_color(&mut self, color: ColorRgba) {
        self.state.fog_color = clamp_color(color.r, color.g, color.b, color.a);
    }

    fn fog_scalar(&mut self, pname: GLenum, value: GLfloat, token: GLenum) -> GlResult {
        match decode(FogParam::from_gl(pname))? {
            FogParam::Mode => self.state.fog_mode = token,
            FogParam::Density => {
                self.validate(value >= 0.0, GlError::InvalidValue)?;
                self.state.fog_density = value;
            }
            FogParam::Start => self.state.fog_start = value,
            FogParam::End => self.state.fog_end = value,
            FogParam::Color => return Err(GlError::InvalidEnum),
        }
        Ok(())
    }

    // ── clip plane ────────────────────────────────────────────────────────

    /// `glClipPlane`. Stores the object-space plane and recomputes its eye-space
    /// form against the current modelview right away.
    pub fn set_clip_plane(&mut self, plane: GLenum, equation: [GLdouble; 4]) -> GlResult {
        self.run("glClipPlane", |ctx| {
            if plane != GL_CLIP_PLANE0 {
                return Err(GlError::InvalidEnum);
            }
            ctx.state.clip_plane0_equation = Vec4::from(equation);
            ctx.sync_eye_plane();
            Ok(())
        })
    }

    /// Matrix-stack notification: the current modelview matrix changed.
    pub fn notify_modelview_changed(&mut self, modelview: &Mat4) {
        self.modelview = *modelview;
        if self.state.clip_plane0 {
            self.sync_eye_plane();
        }
    }

    // ── clears ────────────────────────────────────────────────────────────

    /// `glClearColor`.
    pub fn set_clear_color(&mut self, r: GLclampf, g: GLclampf, b: GLclampf, a: GLclampf) {
        self.state.clear_color = clamp_color(r, g, b, a);
    }

    /// `glClearDepth`, clamped to `[0, 1]`.
    pub fn set_clear_depth(&mut self, depth: GLdouble) {
        self.state.clear_depth = depth.clamp(0.0, 1.0) as f32;
    }

    /// `glClearStencil`.
    pub fn set_clear_stencil(&mut self, s: GLint) {
        self.state.clear_stencil = s;
    }

    /// `glClear`. Bits other than color/depth/stencil raise `GL_INVALID_VALUE`.
    pub fn clear(&mut self, mask: GLbitfield) -> GlResult {
        self.run("glClear", |ctx| {
            ctx.outside_geometry()?;
            let mask = ClearMask::from_gl(mask).ok_or(GlError::InvalidValue)?;

            let env = ClearEnv {
                state: &ctx.state,
                target: &ctx.target,
                rows: ctx.config.offscreen_rows,
                client_programs: ctx.client_programs,
            };
            if let Some(suppress) = synthesize_clear(&mut ctx.hw, mask, &env) {
                ctx.suppress_geometry = suppress;
            }
            Ok(())
        })
    }

    // ── phase / collaborators ─────────────────────────────────────────────

    /// Enters the geometry-definition phase (`glBegin`).
    pub fn begin_geometry(&mut self) -> GlResult {
        self.run("glBegin", |ctx| {
            ctx.outside_geometry()?;
            ctx.phase = Phase::Geometry;
            Ok(())
        })
    }

    /// Leaves the geometry-definition phase (`glEnd`).
    pub fn end_geometry(&mut self) -> GlResult {
        self.run("glEnd", |ctx| {
            ctx.validate(ctx.phase == Phase::Geometry, GlError::InvalidOperation)?;
            ctx.phase = Phase::Idle;
            Ok(())
        })
    }

    /// Framebuffer notification: drawing now goes to `target`.
    ///
    /// Everything that depends on target size or orientation is re-resolved.
    pub fn bind_render_target(&mut self, target: RenderTarget) {
        log::debug!("bind render target: {:?} {}x{}", target.kind, target.width, target.height);
        self.target = target;
        self.sync_viewport();
        self.sync_cull();
        self.sync_region_clip();
    }

    /// Draw-dispatch notification: the client's current programs. Clears rebind
    /// these after their own draws.
    pub fn bind_programs(&mut self, vertex: ProgramId, fragment: ProgramId) {
        self.client_programs = Some((vertex, fragment));
    }

    // ── reconciliation ────────────────────────────────────────────────────

    fn orientation(&self) -> Orientation {
        Orientation::of(&self.target, self.config.offscreen_rows)
    }

    fn sync_viewport(&mut self) {
        let vp = viewport_transform(
            self.state.viewport,
            self.state.depth_range,
            &self.target,
            self.config.offscreen_rows,
        );
        self.hw.set_viewport(vp);
    }

    fn sync_cull(&mut self) {
        let resolution = resolve_cull(
            self.state.cull_face,
            self.state.front_face,
            self.state.cull_target,
            self.orientation(),
        );
        self.suppress_geometry = apply_cull(&mut self.hw, resolution);
    }

    fn sync_region_clip(&mut self) {
        let region = self
            .state
            .scissor_test
            .then(|| region_clip_for(self.state.scissor, &self.target));
        self.hw.set_region_clip(region);
    }

    fn sync_eye_plane(&mut self) {
        self.eye_plane0 = eye_space_plane(&self.modelview, self.state.clip_plane0_equation);
    }

    fn sync_all(&mut self) {
        self.sync_cull();
        self.hw.set_front_polygon_mode(self.state.polygon_mode_front.into());
        self.hw.set_back_polygon_mode(self.state.polygon_mode_back.into());
        apply_polygon_offset(&mut self.hw, &self.state);
        self.sync_viewport();
        apply_depth_func(&mut self.hw, &self.state);
        apply_depth_write(&mut self.hw, &self.state);
        apply_stencil(&mut self.hw, &self.state);
        self.hw.set_point_line_width(self.state.line_width);
        self.sync_region_clip();
    }
}

#[inline]
fn decode<T>(value: Option<T>) -> GlResult<T> {
    value.ok_or(GlError::InvalidEnum)
}

#[inline]
fn clamp_color(r: f32, g: f32, b: f32, a: f32) -> ColorRgba {
    ColorRgba::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0), a.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RowOrder;
    use crate::gl::types::*;
    use crate::hw::{DepthWrite, HwCmd, HwCull, RecordingHw, StencilConfig};
    use crate::resolve::InternalFog;

    fn ctx() -> GlContext<RecordingHw> {
        let mut ctx = GlContext::new(RecordingHw::new(), ContextConfig::default());
        ctx.hw_mut().clear_log();
        ctx
    }

    fn unchecked() -> GlContext<RecordingHw> {
        let config = ContextConfig { error_checking: false, ..ContextConfig::default() };
        GlContext::new(RecordingHw::new(), config)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_context_pushes_initial_state() {
        let ctx = GlContext::new(RecordingHw::new(), ContextConfig::default());
        let snap = ctx.hw().snapshot();
        assert_eq!(snap.cull, Some(HwCull::None));
        assert_eq!(snap.depth_func, Some(CompareFunc::Always));
        assert_eq!(snap.depth_write, Some(DepthWrite::Enabled));
        assert_eq!(snap.front_stencil, Some(StencilConfig::PASSTHROUGH));
        assert_eq!(snap.front_depth_bias, Some((0, 0)));
        assert_eq!(snap.region_clip, Some(None));
        assert_eq!(snap.point_line_width, Some(1.0));

        let vp = snap.viewport.unwrap();
        assert_eq!((vp.x_center, vp.x_half, vp.y_center, vp.y_half), (480.0, 480.0, 272.0, -272.0));
    }

    // ── capabilities ──────────────────────────────────────────────────────

    #[test]
    fn unknown_capability_changes_nothing() {
        let mut ctx = ctx();
        let before = ctx.state().clone();

        assert_eq!(ctx.enable(0x1234), Err(GlError::InvalidEnum));
        assert_eq!(ctx.disable(0x1234), Err(GlError::InvalidEnum));

        assert_eq!(ctx.state(), &before);
        assert!(ctx.hw().cmds().is_empty());
        assert_eq!(ctx.get_error(), GL_INVALID_ENUM);
        assert_eq!(ctx.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn is_enabled_reports_and_rejects() {
        let mut ctx = ctx();
        ctx.enable(GL_BLEND).unwrap();
        assert!(ctx.is_enabled(GL_BLEND));
        assert!(!ctx.is_enabled(GL_FOG));
        assert!(!ctx.is_enabled(0xFFFF));
        assert_eq!(ctx.get_error(), GL_INVALID_ENUM);
    }

    #[test]
    fn first_error_is_kept() {
        let mut ctx = ctx();
        let _ = ctx.enable(0x1);
        let _ = ctx.set_viewport(0, 0, -1, 1);
        assert_eq!(ctx.peek_error(), Some(GlError::InvalidEnum));
        assert_eq!(ctx.get_error(), GL_INVALID_ENUM);
        assert_eq!(ctx.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn depth_test_toggles_hardware_func() {
        let mut ctx = ctx();
        ctx.set_depth_func(GL_LEQUAL).unwrap();
        assert_eq!(ctx.hw().snapshot().depth_func, Some(CompareFunc::Always));
        ctx.enable(GL_DEPTH_TEST).unwrap();
        assert_eq!(ctx.hw().snapshot().depth_func, Some(CompareFunc::LessEqual));
        ctx.disable(GL_DEPTH_TEST).unwrap();
        assert_eq!(ctx.hw().snapshot().depth_func, Some(CompareFunc::Always));
    }

    #[test]
    fn depth_mask_drives_depth_write() {
        let mut ctx = ctx();
        ctx.set_depth_mask(false);
        assert_eq!(ctx.hw().snapshot().depth_write, Some(DepthWrite::Disabled));
    }

    #[test]
    fn stencil_settings_reach_both_faces_when_enabled() {
        let mut ctx = ctx();
        ctx.set_stencil_func(GL_EQUAL, 7, 0xFF).unwrap();
        ctx.set_stencil_op(GL_KEEP, GL_INCR, GL_REPLACE).unwrap();
        assert_eq!(ctx.hw().snapshot().front_stencil, Some(StencilConfig::PASSTHROUGH));

        ctx.enable(GL_STENCIL_TEST).unwrap();
        let front = ctx.hw().snapshot().front_stencil.unwrap();
        assert_eq!(front.func, CompareFunc::Equal);
        assert_eq!(front.reference, 7);
        assert_eq!(front.depth_fail, StencilOp::Incr);
        assert_eq!(ctx.hw().snapshot().back_stencil, Some(front));

        assert_eq!(ctx.set_stencil_op(GL_KEEP, 0x9999, GL_KEEP), Err(GlError::InvalidEnum));
        assert_eq!(ctx.state().stencil.depth_fail, StencilOp::Incr);
    }

    // ── culling ───────────────────────────────────────────────────────────

    #[test]
    fn cull_follows_target_orientation() {
        let mut ctx = ctx();
        ctx.enable(GL_CULL_FACE).unwrap();
        // CCW front, cull BACK, display.
        assert_eq!(ctx.hw().snapshot().cull, Some(HwCull::Cw));

        ctx.bind_render_target(RenderTarget::offscreen(128, 128));
        assert_eq!(ctx.hw().snapshot().cull, Some(HwCull::Ccw));

        ctx.set_front_face(GL_CW).unwrap();
        assert_eq!(ctx.hw().snapshot().cull, Some(HwCull::Cw));
    }

    #[test]
    fn cull_setters_do_not_touch_hardware_while_disabled() {
        let mut ctx = ctx();
        ctx.set_cull_face(GL_FRONT).unwrap();
        ctx.set_front_face(GL_CW).unwrap();
        assert!(ctx.hw().cmds().is_empty());
        assert_eq!(ctx.state().cull_target, Face::Front);
    }

    #[test]
    fn front_and_back_suppresses_geometry() {
        let mut ctx = ctx();
        ctx.enable(GL_CULL_FACE).unwrap();
        ctx.set_cull_face(GL_FRONT_AND_BACK).unwrap();
        assert!(ctx.suppress_geometry());
        let cull_cmds = ctx.hw().cmds().iter().filter(|c| matches!(c, HwCmd::CullMode(_))).count();
        assert_eq!(cull_cmds, 1);

        ctx.set_cull_face(GL_BACK).unwrap();
        assert!(!ctx.suppress_geometry());

        ctx.set_cull_face(GL_FRONT_AND_BACK).unwrap();
        ctx.disable(GL_CULL_FACE).unwrap();
        assert!(!ctx.suppress_geometry());
        assert_eq!(ctx.hw().snapshot().cull, Some(HwCull::None));
    }

    #[test]
    fn cull_face_rejects_bad_token() {
        let mut ctx = ctx();
        assert_eq!(ctx.set_cull_face(GL_CW), Err(GlError::InvalidEnum));
        assert_eq!(ctx.state().cull_target, Face::Back);
    }

    // ── polygon mode / offset ─────────────────────────────────────────────

    #[test]
    fn polygon_mode_change_alone_retriggers_offset() {
        let mut ctx = ctx();
        ctx.set_polygon_offset(2.0, 4.0);
        ctx.enable(GL_POLYGON_OFFSET_LINE).unwrap();
        assert_eq!(ctx.hw().snapshot().front_depth_bias, Some((0, 0)));

        ctx.set_polygon_mode(GL_FRONT, GL_LINE).unwrap();
        assert_eq!(ctx.hw().snapshot().front_depth_bias, Some((2, 4)));
        assert_eq!(ctx.hw().snapshot().back_depth_bias, Some((0, 0)));
        assert_eq!(ctx.hw().snapshot().front_polygon_mode, Some(HwPolygonMode::TriangleLine));
        assert_eq!(ctx.hw().snapshot().back_polygon_mode, Some(HwPolygonMode::TriangleFill));
    }

    #[test]
    fn front_and_back_polygon_mode_sets_both() {
        let mut ctx = ctx();
        ctx.set_polygon_mode(GL_FRONT_AND_BACK, GL_POINT).unwrap();
        assert_eq!(ctx.state().polygon_mode_front, PolygonMode::Point);
        assert_eq!(ctx.state().polygon_mode_back, PolygonMode::Point);
    }

    #[test]
    fn bad_polygon_mode_is_rejected_strictly() {
        let mut ctx = ctx();
        let before = ctx.state().clone();
        assert_eq!(ctx.set_polygon_mode(GL_FRONT, GL_EXP2), Err(GlError::InvalidEnum));
        assert_eq!(ctx.set_polygon_mode(GL_CCW, GL_LINE), Err(GlError::InvalidEnum));
        assert_eq!(ctx.state(), &before);
        assert!(ctx.hw().cmds().is_empty());
    }

    #[test]
    fn line_width_and_point_size_validate() {
        let mut ctx = ctx();
        assert_eq!(ctx.set_line_width(0.0), Err(GlError::InvalidValue));
        assert_eq!(ctx.set_point_size(-1.0), Err(GlError::InvalidValue));
        assert!(ctx.hw().cmds().is_empty());

        ctx.set_point_size(3.0).unwrap();
        assert_eq!(ctx.hw().snapshot().point_line_width, Some(3.0));
        ctx.set_line_width(2.0).unwrap();
        assert_eq!(ctx.hw().snapshot().point_line_width, Some(2.0));
        assert_eq!(ctx.state().point_size, 3.0);
    }

    // ── viewport / scissor ────────────────────────────────────────────────

    #[test]
    fn negative_viewport_keeps_previous() {
        let mut ctx = ctx();
        ctx.set_viewport(10, 10, 100, 100).unwrap();
        let vp = ctx.hw().snapshot().viewport;
        ctx.hw_mut().clear_log();

        assert_eq!(ctx.set_viewport(0, 0, -5, 10), Err(GlError::InvalidValue));
        assert_eq!(ctx.set_viewport(0, 0, 5, -10), Err(GlError::InvalidValue));
        assert_eq!(ctx.state().viewport, PixelRect::new(10, 10, 100, 100));
        assert_eq!(ctx.hw().snapshot().viewport, vp);
        assert!(ctx.hw().cmds().is_empty());
        assert_eq!(ctx.get_error(), GL_INVALID_VALUE);
    }

    #[test]
    fn unchecked_context_applies_negative_viewport() {
        let mut ctx = unchecked();
        assert_eq!(ctx.set_viewport(0, 0, -4, 4), Ok(()));
        assert_eq!(ctx.state().viewport.width, -4);
        assert_eq!(ctx.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn depth_range_updates_z_only() {
        let mut ctx = ctx();
        ctx.set_depth_range(0.2, 0.8);
        let vp = ctx.hw().snapshot().viewport.unwrap();
        assert!((vp.z_center - 0.5).abs() < 1e-6);
        assert!((vp.z_half - 0.3).abs() < 1e-6);
        assert_eq!(vp.x_half, 480.0);

        ctx.set_depth_rangef(-1.0, 3.0);
        let vp = ctx.hw().snapshot().viewport.unwrap();
        assert_eq!((vp.z_center, vp.z_half), (0.5, 0.5));
    }

    #[test]
    fn offscreen_target_flips_viewport_y() {
        let mut ctx = ctx();
        ctx.bind_render_target(RenderTarget::offscreen(256, 128));
        ctx.set_viewport(0, 0, 256, 128).unwrap();
        let vp = ctx.hw().snapshot().viewport.unwrap();
        assert_eq!((vp.y_center, vp.y_half), (64.0, 64.0));

        let config = ContextConfig { offscreen_rows: RowOrder::SameAsDisplay, ..ContextConfig::default() };
        let mut same = GlContext::new(RecordingHw::new(), config);
        same.bind_render_target(RenderTarget::offscreen(256, 128));
        same.set_viewport(0, 0, 256, 128).unwrap();
        assert_eq!(same.hw().snapshot().viewport.unwrap().y_half, -64.0);
    }

    #[test]
    fn scissor_maps_only_when_enabled() {
        let mut ctx = ctx();
        ctx.set_scissor(0, 0, 100, 44).unwrap();
        assert!(ctx.hw().cmds().is_empty());

        ctx.enable(GL_SCISSOR_TEST).unwrap();
        assert_eq!(ctx.hw().snapshot().region_clip, Some(Some(PixelRect::new(0, 500, 100, 44))));

        ctx.disable(GL_SCISSOR_TEST).unwrap();
        assert_eq!(ctx.hw().snapshot().region_clip, Some(None));
        assert_eq!(ctx.set_scissor(0, 0, -1, 1), Err(GlError::InvalidValue));
    }

    #[test]
    fn offscreen_scissor_covers_viewport_rows() {
        let mut ctx = ctx();
        ctx.bind_render_target(RenderTarget::offscreen(256, 256));
        ctx.set_viewport(0, 0, 64, 64).unwrap();
        ctx.set_scissor(0, 0, 64, 64).unwrap();
        ctx.enable(GL_SCISSOR_TEST).unwrap();

        let snap = ctx.hw().snapshot();
        let vp = snap.viewport.unwrap();
        let clip = snap.region_clip.unwrap().unwrap();
        assert_eq!((vp.y_center - vp.y_half.abs(), vp.y_center + vp.y_half.abs()), (192.0, 256.0));
        assert_eq!((clip.y, clip.y + clip.height), (192, 256));
    }

    #[test]
    fn huge_scissor_is_accepted_and_clips_everything() {
        let mut ctx = ctx();
        ctx.enable(GL_SCISSOR_TEST).unwrap();
        assert_eq!(ctx.set_scissor(0, 2_000_000_000, 10, 2_000_000_000), Ok(()));
        assert!(ctx.hw().snapshot().region_clip.unwrap().unwrap().is_empty());
        assert_eq!(ctx.get_error(), GL_NO_ERROR);
    }

    // ── clears ────────────────────────────────────────────────────────────

    #[test]
    fn color_clear_is_state_neutral() {
        let mut ctx = ctx();
        ctx.enable(GL_DEPTH_TEST).unwrap();
        ctx.enable(GL_CULL_FACE).unwrap();
        ctx.set_depth_mask(false);
        ctx.set_clear_color(0.1, 0.2, 0.3, 1.0);
        let state_before = ctx.state().clone();
        let hw_before = ctx.hw().snapshot().clone();

        ctx.clear(GL_COLOR_BUFFER_BIT).unwrap();

        assert_eq!(ctx.state(), &state_before);
        let hw_after = ctx.hw().snapshot();
        assert_eq!(hw_after.depth_func, hw_before.depth_func);
        assert_eq!(hw_after.depth_write, hw_before.depth_write);
        assert_eq!(hw_after.cull, hw_before.cull);
        assert_eq!(hw_after.viewport, hw_before.viewport);
        assert_eq!(ctx.hw().draw_count(), 1);
    }

    #[test]
    fn clear_rebinds_client_programs() {
        let mut ctx = ctx();
        ctx.bind_programs(ProgramId(30), ProgramId(31));
        ctx.clear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT).unwrap();
        assert_eq!(ctx.hw().snapshot().vertex_program, Some(ProgramId(30)));
        assert_eq!(ctx.hw().snapshot().fragment_program, Some(ProgramId(31)));
        assert_eq!(ctx.hw().draw_count(), 2);
    }

    #[test]
    fn clear_rejects_foreign_bits() {
        let mut ctx = ctx();
        assert_eq!(ctx.clear(0x1), Err(GlError::InvalidValue));
        assert_eq!(ctx.hw().draw_count(), 0);
    }

    #[test]
    fn clear_values_are_clamped() {
        let mut ctx = ctx();
        ctx.set_clear_depth(4.0);
        ctx.set_clear_color(-1.0, 0.5, 2.0, 1.0);
        assert_eq!(ctx.state().clear_depth, 1.0);
        assert_eq!(ctx.state().clear_color, ColorRgba::new(0.0, 0.5, 1.0, 1.0));
    }

    // ── geometry phase ────────────────────────────────────────────────────

    #[test]
    fn state_changes_rejected_inside_geometry() {
        let mut ctx = ctx();
        ctx.begin_geometry().unwrap();
        let before = ctx.state().clone();

        assert_eq!(ctx.enable(GL_DEPTH_TEST), Err(GlError::InvalidOperation));
        assert_eq!(ctx.clear(GL_COLOR_BUFFER_BIT), Err(GlError::InvalidOperation));
        assert_eq!(ctx.begin_geometry(), Err(GlError::InvalidOperation));
        assert_eq!(ctx.state(), &before);
        assert_eq!(ctx.hw().draw_count(), 0);

        ctx.end_geometry().unwrap();
        assert_eq!(ctx.phase(), Phase::Idle);
        assert_eq!(ctx.end_geometry(), Err(GlError::InvalidOperation));
        ctx.enable(GL_DEPTH_TEST).unwrap();
    }

    // ── fog / hint / blend / alpha ────────────────────────────────────────

    #[test]
    fn unknown_fog_mode_is_accepted_as_exp2() {
        let mut ctx = ctx();
        ctx.enable(GL_FOG).unwrap();
        ctx.set_fogi(GL_FOG_MODE, 0x7777).unwrap();
        assert_eq!(ctx.get_error(), GL_NO_ERROR);
        assert_eq!(ctx.fixed_function().fog.mode, InternalFog::Exp2);

        ctx.set_fog(GL_FOG_MODE, GL_LINEAR as GLfloat).unwrap();
        assert_eq!(ctx.fixed_function().fog.mode, InternalFog::Linear);
    }

    #[test]
    fn fog_parameters() {
        let mut ctx = ctx();
        ctx.set_fog(GL_FOG_START, 2.0).unwrap();
        ctx.set_fogv(GL_FOG_END, &[10.0]).unwrap();
        ctx.set_fogv(GL_FOG_COLOR, &[0.5, 0.5, 0.5, 1.0]).unwrap();
        let fog = ctx.fixed_function().fog;
        assert_eq!((fog.start, fog.end), (2.0, 10.0));
        assert_eq!(fog.color, ColorRgba::new(0.5, 0.5, 0.5, 1.0));

        assert_eq!(ctx.set_fog(GL_FOG_COLOR, 1.0), Err(GlError::InvalidEnum));
        assert_eq!(ctx.set_fogv(GL_FOG_COLOR, &[1.0]), Err(GlError::InvalidValue));
        assert_eq!(ctx.set_fog(GL_FOG_DENSITY, -1.0), Err(GlError::InvalidValue));
        assert_eq!(ctx.set_fog(0x4242, 1.0), Err(GlError::InvalidEnum));
    }

    #[test]
    fn texture_compression_hint() {
        let mut ctx = ctx();
        ctx.set_hint(GL_TEXTURE_COMPRESSION_HINT, GL_FASTEST).unwrap();
        assert!(ctx.fixed_function().fast_texture_compression);
        ctx.set_hint(GL_TEXTURE_COMPRESSION_HINT, GL_NICEST).unwrap();
        assert!(!ctx.fixed_function().fast_texture_compression);
        assert_eq!(ctx.set_hint(GL_FOG, GL_FASTEST), Err(GlError::InvalidEnum));
    }

    #[test]
    fn blend_and_alpha_reach_fixed_function() {
        let mut ctx = ctx();
        ctx.enable(GL_BLEND).unwrap();
        ctx.set_blend_func(GL_SRC_ALPHA, GL_ONE_MINUS_SRC_ALPHA).unwrap();
        ctx.enable(GL_ALPHA_TEST).unwrap();
        ctx.set_alpha_func(GL_GREATER, 1.5).unwrap();

        let ff = ctx.fixed_function();
        assert!(ff.blend.enabled);
        assert_eq!(ff.blend.src, BlendFactor::SrcAlpha);
        assert_eq!(ff.alpha_test.unwrap().reference, 1.0);

        assert_eq!(ctx.set_blend_func(GL_ONE, GL_SRC_ALPHA_SATURATE), Err(GlError::InvalidEnum));
        assert_eq!(ctx.state().blend_dst, BlendFactor::OneMinusSrcAlpha);
    }

    // ── clip plane ────────────────────────────────────────────────────────

    #[test]
    fn clip_plane_tracks_modelview() {
        let mut ctx = ctx();
        ctx.notify_modelview_changed(&Mat4::translation(0.0, 3.0, 0.0));
        ctx.set_clip_plane(GL_CLIP_PLANE0, [0.0, 1.0, 0.0, -2.0]).unwrap();
        assert_eq!(ctx.eye_clip_plane(), Vec4::new(0.0, 1.0, 0.0, -5.0));
        assert_eq!(ctx.fixed_function().clip_plane0, None);

        ctx.enable(GL_CLIP_PLANE0).unwrap();
        ctx.notify_modelview_changed(&Mat4::translation(0.0, 1.0, 0.0));
        assert_eq!(ctx.fixed_function().clip_plane0, Some(Vec4::new(0.0, 1.0, 0.0, -3.0)));
    }

    #[test]
    fn clip_plane_catches_up_on_enable() {
        let mut ctx = ctx();
        ctx.set_clip_plane(GL_CLIP_PLANE0, [1.0, 0.0, 0.0, 0.0]).unwrap();
        ctx.notify_modelview_changed(&Mat4::translation(2.0, 0.0, 0.0));
        assert_eq!(ctx.eye_clip_plane(), Vec4::new(1.0, 0.0, 0.0, 0.0));

        ctx.enable(GL_CLIP_PLANE0).unwrap();
        assert_eq!(ctx.eye_clip_plane(), Vec4::new(1.0, 0.0, 0.0, -2.0));
    }

    #[test]
    fn only_plane_zero_exists() {
        let mut ctx = ctx();
        assert_eq!(ctx.set_clip_plane(GL_CLIP_PLANE0 + 1, [0.0; 4]), Err(GlError::InvalidEnum));
    }
}
