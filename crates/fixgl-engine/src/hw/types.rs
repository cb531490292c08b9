use crate::coords::PixelRect;
use crate::gl::{CompareFunc, PolygonMode, StencilOp};

/// Hardware cull mode: which screen-space winding is discarded.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum HwCull {
    #[default]
    None,
    /// Discard clockwise triangles.
    Cw,
    /// Discard counter-clockwise triangles.
    Ccw,
}

impl HwCull {
    /// Swaps `Cw` and `Ccw`; `None` is unchanged.
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            HwCull::None => HwCull::None,
            HwCull::Cw => HwCull::Ccw,
            HwCull::Ccw => HwCull::Cw,
        }
    }
}

/// Hardware triangle rasterization mode.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum HwPolygonMode {
    #[default]
    TriangleFill,
    TriangleLine,
    TrianglePoint,
}

impl From<PolygonMode> for HwPolygonMode {
    #[inline]
    fn from(mode: PolygonMode) -> Self {
        match mode {
            PolygonMode::Fill => HwPolygonMode::TriangleFill,
            PolygonMode::Line => HwPolygonMode::TriangleLine,
            PolygonMode::Point => HwPolygonMode::TrianglePoint,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DepthWrite {
    #[default]
    Enabled,
    Disabled,
}

impl DepthWrite {
    #[inline]
    pub const fn from_mask(mask: bool) -> Self {
        if mask { DepthWrite::Enabled } else { DepthWrite::Disabled }
    }
}

/// Center + half-extent viewport, per axis.
///
/// A negative `y_half` maps NDC +Y to the top row of the target.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HardwareViewport {
    pub x_center: f32,
    pub x_half: f32,
    pub y_center: f32,
    pub y_half: f32,
    pub z_center: f32,
    pub z_half: f32,
}

/// Per-face stencil configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StencilConfig {
    pub func: CompareFunc,
    pub stencil_fail: StencilOp,
    pub depth_fail: StencilOp,
    pub depth_pass: StencilOp,
    pub reference: u8,
    pub compare_mask: u8,
    pub write_mask: u8,
}

impl StencilConfig {
    /// Stencil test effectively off: always pass, never modify.
    pub const PASSTHROUGH: StencilConfig = StencilConfig {
        func: CompareFunc::Always,
        stencil_fail: StencilOp::Keep,
        depth_fail: StencilOp::Keep,
        depth_pass: StencilOp::Keep,
        reference: 0,
        compare_mask: 0xFF,
        write_mask: 0xFF,
    };
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self::PASSTHROUGH
    }
}

/// Region clip rectangle in target rows, top-left origin.
pub type ClipRegion = PixelRect;

/// Opaque handle to a patched shader program.
///
/// Ids below [`ProgramId::FIRST_CLIENT`] are reserved for built-in programs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProgramId(pub u32);

impl ProgramId {
    /// Emits the fixed 4-vertex full-viewport fan from `Uniform::ClearPosition`.
    pub const CLEAR_VERTEX: ProgramId = ProgramId(1);
    /// Outputs `Uniform::ClearColor`.
    pub const CLEAR_COLOR: ProgramId = ProgramId(2);
    /// Masks color output; only depth/stencil are written.
    pub const CLEAR_DEPTH_STENCIL: ProgramId = ProgramId(3);

    pub const FIRST_CLIENT: u32 = 16;

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_CLIENT
    }
}

/// Uniform parameter of the built-in programs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Uniform {
    /// `vec2[4]` fan corners in clip space.
    ClearPosition,
    /// `vec4` RGBA.
    ClearColor,
    /// `float` depth written by the fan.
    ClearDepth,
    /// `float` stencil reference, informational for the fragment program.
    ClearStencil,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    TriangleFan,
}
