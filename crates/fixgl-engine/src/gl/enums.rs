use super::types::*;

/// Declares a fieldless enum with a bijective mapping to GL tokens.
macro_rules! gl_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $token:path ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Decodes a GL token. `None` means the caller should raise `GL_INVALID_ENUM`.
            #[inline]
            pub const fn from_gl(token: GLenum) -> Option<Self> {
                match token {
                    $( $token => Some($name::$variant), )+
                    _ => None,
                }
            }

            #[inline]
            pub const fn to_gl(self) -> GLenum {
                match self {
                    $( $name::$variant => $token, )+
                }
            }
        }
    };
}

gl_enum! {
    /// Toggleable pipeline capability accepted by `glEnable` / `glDisable`.
    pub enum Capability {
        DepthTest = GL_DEPTH_TEST,
        StencilTest = GL_STENCIL_TEST,
        Blend = GL_BLEND,
        ScissorTest = GL_SCISSOR_TEST,
        CullFace = GL_CULL_FACE,
        PolygonOffsetFill = GL_POLYGON_OFFSET_FILL,
        PolygonOffsetLine = GL_POLYGON_OFFSET_LINE,
        PolygonOffsetPoint = GL_POLYGON_OFFSET_POINT,
        Texture2d = GL_TEXTURE_2D,
        AlphaTest = GL_ALPHA_TEST,
        Fog = GL_FOG,
        ClipPlane0 = GL_CLIP_PLANE0,
    }
}

gl_enum! {
    /// Face selector for polygon mode and culling.
    pub enum Face {
        Front = GL_FRONT,
        Back = GL_BACK,
        FrontAndBack = GL_FRONT_AND_BACK,
    }
}

/// Which faces `glCullFace` discards.
pub type CullTarget = Face;

gl_enum! {
    /// Winding that counts as front-facing.
    pub enum FrontFace {
        Cw = GL_CW,
        Ccw = GL_CCW,
    }
}

impl FrontFace {
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            FrontFace::Cw => FrontFace::Ccw,
            FrontFace::Ccw => FrontFace::Cw,
        }
    }
}

gl_enum! {
    /// Rasterization mode for one polygon face.
    pub enum PolygonMode {
        Point = GL_POINT,
        Line = GL_LINE,
        Fill = GL_FILL,
    }
}

gl_enum! {
    /// Client fog equation.
    pub enum FogMode {
        Linear = GL_LINEAR,
        Exp = GL_EXP,
        Exp2 = GL_EXP2,
    }
}

impl FogMode {
    /// Decodes a fog mode without ever failing: anything that is not
    /// `GL_LINEAR` or `GL_EXP` is treated as `GL_EXP2`.
    #[inline]
    pub const fn from_gl_lenient(token: GLenum) -> Self {
        match token {
            GL_LINEAR => FogMode::Linear,
            GL_EXP => FogMode::Exp,
            _ => FogMode::Exp2,
        }
    }
}

gl_enum! {
    /// Parameter name accepted by `glFog*`.
    pub enum FogParam {
        Mode = GL_FOG_MODE,
        Density = GL_FOG_DENSITY,
        Start = GL_FOG_START,
        End = GL_FOG_END,
        Color = GL_FOG_COLOR,
    }
}

gl_enum! {
    /// Depth/stencil/alpha comparison function.
    pub enum CompareFunc {
        Never = GL_NEVER,
        Less = GL_LESS,
        Equal = GL_EQUAL,
        LessEqual = GL_LEQUAL,
        Greater = GL_GREATER,
        NotEqual = GL_NOTEQUAL,
        GreaterEqual = GL_GEQUAL,
        Always = GL_ALWAYS,
    }
}

gl_enum! {
    /// Stencil buffer update operation.
    pub enum StencilOp {
        Keep = GL_KEEP,
        Zero = GL_ZERO,
        Replace = GL_REPLACE,
        Incr = GL_INCR,
        Decr = GL_DECR,
        Invert = GL_INVERT,
        IncrWrap = GL_INCR_WRAP,
        DecrWrap = GL_DECR_WRAP,
    }
}

gl_enum! {
    /// Blend factor for `glBlendFunc`.
    pub enum BlendFactor {
        Zero = GL_ZERO,
        One = GL_ONE,
        SrcColor = GL_SRC_COLOR,
        OneMinusSrcColor = GL_ONE_MINUS_SRC_COLOR,
        SrcAlpha = GL_SRC_ALPHA,
        OneMinusSrcAlpha = GL_ONE_MINUS_SRC_ALPHA,
        DstAlpha = GL_DST_ALPHA,
        OneMinusDstAlpha = GL_ONE_MINUS_DST_ALPHA,
        DstColor = GL_DST_COLOR,
        OneMinusDstColor = GL_ONE_MINUS_DST_COLOR,
        SrcAlphaSaturate = GL_SRC_ALPHA_SATURATE,
    }
}

gl_enum! {
    /// Hint target for `glHint`.
    pub enum HintTarget {
        TextureCompression = GL_TEXTURE_COMPRESSION_HINT,
    }
}

/// Buffer selection for `glClear`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ClearMask(GLbitfield);

impl ClearMask {
    pub const NONE: ClearMask = ClearMask(0);
    pub const COLOR: ClearMask = ClearMask(GL_COLOR_BUFFER_BIT);
    pub const DEPTH: ClearMask = ClearMask(GL_DEPTH_BUFFER_BIT);
    pub const STENCIL: ClearMask = ClearMask(GL_STENCIL_BUFFER_BIT);

    const ALL_BITS: GLbitfield = GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT | GL_STENCIL_BUFFER_BIT;

    /// Decodes a raw bitfield. Bits outside color/depth/stencil are rejected.
    #[inline]
    pub const fn from_gl(bits: GLbitfield) -> Option<Self> {
        if bits & !Self::ALL_BITS != 0 {
            None
        } else {
            Some(ClearMask(bits))
        }
    }

    #[inline]
    pub const fn bits(self) -> GLbitfield {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: ClearMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for ClearMask {
    type Output = ClearMask;
    #[inline]
    fn bitor(self, rhs: ClearMask) -> ClearMask {
        ClearMask(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_tokens_round_trip() {
        for token in [
            GL_DEPTH_TEST,
            GL_STENCIL_TEST,
            GL_BLEND,
            GL_SCISSOR_TEST,
            GL_CULL_FACE,
            GL_POLYGON_OFFSET_FILL,
            GL_POLYGON_OFFSET_LINE,
            GL_POLYGON_OFFSET_POINT,
            GL_TEXTURE_2D,
            GL_ALPHA_TEST,
            GL_FOG,
            GL_CLIP_PLANE0,
        ] {
            let cap = Capability::from_gl(token).unwrap();
            assert_eq!(cap.to_gl(), token);
        }
    }

    #[test]
    fn unknown_capability_is_rejected() {
        assert!(Capability::from_gl(0xDEAD).is_none());
        assert!(Capability::from_gl(GL_FRONT).is_none());
    }

    #[test]
    fn lenient_fog_mode_defaults_to_exp2() {
        assert_eq!(FogMode::from_gl_lenient(GL_LINEAR), FogMode::Linear);
        assert_eq!(FogMode::from_gl_lenient(GL_EXP), FogMode::Exp);
        assert_eq!(FogMode::from_gl_lenient(GL_EXP2), FogMode::Exp2);
        assert_eq!(FogMode::from_gl_lenient(0x1234), FogMode::Exp2);
        // The strict decoder still refuses the same garbage.
        assert!(FogMode::from_gl(0x1234).is_none());
    }

    #[test]
    fn clear_mask_rejects_foreign_bits() {
        assert!(ClearMask::from_gl(GL_COLOR_BUFFER_BIT | 0x1).is_none());
        let m = ClearMask::from_gl(GL_COLOR_BUFFER_BIT | GL_STENCIL_BUFFER_BIT).unwrap();
        assert!(m.contains(ClearMask::COLOR));
        assert!(m.contains(ClearMask::STENCIL));
        assert!(!m.contains(ClearMask::DEPTH));
    }
}
