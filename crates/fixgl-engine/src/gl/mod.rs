//! GL-facing vocabulary: raw tokens, the error taxonomy, and typed views of
//! the enumerated parameters the state machine accepts.

mod enums;
mod error;
pub mod types;

pub use enums::{
    BlendFactor, Capability, ClearMask, CompareFunc, CullTarget, Face, FogMode, FogParam,
    FrontFace, HintTarget, PolygonMode, StencilOp,
};
pub use error::{ErrorSlot, GlError, GlResult};
