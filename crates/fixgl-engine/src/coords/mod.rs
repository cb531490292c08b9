//! Math and geometry value types used by the state engine.
//!
//! Conventions:
//! - matrices are column-major, as GL hands them over
//! - window rectangles are in integer pixels
//! - colors are linear RGBA floats

mod color;
mod mat4;
mod rect;
mod vec4;

pub use color::ColorRgba;
pub use mat4::Mat4;
pub use rect::PixelRect;
pub use vec4::Vec4;
