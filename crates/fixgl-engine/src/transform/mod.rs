//! Window-space to hardware-space transforms.
//!
//! - `viewport`: viewport rectangle + depth range to center/half-extent form
//! - `scissor`: GL scissor box to a top-left region clip
//! - `clip_plane`: object-space plane to eye space

mod clip_plane;
mod scissor;
mod viewport;

pub use clip_plane::eye_space_plane;
pub use scissor::region_clip_for;
pub use viewport::{full_target_viewport, viewport_transform};
