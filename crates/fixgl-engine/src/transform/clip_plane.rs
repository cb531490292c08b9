use crate::coords::{Mat4, Vec4};

/// Transforms an object-space plane into eye space: `inverse_transpose(mv) * plane`.
///
/// A singular modelview has no inverse; the object-space plane is returned as is.
pub fn eye_space_plane(modelview: &Mat4, plane: Vec4) -> Vec4 {
    match modelview.inverse_transpose() {
        Some(it) => it.mul_vec4(plane),
        None => {
            log::warn!("clip plane: modelview is singular, using object-space plane");
            plane
        }
    }
}
