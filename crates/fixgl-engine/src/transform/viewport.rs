use crate::context::{DepthRange, Orientation, RenderTarget, RowOrder};
use crate::coords::PixelRect;
use crate::hw::HardwareViewport;

/// Maps a GL viewport and depth range onto the hardware's center/half-extent form.
///
/// `y_half` is `-height / 2` for upright targets: window rows grow downwards on
/// the hardware while GL's Y grows upwards. Row-inverted targets flip only the
/// sign of `y_half`; `y_center` is the same for both.
pub fn viewport_transform(
    rect: PixelRect,
    depth: DepthRange,
    target: &RenderTarget,
    rows: RowOrder,
) -> HardwareViewport {
    let x_half = rect.width as f32 / 2.0;
    let upright_y_half = -(rect.height as f32) / 2.0;
    let y_center = target.height as f32 - rect.y as f32 + upright_y_half;

    let y_half = match Orientation::of(target, rows) {
        Orientation::Upright => upright_y_half,
        Orientation::Inverted => -upright_y_half,
    };

    HardwareViewport {
        x_center: rect.x as f32 + x_half,
        x_half,
        y_center,
        y_half,
        z_center: (depth.far + depth.near) / 2.0,
        z_half: (depth.far - depth.near) / 2.0,
    }
}

/// Viewport covering the whole target with the default depth range.
#[inline]
pub fn full_target_viewport(target: &RenderTarget, rows: RowOrder) -> HardwareViewport {
    let full = PixelRect::new(0, 0, target.width as i32, target.height as i32);
    viewport_transform(full, DepthRange::default(), target, rows)
}
