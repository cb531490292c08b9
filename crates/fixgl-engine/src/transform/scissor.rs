use crate::context::RenderTarget;
use crate::coords::PixelRect;
use crate::hw::ClipRegion;

/// Maps a GL scissor box (bottom-left origin) to a region clip in the target's
/// stored rows (top-left origin), clamped to the target.
///
/// The box covers the same stored rows as a viewport with the same rectangle,
/// on every target: row-inverted targets only flip the viewport's `y_half`.
///
/// A box entirely outside the target yields an empty region, which clips
/// everything; it is never `None`.
pub fn region_clip_for(scissor: PixelRect, target: &RenderTarget) -> ClipRegion {
    let (width, height) = (i64::from(target.width), i64::from(target.height));

    let x0 = i64::from(scissor.x).max(0);
    let x1 = (i64::from(scissor.x) + i64::from(scissor.width)).min(width);
    let top = height - i64::from(scissor.y) - i64::from(scissor.height);
    let y0 = top.max(0);
    let y1 = (top + i64::from(scissor.height)).min(height);

    if x1 <= x0 || y1 <= y0 {
        return ClipRegion::default();
    }
    PixelRect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32)
}
