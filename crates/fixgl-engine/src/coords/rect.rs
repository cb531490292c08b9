/// Integer window rectangle (`x`, `y` origin plus extents), as handed to
/// `glViewport` / `glScissor`.
///
/// Extents are signed so that invalid client input can be represented and rejected
/// by the caller instead of wrapping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn has_negative_extent(self) -> bool {
        self.width < 0 || self.height < 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clamps the rectangle to `[0, max_w) x [0, max_h)`.
    ///
    /// Returns `None` when nothing of the rectangle remains.
    pub fn clamp_to(self, max_w: u32, max_h: u32) -> Option<PixelRect> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = (self.x as i64 + self.width as i64).min(max_w as i64);
        let y1 = (self.y as i64 + self.height as i64).min(max_h as i64);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(PixelRect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32))
        }
    }
}
