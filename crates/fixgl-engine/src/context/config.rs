use super::{RenderTarget, RowOrder};

/// Construction-time context settings.
///
/// Keep this minimal; everything here is read once and never changes for the
/// lifetime of a [`super::GlContext`].
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Display surface width in pixels.
    pub display_width: u32,

    /// Display surface height in pixels.
    pub display_height: u32,

    /// Row order convention for offscreen targets.
    ///
    /// Consumed by the viewport transform and the cull resolver.
    pub offscreen_rows: RowOrder,

    /// Validate values and call phase.
    ///
    /// When disabled, negative viewport extents, non-positive widths and calls
    /// made inside a geometry block are applied as-is. Token decoding is always
    /// strict.
    pub error_checking: bool,
}

impl ContextConfig {
    #[inline]
    pub fn display_target(&self) -> RenderTarget {
        RenderTarget::display(self.display_width, self.display_height)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            display_width: 960,
            display_height: 544,
            offscreen_rows: RowOrder::Inverted,
            error_checking: true,
        }
    }
}
