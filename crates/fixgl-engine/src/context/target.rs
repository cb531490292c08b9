/// Which surface is receiving draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TargetKind {
    /// The visible display surface.
    Display,
    /// An offscreen color/depth target (framebuffer object).
    Offscreen,
}

/// Active render target as reported by the framebuffer subsystem.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderTarget {
    pub kind: TargetKind,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    #[inline]
    pub const fn display(width: u32, height: u32) -> Self {
        Self { kind: TargetKind::Display, width, height }
    }

    #[inline]
    pub const fn offscreen(width: u32, height: u32) -> Self {
        Self { kind: TargetKind::Offscreen, width, height }
    }

    #[inline]
    pub const fn is_display(&self) -> bool {
        matches!(self.kind, TargetKind::Display)
    }
}

/// Row order of offscreen targets relative to the display, fixed per context.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum RowOrder {
    /// Offscreen targets are stored upside down relative to the display.
    #[default]
    Inverted,
    /// Offscreen targets share the display's row order.
    SameAsDisplay,
}

/// Effective vertical orientation of a target under a [`RowOrder`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Orientation {
    Upright,
    Inverted,
}

impl Orientation {
    #[inline]
    pub const fn of(target: &RenderTarget, rows: RowOrder) -> Self {
        match (target.kind, rows) {
            (TargetKind::Offscreen, RowOrder::Inverted) => Orientation::Inverted,
            _ => Orientation::Upright,
        }
    }

    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Orientation::Upright => Orientation::Inverted,
            Orientation::Inverted => Orientation::Upright,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_always_upright() {
        let t = RenderTarget::display(960, 544);
        assert_eq!(Orientation::of(&t, RowOrder::Inverted), Orientation::Upright);
        assert_eq!(Orientation::of(&t, RowOrder::SameAsDisplay), Orientation::Upright);
    }

    #[test]
    fn offscreen_follows_row_order() {
        let t = RenderTarget::offscreen(256, 256);
        assert_eq!(Orientation::of(&t, RowOrder::Inverted), Orientation::Inverted);
        assert_eq!(Orientation::of(&t, RowOrder::SameAsDisplay), Orientation::Upright);
    }
}
