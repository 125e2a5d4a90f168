//! Geometry
//!
//! Client rectangles and popup placement against an anchor.

/// Rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create with dimensions
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Zero-sized rect at a point
    pub fn point(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if point is inside
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if rects intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Side of the anchor a popup sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => return None,
        })
    }

    fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Resolved popup position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub side: Side,
}

/// Place a floating box of `floating` size next to `anchor`.
///
/// The preferred side is kept while the box fits; on overflow it flips to the
/// opposite side when that side fits (or has more room). Cross-axis alignment
/// starts at the anchor's start edge and flips to its end edge on overflow.
/// The result is clamped so the box never leaves the viewport entirely.
pub fn place(anchor: Rect, floating: Size, viewport: Size, preferred: Side, offset: f64) -> Placement {
    let side = resolve_side(anchor, floating, viewport, preferred, offset);

    let (mut x, mut y) = match side {
        Side::Bottom => (anchor.x, anchor.bottom() + offset),
        Side::Top => (anchor.x, anchor.y - offset - floating.height),
        Side::Right => (anchor.right() + offset, anchor.y),
        Side::Left => (anchor.x - offset - floating.width, anchor.y),
    };

    match side {
        Side::Bottom | Side::Top => {
            if x + floating.width > viewport.width {
                x = anchor.right() - floating.width;
            }
        }
        Side::Left | Side::Right => {
            if y + floating.height > viewport.height {
                y = anchor.bottom() - floating.height;
            }
        }
    }

    x = clamp_axis(x, floating.width, viewport.width);
    y = clamp_axis(y, floating.height, viewport.height);

    Placement { x, y, side }
}

fn resolve_side(anchor: Rect, floating: Size, viewport: Size, preferred: Side, offset: f64) -> Side {
    let room = |side: Side| match side {
        Side::Bottom => viewport.height - anchor.bottom() - offset,
        Side::Top => anchor.y - offset,
        Side::Right => viewport.width - anchor.right() - offset,
        Side::Left => anchor.x - offset,
    };
    let needed = |side: Side| match side {
        Side::Bottom | Side::Top => floating.height,
        Side::Left | Side::Right => floating.width,
    };

    if room(preferred) >= needed(preferred) {
        return preferred;
    }
    let flipped = preferred.opposite();
    if room(flipped) >= needed(flipped) || room(flipped) > room(preferred) {
        flipped
    } else {
        preferred
    }
}

fn clamp_axis(pos: f64, extent: f64, limit: f64) -> f64 {
    let max = (limit - extent).max(0.0);
    pos.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size { width: 800.0, height: 600.0 };

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert!(rect.contains_point(50.0, 50.0));
        assert!(!rect.contains_point(150.0, 50.0));
    }

    #[test]
    fn test_prefers_below() {
        let anchor = Rect::new(100.0, 100.0, 80.0, 30.0);
        let p = place(anchor, Size::new(160.0, 200.0), VIEWPORT, Side::Bottom, 4.0);
        assert_eq!(p.side, Side::Bottom);
        assert_eq!(p.x, 100.0);
        assert_eq!(p.y, 134.0);
    }

    #[test]
    fn test_flips_above_near_bottom() {
        let anchor = Rect::new(100.0, 500.0, 80.0, 30.0);
        let p = place(anchor, Size::new(160.0, 200.0), VIEWPORT, Side::Bottom, 4.0);
        assert_eq!(p.side, Side::Top);
        assert_eq!(p.y, 296.0);
    }

    #[test]
    fn test_flips_left_near_right_edge() {
        let anchor = Rect::new(700.0, 100.0, 80.0, 30.0);
        let p = place(anchor, Size::new(160.0, 100.0), VIEWPORT, Side::Bottom, 4.0);
        assert_eq!(p.x, 620.0);
    }

    #[test]
    fn test_never_fully_offscreen() {
        let huge = Size::new(1000.0, 900.0);
        let p = place(Rect::point(790.0, 590.0), huge, VIEWPORT, Side::Bottom, 0.0);
        assert!(p.x >= 0.0 && p.y >= 0.0);
        assert!(p.x < VIEWPORT.width && p.y < VIEWPORT.height);
    }
}
