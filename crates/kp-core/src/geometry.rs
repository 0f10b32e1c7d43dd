#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle for layout bounds and hit testing.
///
/// Uses CSS pixel coordinates (origin at the viewport's top-left, y grows
/// downward). Rectangles returned by layout queries are viewport-relative, so
/// `y` may be negative for content scrolled above the fold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Create a new rectangle inside the current one with the given margin.
    ///
    /// Negative margins grow the rectangle.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: (self.width - margin.horizontal_sum()).max(0.0),
            height: (self.height - margin.vertical_sum()).max(0.0),
        }
    }

    /// Length of the vertical overlap between this rectangle and the
    /// `top..bottom` span. Never negative.
    #[inline]
    pub fn vertical_overlap(&self, top: f64, bottom: f64) -> f64 {
        (self.bottom().min(bottom) - self.y.max(top)).max(0.0)
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }
}

/// Width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with vertical values only.
    pub const fn vertical(val: f64) -> Self {
        Self {
            top: val,
            right: 0.0,
            bottom: val,
            left: 0.0,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

/// One read of the document scroll position.
///
/// Ephemeral: layout providers produce a fresh sample per evaluation and
/// nothing keeps it around.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSample {
    /// Vertical scroll offset of the document (`window.pageYOffset`).
    pub scroll_top: f64,
    /// Height of the visual viewport (`window.innerHeight`).
    pub viewport_height: f64,
    /// Full scrollable height (`documentElement.scrollHeight`).
    pub document_height: f64,
}

impl ScrollSample {
    pub const fn new(scroll_top: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// Maximum scroll offset reachable in this document.
    #[inline]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Vertical midpoint of the viewport in viewport coordinates.
    #[inline]
    pub fn viewport_center(&self) -> f64 {
        self.viewport_height / 2.0
    }

    /// Replace non-finite or negative host values with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }
        Self {
            scroll_top: clean(self.scroll_top),
            viewport_height: clean(self.viewport_height),
            document_height: clean(self.document_height),
        }
    }
}
