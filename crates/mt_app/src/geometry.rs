use serde::{Deserialize, Serialize};

/// Integer point in screen (or buffer) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointI32 {
    pub x: i32,
    pub y: i32,
}

impl PointI32 {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Axis-aligned pixel rectangle.
///
/// Edges are half-open: the box covers columns `left..right` and rows `top..bottom`, so
/// `width() == right - left`. A box that covers a single pixel has width and height 1; an empty
/// box (zero area) only shows up transiently while a detector is still growing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    /// Create a box, normalizing swapped edges so `left <= right` and `top <= bottom` always hold.
    #[inline]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// The one-pixel box covering `point`.
    #[inline]
    pub fn from_point(point: PointI32) -> Self {
        Self {
            left: point.x,
            top: point.y,
            right: point.x.saturating_add(1),
            bottom: point.y.saturating_add(1),
        }
    }

    /// The smallest box covering `center ± radius` (inclusive on both sides), saturating at the
    /// `i32` range.
    #[inline]
    pub fn around(center: PointI32, radius_x: i32, radius_y: i32) -> Self {
        let rx = radius_x.max(0);
        let ry = radius_y.max(0);
        Self {
            left: center.x.saturating_sub(rx),
            top: center.y.saturating_sub(ry),
            right: center.x.saturating_add(rx).saturating_add(1),
            bottom: center.y.saturating_add(ry).saturating_add(1),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains_point(&self, point: PointI32) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Nearest pixel of a non-empty box to `point`.
    #[inline]
    pub fn clamp_point(&self, point: PointI32) -> PointI32 {
        PointI32::new(
            point.x.clamp(self.left, self.right.saturating_sub(1).max(self.left)),
            point.y.clamp(self.top, self.bottom.saturating_sub(1).max(self.top)),
        )
    }

    #[inline]
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Intersection of two boxes, `None` when they do not overlap.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(BoundingBox {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Center pixel (rounded towards the top-left).
    #[inline]
    pub fn center(&self) -> PointI32 {
        PointI32::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }
}
