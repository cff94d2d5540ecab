use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, PointI32};

/// Minimum useful extent (in pixels) of a measured axis.
///
/// Smaller results are still valid output; they are flagged as degenerate so the overlay can
/// render them in a dimmed state.
pub const DEGENERATE_MIN_SIZE: i32 = 3;

/// Which axes a measurement expands along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureAxes {
    /// Both axes: the result is a rectangle.
    #[default]
    Cross,
    /// Left/right only: the result is the one-pixel row through the sample point.
    Horizontal,
    /// Up/down only: the result is the one-pixel column through the sample point.
    Vertical,
}

impl MeasureAxes {
    #[inline]
    pub fn horizontal(self) -> bool {
        matches!(self, MeasureAxes::Cross | MeasureAxes::Horizontal)
    }

    #[inline]
    pub fn vertical(self) -> bool {
        matches!(self, MeasureAxes::Cross | MeasureAxes::Vertical)
    }
}

/// Cursor position plus the directional offset applied before sampling.
///
/// The offset keeps the pointer glyph's own pixels out of the detector's starting pixel when the
/// live display (which contains the pointer) is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSample {
    pub cursor: PointI32,
    pub offset: (i32, i32),
}

impl CursorSample {
    #[inline]
    pub fn new(cursor: PointI32, offset: (i32, i32)) -> Self {
        Self { cursor, offset }
    }

    #[inline]
    pub fn without_offset(cursor: PointI32) -> Self {
        Self {
            cursor,
            offset: (0, 0),
        }
    }

    /// Point the detector starts from.
    #[inline]
    pub fn sample_point(&self) -> PointI32 {
        self.cursor.offset(self.offset.0, self.offset.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementQuality {
    #[default]
    Normal,
    /// A measured axis is below [`DEGENERATE_MIN_SIZE`].
    Degenerate,
}

/// One detected measurement in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub bounds: BoundingBox,
    /// Point the detection started from.
    pub sample: PointI32,
    pub axes: MeasureAxes,
    pub quality: MeasurementQuality,
}

impl Measurement {
    /// Wrap a detection result, classifying it against `min_size`.
    pub fn new(bounds: BoundingBox, sample: PointI32, axes: MeasureAxes, min_size: i32) -> Self {
        let too_narrow = axes.horizontal() && bounds.width() < min_size;
        let too_short = axes.vertical() && bounds.height() < min_size;
        let quality = if too_narrow || too_short {
            MeasurementQuality::Degenerate
        } else {
            MeasurementQuality::Normal
        };

        Self {
            bounds,
            sample,
            axes,
            quality,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.quality == MeasurementQuality::Degenerate
    }
}
