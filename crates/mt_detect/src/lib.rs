use image::RgbaImage;
use mt_app::{BoundingBox, MeasureAxes, Measurement, PointI32};
use serde::{Deserialize, Serialize};

pub mod flood_fill;
pub mod per_axis;
pub mod tolerance;

pub use flood_fill::FloodFillDetector;
pub use per_axis::PerAxisDetector;
pub use tolerance::{ColorTolerance, DEFAULT_PIXEL_TOLERANCE, SimilarityReference};

/// Finds the extent of the surface under a point in a captured buffer.
///
/// Implementations work purely in buffer-local coordinates; translating to and from screen space
/// is the caller's job (see [`EdgeDetector::measure`]).
pub trait BoundaryDetector {
    /// Bounding box of the similar region containing `origin`.
    ///
    /// Returns `None` when `origin` does not lie inside `buffer`.
    fn detect(&self, buffer: &RgbaImage, origin: PointI32) -> Option<BoundingBox>;
}

/// Detection strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// Greedy walk along the row and column through the origin.
    #[default]
    PerAxis,
    /// Full 4-connected flood fill.
    ConnectedComponent,
}

/// Tagged boundary detector used by the measurement loop.
#[derive(Debug, Clone, Copy)]
pub enum EdgeDetector {
    PerAxis(PerAxisDetector),
    ConnectedComponent(FloodFillDetector),
}

impl Default for EdgeDetector {
    fn default() -> Self {
        EdgeDetector::PerAxis(PerAxisDetector::default())
    }
}

impl EdgeDetector {
    pub fn new(
        strategy: DetectionStrategy,
        tolerance: ColorTolerance,
        reference: SimilarityReference,
        axes: MeasureAxes,
    ) -> Self {
        match strategy {
            DetectionStrategy::PerAxis => {
                EdgeDetector::PerAxis(PerAxisDetector::new(tolerance, reference, axes))
            }
            DetectionStrategy::ConnectedComponent => {
                EdgeDetector::ConnectedComponent(FloodFillDetector::new(tolerance, reference, axes))
            }
        }
    }

    pub fn strategy(&self) -> DetectionStrategy {
        match self {
            EdgeDetector::PerAxis(_) => DetectionStrategy::PerAxis,
            EdgeDetector::ConnectedComponent(_) => DetectionStrategy::ConnectedComponent,
        }
    }

    pub fn axes(&self) -> MeasureAxes {
        match self {
            EdgeDetector::PerAxis(d) => d.axes,
            EdgeDetector::ConnectedComponent(d) => d.axes,
        }
    }

    /// Detect in a buffer captured at `buffer_origin` (screen position of its top-left pixel),
    /// starting from the screen point `sample`. The result is in screen coordinates.
    pub fn measure(
        &self,
        buffer: &RgbaImage,
        buffer_origin: PointI32,
        sample: PointI32,
        min_size: i32,
    ) -> Option<Measurement> {
        let local = PointI32::new(sample.x - buffer_origin.x, sample.y - buffer_origin.y);
        let bounds = self
            .detect(buffer, local)?
            .translate(buffer_origin.x, buffer_origin.y);

        log::trace!(
            "detected {}x{} at ({}, {}) for sample ({}, {})",
            bounds.width(),
            bounds.height(),
            bounds.left,
            bounds.top,
            sample.x,
            sample.y
        );

        Some(Measurement::new(bounds, sample, self.axes(), min_size))
    }
}

impl BoundaryDetector for EdgeDetector {
    fn detect(&self, buffer: &RgbaImage, origin: PointI32) -> Option<BoundingBox> {
        match self {
            EdgeDetector::PerAxis(d) => d.detect(buffer, origin),
            EdgeDetector::ConnectedComponent(d) => d.detect(buffer, origin),
        }
    }
}

/// `origin` as unsigned buffer coordinates, if it lies inside `buffer`.
#[inline]
pub(crate) fn origin_in_buffer(buffer: &RgbaImage, origin: PointI32) -> Option<(u32, u32)> {
    let x = u32::try_from(origin.x).ok()?;
    let y = u32::try_from(origin.y).ok()?;
    (x < buffer.width() && y < buffer.height()).then_some((x, y))
}
