use image::RgbaImage;
use mt_app::{BoundingBox, MeasureAxes, PointI32};

use crate::tolerance::{ColorTolerance, SimilarityReference};
use crate::{BoundaryDetector, origin_in_buffer};

/// Greedy per-axis expansion.
///
/// Walks left, right, up and down from the origin independently, stopping each walk at the first
/// pixel that is not similar (or at the buffer edge). Only the row and column through the origin
/// are inspected. For non-rectangular surfaces the result depends on where the origin sits and
/// can under- or over-estimate the object's true extent; that is expected output, not a detection
/// error.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerAxisDetector {
    pub tolerance: ColorTolerance,
    pub reference: SimilarityReference,
    pub axes: MeasureAxes,
}

impl PerAxisDetector {
    pub fn new(tolerance: ColorTolerance, reference: SimilarityReference, axes: MeasureAxes) -> Self {
        Self {
            tolerance,
            reference,
            axes,
        }
    }

    /// Number of similar pixels found stepping from `(x, y)` by `(dx, dy)`.
    fn walk(&self, buffer: &RgbaImage, x: u32, y: u32, dx: i32, dy: i32) -> u32 {
        let origin = *buffer.get_pixel(x, y);
        let mut reference = origin;
        let (w, h) = (buffer.width() as i64, buffer.height() as i64);
        let (mut cx, mut cy) = (x as i64, y as i64);
        let mut steps = 0;

        loop {
            cx += dx as i64;
            cy += dy as i64;
            if cx < 0 || cy < 0 || cx >= w || cy >= h {
                break;
            }

            let pixel = *buffer.get_pixel(cx as u32, cy as u32);
            if !self.tolerance.similar(reference, pixel) {
                break;
            }
            if self.reference == SimilarityReference::Previous {
                reference = pixel;
            }
            steps += 1;
        }

        steps
    }
}

impl BoundaryDetector for PerAxisDetector {
    fn detect(&self, buffer: &RgbaImage, origin: PointI32) -> Option<BoundingBox> {
        let (x, y) = origin_in_buffer(buffer, origin)?;
        let mut bounds = BoundingBox::from_point(origin);

        if self.axes.horizontal() {
            bounds.left -= self.walk(buffer, x, y, -1, 0) as i32;
            bounds.right += self.walk(buffer, x, y, 1, 0) as i32;
        }
        if self.axes.vertical() {
            bounds.top -= self.walk(buffer, x, y, 0, -1) as i32;
            bounds.bottom += self.walk(buffer, x, y, 0, 1) as i32;
        }

        Some(bounds)
    }
}
