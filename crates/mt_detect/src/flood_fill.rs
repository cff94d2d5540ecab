use std::collections::VecDeque;

use image::RgbaImage;
use mt_app::{BoundingBox, MeasureAxes, PointI32};

use crate::tolerance::{ColorTolerance, SimilarityReference};
use crate::{BoundaryDetector, origin_in_buffer};

/// 4-connected flood fill from the origin; returns the bounding box of the visited region.
///
/// Visits every pixel of the region, so cost grows with the surface area instead of its
/// perimeter. With `SimilarityReference::Previous` a pixel is compared to the neighbour it was
/// reached from.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodFillDetector {
    pub tolerance: ColorTolerance,
    pub reference: SimilarityReference,
    pub axes: MeasureAxes,
}

impl FloodFillDetector {
    pub fn new(tolerance: ColorTolerance, reference: SimilarityReference, axes: MeasureAxes) -> Self {
        Self {
            tolerance,
            reference,
            axes,
        }
    }
}

impl BoundaryDetector for FloodFillDetector {
    fn detect(&self, buffer: &RgbaImage, origin: PointI32) -> Option<BoundingBox> {
        let (ox, oy) = origin_in_buffer(buffer, origin)?;
        let (w, h) = (buffer.width(), buffer.height());
        let origin_color = *buffer.get_pixel(ox, oy);

        let mut visited = vec![false; (w as usize) * (h as usize)];
        let mut queue = VecDeque::new();
        visited[(oy * w + ox) as usize] = true;
        queue.push_back((ox, oy));

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (ox, oy, ox, oy);

        while let Some((x, y)) = queue.pop_front() {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);

            let reference = match self.reference {
                SimilarityReference::Origin => origin_color,
                SimilarityReference::Previous => *buffer.get_pixel(x, y),
            };

            let neighbours = [
                (x.checked_sub(1), Some(y)),
                (x.checked_add(1).filter(|&nx| nx < w), Some(y)),
                (Some(x), y.checked_sub(1)),
                (Some(x), y.checked_add(1).filter(|&ny| ny < h)),
            ];

            for (nx, ny) in neighbours {
                let (Some(nx), Some(ny)) = (nx, ny) else {
                    continue;
                };
                let idx = (ny * w + nx) as usize;
                if visited[idx] {
                    continue;
                }
                if self.tolerance.similar(reference, *buffer.get_pixel(nx, ny)) {
                    visited[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        let mut bounds = BoundingBox::new(
            min_x as i32,
            min_y as i32,
            max_x as i32 + 1,
            max_y as i32 + 1,
        );
        if !self.axes.horizontal() {
            bounds.left = origin.x;
            bounds.right = origin.x + 1;
        }
        if !self.axes.vertical() {
            bounds.top = origin.y;
            bounds.bottom = origin.y + 1;
        }

        Some(bounds)
    }
}
