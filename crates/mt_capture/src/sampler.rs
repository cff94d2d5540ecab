use image::{RgbaImage, imageops};
use mt_app::{BoundingBox, PointI32};
use serde::{Deserialize, Serialize};

use crate::CaptureError;
use crate::source::{CaptureHandle, ScreenSource};

/// When the display is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Read the live display on every capture.
    #[default]
    Continuous,
    /// Read the whole display once when capture starts and crop every sample from that frame.
    Frozen,
}

impl CaptureMode {
    /// The live display contains the pointer glyph; a frozen frame is taken before the overlay
    /// starts tracking and does not.
    #[inline]
    pub fn applies_cursor_offset(self) -> bool {
        matches!(self, CaptureMode::Continuous)
    }
}

/// Pixels read from the display plus where they came from.
#[derive(Debug, Clone)]
pub struct CapturedRegion {
    /// Screen position of the top-left pixel.
    pub origin: PointI32,
    pub pixels: RgbaImage,
}

impl CapturedRegion {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.pixels.width() as i32,
            self.origin.y + self.pixels.height() as i32,
        )
    }
}

/// Captures the pixel region around a point from a [`ScreenSource`].
///
/// The capture handle is held between [`start`](Self::start) and [`stop`](Self::stop) (or drop),
/// so teardown is deterministic.
pub struct ScreenSampler<S: ScreenSource> {
    source: S,
    mode: CaptureMode,
    handle: Option<S::Handle>,
    frozen: Option<CapturedRegion>,
}

impl<S: ScreenSource> ScreenSampler<S> {
    pub fn new(source: S, mode: CaptureMode) -> Self {
        Self {
            source,
            mode,
            handle: None,
            frozen: None,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn is_started(&self) -> bool {
        self.handle.is_some()
    }

    /// Screen rectangle of the open display, `None` until started.
    pub fn screen_bounds(&self) -> Option<BoundingBox> {
        self.handle.as_ref().map(|h| h.screen_bounds())
    }

    /// Acquire the capture handle. Calling it while started is a no-op.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.handle.is_some() {
            return Ok(());
        }

        self.handle = Some(self.source.open()?);
        log::debug!("screen capture started ({:?})", self.mode);

        if self.mode == CaptureMode::Frozen
            && let Err(e) = self.grab_frozen_frame()
        {
            // Retried on the next capture.
            log::debug!("initial frozen frame failed: {e}");
        }
        Ok(())
    }

    /// Release the capture handle and any frozen frame.
    pub fn stop(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("screen capture stopped");
        }
        self.frozen = None;
    }

    /// Capture the smallest region covering `center ± radius`, clipped to the screen.
    pub fn capture(
        &mut self,
        center: PointI32,
        radius: (i32, i32),
    ) -> Result<CapturedRegion, CaptureError> {
        let handle = self.handle.as_mut().ok_or(CaptureError::NotStarted)?;
        let wanted = BoundingBox::around(center, radius.0, radius.1);
        let region = wanted
            .intersect(&handle.screen_bounds())
            .ok_or(CaptureError::EmptyRegion)?;

        match self.mode {
            CaptureMode::Continuous => {
                let pixels = handle.read(region)?;
                Ok(CapturedRegion {
                    origin: PointI32::new(region.left, region.top),
                    pixels,
                })
            }
            CaptureMode::Frozen => {
                if self.frozen.is_none() {
                    self.grab_frozen_frame()?;
                }
                let frame = self.frozen.as_ref().ok_or(CaptureError::NotStarted)?;
                crop_region(frame, region)
            }
        }
    }

    fn grab_frozen_frame(&mut self) -> Result<(), CaptureError> {
        let handle = self.handle.as_mut().ok_or(CaptureError::NotStarted)?;
        let screen = handle.screen_bounds();
        let pixels = handle.read(screen)?;
        self.frozen = Some(CapturedRegion {
            origin: PointI32::new(screen.left, screen.top),
            pixels,
        });
        Ok(())
    }
}

fn crop_region(frame: &CapturedRegion, region: BoundingBox) -> Result<CapturedRegion, CaptureError> {
    let region = region
        .intersect(&frame.bounds())
        .ok_or(CaptureError::EmptyRegion)?;
    let pixels = imageops::crop_imm(
        &frame.pixels,
        (region.left - frame.origin.x) as u32,
        (region.top - frame.origin.y) as u32,
        region.width() as u32,
        region.height() as u32,
    )
    .to_image();

    Ok(CapturedRegion {
        origin: PointI32::new(region.left, region.top),
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::source::ImageScreen;

    fn screen(width: u32, height: u32) -> ImageScreen {
        ImageScreen::new(RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 255])))
    }

    #[test]
    fn capture_before_start_fails() {
        let mut sampler = ScreenSampler::new(screen(100, 100), CaptureMode::Continuous);
        assert_eq!(
            sampler.capture(PointI32::new(50, 50), (8, 8)).unwrap_err(),
            CaptureError::NotStarted
        );
    }

    #[test]
    fn capture_covers_center_plus_minus_radius() {
        let mut sampler = ScreenSampler::new(screen(100, 100), CaptureMode::Continuous);
        sampler.start().unwrap();

        let region = sampler.capture(PointI32::new(50, 40), (8, 5)).unwrap();
        assert_eq!(region.origin, PointI32::new(42, 35));
        assert_eq!(region.pixels.dimensions(), (17, 11));
        assert_eq!(region.bounds(), BoundingBox::new(42, 35, 59, 46));
    }

    #[test]
    fn capture_is_clipped_at_screen_edges() {
        let mut sampler = ScreenSampler::new(screen(100, 100), CaptureMode::Continuous);
        sampler.start().unwrap();

        let region = sampler.capture(PointI32::new(2, 97), (10, 10)).unwrap();
        assert_eq!(region.bounds(), BoundingBox::new(0, 87, 13, 100));
    }

    #[test]
    fn capture_off_screen_is_an_empty_region() {
        let mut sampler = ScreenSampler::new(screen(10, 10), CaptureMode::Continuous);
        sampler.start().unwrap();
        assert_eq!(
            sampler.capture(PointI32::new(500, 500), (4, 4)).unwrap_err(),
            CaptureError::EmptyRegion
        );
    }

    #[test]
    fn stop_releases_the_handle() {
        let display = screen(10, 10);
        let mut sampler = ScreenSampler::new(display.clone(), CaptureMode::Continuous);

        sampler.start().unwrap();
        sampler.start().unwrap();
        assert_eq!(display.open_handles(), 1);

        sampler.stop();
        assert!(!sampler.is_started());
        assert_eq!(display.open_handles(), 0);

        sampler.start().unwrap();
        drop(sampler);
        assert_eq!(display.open_handles(), 0);
    }

    #[test]
    fn unavailable_display_is_reported_per_capture() {
        let display = screen(20, 20);
        let mut sampler = ScreenSampler::new(display.clone(), CaptureMode::Continuous);
        sampler.start().unwrap();

        display.set_available(false);
        assert!(matches!(
            sampler.capture(PointI32::new(5, 5), (2, 2)),
            Err(CaptureError::Unavailable(_))
        ));

        display.set_available(true);
        assert!(sampler.capture(PointI32::new(5, 5), (2, 2)).is_ok());
    }

    #[test]
    fn frozen_mode_ignores_later_frames() {
        let display = screen(20, 20);
        let mut sampler = ScreenSampler::new(display.clone(), CaptureMode::Frozen);
        sampler.start().unwrap();

        display.set_frame(RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255])));
        let region = sampler.capture(PointI32::new(10, 10), (1, 1)).unwrap();
        assert_eq!(*region.pixels.get_pixel(1, 1), Rgba([0, 0, 255, 255]));

        // A restart takes a fresh frame.
        sampler.stop();
        sampler.start().unwrap();
        let region = sampler.capture(PointI32::new(10, 10), (1, 1)).unwrap();
        assert_eq!(*region.pixels.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn screen_bounds_need_an_open_handle() {
        let mut sampler = ScreenSampler::new(screen(40, 30), CaptureMode::Continuous);
        assert_eq!(sampler.screen_bounds(), None);
        sampler.start().unwrap();
        assert_eq!(sampler.screen_bounds(), Some(BoundingBox::new(0, 0, 40, 30)));
    }

    #[test]
    fn offset_applies_only_to_continuous_capture() {
        assert!(CaptureMode::Continuous.applies_cursor_offset());
        assert!(!CaptureMode::Frozen.applies_cursor_offset());
    }
}
