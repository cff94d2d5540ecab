use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use image::{RgbaImage, imageops};
use mt_app::BoundingBox;
use parking_lot::RwLock;

use crate::CaptureError;

/// A display that can be opened for capture.
pub trait ScreenSource {
    type Handle: CaptureHandle;

    /// Acquire a capture handle. The handle releases its resources when dropped.
    fn open(&mut self) -> Result<Self::Handle, CaptureError>;
}

/// An open capture session on a display.
pub trait CaptureHandle {
    /// Screen rectangle covered by the display.
    fn screen_bounds(&self) -> BoundingBox;

    /// Read the pixels of `region`, which the caller has already clipped to `screen_bounds`.
    fn read(&mut self, region: BoundingBox) -> Result<RgbaImage, CaptureError>;
}

#[derive(Debug)]
struct SharedScreen {
    pixels: RwLock<Arc<RgbaImage>>,
    available: AtomicBool,
    open_handles: AtomicUsize,
}

/// In-memory display backed by an image, with its top-left pixel at screen `(0, 0)`.
///
/// Clones share the same contents, so one clone can be handed to the sampler while another
/// swaps frames in or toggles availability (e.g. to simulate a display mode switch).
#[derive(Debug, Clone)]
pub struct ImageScreen {
    shared: Arc<SharedScreen>,
}

impl ImageScreen {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            shared: Arc::new(SharedScreen {
                pixels: RwLock::new(Arc::new(pixels)),
                available: AtomicBool::new(true),
                open_handles: AtomicUsize::new(0),
            }),
        }
    }

    /// Replace the displayed frame.
    pub fn set_frame(&self, pixels: RgbaImage) {
        *self.shared.pixels.write() = Arc::new(pixels);
    }

    pub fn set_available(&self, available: bool) {
        self.shared.available.store(available, Ordering::SeqCst);
    }

    /// Number of capture handles currently alive.
    pub fn open_handles(&self) -> usize {
        self.shared.open_handles.load(Ordering::SeqCst)
    }

    fn unavailable() -> CaptureError {
        CaptureError::Unavailable("display surface is not readable".to_string())
    }
}

impl ScreenSource for ImageScreen {
    type Handle = ImageCaptureHandle;

    fn open(&mut self) -> Result<Self::Handle, CaptureError> {
        if !self.shared.available.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.shared.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(ImageCaptureHandle {
            shared: Arc::clone(&self.shared),
        })
    }
}

/// Capture handle for [`ImageScreen`].
#[derive(Debug)]
pub struct ImageCaptureHandle {
    shared: Arc<SharedScreen>,
}

impl CaptureHandle for ImageCaptureHandle {
    fn screen_bounds(&self) -> BoundingBox {
        let pixels = self.shared.pixels.read();
        BoundingBox::new(0, 0, pixels.width() as i32, pixels.height() as i32)
    }

    fn read(&mut self, region: BoundingBox) -> Result<RgbaImage, CaptureError> {
        if !self.shared.available.load(Ordering::SeqCst) {
            return Err(ImageScreen::unavailable());
        }

        let frame: Arc<RgbaImage> = self.shared.pixels.read().clone();
        let screen = BoundingBox::new(0, 0, frame.width() as i32, frame.height() as i32);
        let region = region.intersect(&screen).ok_or(CaptureError::EmptyRegion)?;

        Ok(imageops::crop_imm(
            frame.as_ref(),
            region.left as u32,
            region.top as u32,
            region.width() as u32,
            region.height() as u32,
        )
        .to_image())
    }
}

impl Drop for ImageCaptureHandle {
    fn drop(&mut self) {
        self.shared.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
