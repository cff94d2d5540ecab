//! Frame-paced measurement host.
//!
//! One [`MeasureLoop`] runs on one thread: each tick drains queued input, then captures the
//! region around the pointer, detects the surface under it, updates the measurement model and
//! renders the overlay into a [`FrameTarget`].

use mt_capture::CaptureError;
use mt_rendering::{RenderBackend, TextMeasurer};
use mt_skia::PixmapBackend;
use thiserror::Error;

pub mod frame_clock;
pub mod input;
pub mod measure_loop;
pub mod stats;

pub use frame_clock::{Clock, FrameClock, ManualClock, SystemClock};
pub use input::{InputEvent, InputHandle, InputQueue, input_channel};
pub use measure_loop::{MeasureLoop, TickOutcome};
pub use stats::FrameStats;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("render failed: {0}")]
    Render(String),
}

/// Surface the overlay is drawn on, one frame at a time.
///
/// Labels are laid out with the target's own text metrics.
pub trait FrameTarget: RenderBackend + TextMeasurer {
    /// Size in pixels; also the screen extent labels are kept inside.
    fn size(&self) -> (u32, u32);

    /// Start a frame from a transparent surface.
    fn begin_frame(&mut self);

    /// Present the finished frame.
    fn end_frame(&mut self) -> Result<(), Self::Error>;
}

impl FrameTarget for PixmapBackend {
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn begin_frame(&mut self) {
        self.clear();
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
