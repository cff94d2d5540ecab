use thiserror::Error;

pub mod sampler;
pub mod source;

pub use sampler::{CaptureMode, CapturedRegion, ScreenSampler};
pub use source::{CaptureHandle, ImageCaptureHandle, ImageScreen, ScreenSource};

/// Screen capture errors.
///
/// None of these are fatal to a measurement session: the caller skips the frame and retries on
/// the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The display surface cannot be read right now (e.g. during a mode switch).
    #[error("display unavailable: {0}")]
    Unavailable(String),

    /// No capture handle is held.
    #[error("screen capture has not been started")]
    NotStarted,

    /// The requested region does not overlap the screen.
    #[error("requested region lies outside the screen")]
    EmptyRegion,
}
