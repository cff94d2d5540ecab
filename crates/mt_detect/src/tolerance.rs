use image::Rgba;
use serde::{Deserialize, Serialize};

/// Default maximum colour difference still treated as "the same surface".
pub const DEFAULT_PIXEL_TOLERANCE: u8 = 30;

/// How close two pixels must be to count as similar.
///
/// Alpha is ignored: captured screen pixels are opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTolerance {
    pub threshold: u8,
    /// Compare every RGB channel against `threshold` instead of the luma difference.
    pub per_channel: bool,
}

impl Default for ColorTolerance {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PIXEL_TOLERANCE,
            per_channel: false,
        }
    }
}

impl ColorTolerance {
    pub fn new(threshold: u8, per_channel: bool) -> Self {
        Self {
            threshold,
            per_channel,
        }
    }

    #[inline]
    pub fn similar(&self, a: Rgba<u8>, b: Rgba<u8>) -> bool {
        let threshold = u32::from(self.threshold);
        if self.per_channel {
            (0..3).all(|c| u32::from(a[c].abs_diff(b[c])) <= threshold)
        } else {
            luma(a).abs_diff(luma(b)) <= threshold
        }
    }
}

/// Integer Rec. 601 luma in `0..=255`.
#[inline]
fn luma(p: Rgba<u8>) -> u32 {
    (299 * u32::from(p[0]) + 587 * u32::from(p[1]) + 114 * u32::from(p[2])) / 1000
}

/// What each step of the boundary walk is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityReference {
    /// The colour at the sample point.
    #[default]
    Origin,
    /// The previously accepted pixel, so slow gradients are followed.
    Previous,
}
