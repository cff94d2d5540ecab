//! Built-in constant table. These are the defaults every [`Settings`](crate::Settings) field
//! falls back to.

use std::time::Duration;

pub const TARGET_FRAME_RATE: u32 = 120;
pub const TARGET_FRAME_DURATION: Duration =
    Duration::from_nanos(1_000_000_000 / TARGET_FRAME_RATE as u64);

pub const FONT_SIZE: f32 = 14.0;
pub const TEXT_BOX_CORNER_RADIUS: f32 = 4.0;
pub const FEET_HALF_LENGTH: f32 = 2.0;
pub const SHADOW_OPACITY: f32 = 0.4;
pub const SHADOW_RADIUS: f32 = 6.0;
pub const SHADOW_OFFSET: f32 = 5.0;

/// Keeps the pointer glyph out of the starting pixel; only needed when sampling the live display.
pub const CURSOR_OFFSET_AMOUNT_X: i32 = 4;
pub const CURSOR_OFFSET_AMOUNT_Y: i32 = 4;

/// Half-size of the region sampled around the cursor each frame.
pub const SAMPLE_RADIUS: i32 = 256;
pub const MAX_SAMPLE_RADIUS: i32 = 4096;

pub const LINE_WIDTH: f32 = 1.0;
pub const LABEL_PADDING: f32 = 6.0;
/// Gap between a measured box and its label.
pub const LABEL_MARGIN: f32 = 8.0;

pub const DEFAULT_DPI: f32 = 96.0;
