use std::path::PathBuf;

use mt_detect::DEFAULT_PIXEL_TOLERANCE;

use crate::constants::*;

// Frame pacing
pub fn default_target_frame_rate() -> u32 {
    TARGET_FRAME_RATE
}

// Sampling
pub fn default_cursor_offset() -> (i32, i32) {
    (CURSOR_OFFSET_AMOUNT_X, CURSOR_OFFSET_AMOUNT_Y)
}

pub fn default_sample_radius() -> i32 {
    SAMPLE_RADIUS
}

pub fn default_pixel_tolerance() -> u8 {
    DEFAULT_PIXEL_TOLERANCE
}

pub fn default_min_size() -> i32 {
    mt_app::DEGENERATE_MIN_SIZE
}

pub fn default_multi_measurement() -> bool {
    true
}

pub fn default_dpi() -> f32 {
    DEFAULT_DPI
}

// Style
pub fn default_font_size() -> f32 {
    FONT_SIZE
}

pub fn default_corner_radius() -> f32 {
    TEXT_BOX_CORNER_RADIUS
}

pub fn default_feet_half_length() -> f32 {
    FEET_HALF_LENGTH
}

pub fn default_shadow_opacity() -> f32 {
    SHADOW_OPACITY
}

pub fn default_shadow_radius() -> f32 {
    SHADOW_RADIUS
}

pub fn default_shadow_offset() -> f32 {
    SHADOW_OFFSET
}

pub fn default_line_width() -> f32 {
    LINE_WIDTH
}

pub fn default_label_padding() -> f32 {
    LABEL_PADDING
}

pub fn default_label_margin() -> f32 {
    LABEL_MARGIN
}

pub fn default_line_color() -> [u8; 4] {
    [255, 69, 0, 255]
}

pub fn default_label_background() -> [u8; 4] {
    [32, 32, 32, 235]
}

pub fn default_label_text_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

pub fn default_show_cross_lines() -> bool {
    true
}

/// Per-user directory holding `measure_tool.json`.
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("APPDATA") {
        return PathBuf::from(dir).join("measure_tool");
    }
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(dir).join("measure_tool");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join("measure_tool");
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".measure_tool")
}
