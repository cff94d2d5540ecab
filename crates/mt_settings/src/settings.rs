use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mt_app::MeasureAxes;
use mt_capture::CaptureMode;
use mt_detect::{ColorTolerance, DetectionStrategy, SimilarityReference};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_SAMPLE_RADIUS;
use crate::defaults::*;

const SETTINGS_FILE_NAME: &str = "measure_tool.json";

/// Unit shown in measurement labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Pixels,
    Inches,
    Centimeters,
    Millimeters,
}

impl Units {
    /// Convert a pixel length at `dpi`.
    pub fn convert_pixels(self, pixels: i32, dpi: f32) -> f32 {
        let inches = pixels as f32 / dpi;
        match self {
            Units::Pixels => pixels as f32,
            Units::Inches => inches,
            Units::Centimeters => inches * 2.54,
            Units::Millimeters => inches * 25.4,
        }
    }

    /// Label suffix (empty for pixels).
    pub fn suffix(self) -> &'static str {
        match self {
            Units::Pixels => "",
            Units::Inches => " in",
            Units::Centimeters => " cm",
            Units::Millimeters => " mm",
        }
    }

    fn format_length(self, pixels: i32, dpi: f32) -> String {
        match self {
            Units::Pixels => pixels.to_string(),
            _ => format!("{:.2}", self.convert_pixels(pixels, dpi)),
        }
    }

    /// Label text for a measurement: `"50 × 50"`, `"0.52 × 0.52 in"`, or a single length for
    /// one-axis measurements.
    pub fn format_label(self, width: i32, height: i32, axes: MeasureAxes, dpi: f32) -> String {
        let text = match axes {
            MeasureAxes::Cross => format!(
                "{} \u{d7} {}",
                self.format_length(width, dpi),
                self.format_length(height, dpi)
            ),
            MeasureAxes::Horizontal => self.format_length(width, dpi),
            MeasureAxes::Vertical => self.format_length(height, dpi),
        };
        text + self.suffix()
    }
}

/// Immutable overlay style, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConstants {
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_corner_radius")]
    pub text_box_corner_radius: f32,
    #[serde(default = "default_feet_half_length")]
    pub feet_half_length: f32,
    #[serde(default = "default_shadow_opacity")]
    pub shadow_opacity: f32,
    #[serde(default = "default_shadow_radius")]
    pub shadow_radius: f32,
    #[serde(default = "default_shadow_offset")]
    pub shadow_offset: f32,

    #[serde(default = "default_line_width")]
    pub line_width: f32,
    #[serde(default = "default_line_color")]
    pub line_color: [u8; 4],
    #[serde(default = "default_label_background")]
    pub label_background: [u8; 4],
    #[serde(default = "default_label_text_color")]
    pub label_text_color: [u8; 4],
    #[serde(default = "default_label_padding")]
    pub label_padding: f32,
    #[serde(default = "default_label_margin")]
    pub label_margin: f32,
    /// Draw the measuring lines through the sample point of the live measurement.
    #[serde(default = "default_show_cross_lines")]
    pub show_cross_lines: bool,
    /// Font file for label text; a system sans-serif face is used when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl Default for StyleConstants {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            text_box_corner_radius: default_corner_radius(),
            feet_half_length: default_feet_half_length(),
            shadow_opacity: default_shadow_opacity(),
            shadow_radius: default_shadow_radius(),
            shadow_offset: default_shadow_offset(),
            line_width: default_line_width(),
            line_color: default_line_color(),
            label_background: default_label_background(),
            label_text_color: default_label_text_color(),
            label_padding: default_label_padding(),
            label_margin: default_label_margin(),
            show_cross_lines: default_show_cross_lines(),
            font_path: None,
        }
    }
}

/// Edge detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    #[serde(default)]
    pub strategy: DetectionStrategy,
    #[serde(default = "default_pixel_tolerance")]
    pub pixel_tolerance: u8,
    #[serde(default)]
    pub per_color_channel: bool,
    #[serde(default)]
    pub reference: SimilarityReference,
    #[serde(default)]
    pub axes: MeasureAxes,
    /// Measured extents below this are flagged degenerate.
    #[serde(default = "default_min_size")]
    pub min_size: i32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::default(),
            pixel_tolerance: default_pixel_tolerance(),
            per_color_channel: false,
            reference: SimilarityReference::default(),
            axes: MeasureAxes::default(),
            min_size: default_min_size(),
        }
    }
}

impl DetectionSettings {
    pub fn tolerance(&self) -> ColorTolerance {
        ColorTolerance::new(self.pixel_tolerance, self.per_color_channel)
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_target_frame_rate")]
    pub target_frame_rate: u32,
    #[serde(default)]
    pub capture_mode: CaptureMode,
    /// Offset added to the cursor position before sampling the live display.
    #[serde(default = "default_cursor_offset")]
    pub cursor_offset: (i32, i32),
    #[serde(default = "default_sample_radius")]
    pub sample_radius: i32,
    #[serde(default = "default_multi_measurement")]
    pub multi_measurement: bool,
    #[serde(default)]
    pub units: Units,
    #[serde(default = "default_dpi")]
    pub dpi: f32,

    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub style: StyleConstants,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_frame_rate: default_target_frame_rate(),
            capture_mode: CaptureMode::default(),
            cursor_offset: default_cursor_offset(),
            sample_radius: default_sample_radius(),
            multi_measurement: default_multi_measurement(),
            units: Units::default(),
            dpi: default_dpi(),
            detection: DetectionSettings::default(),
            style: StyleConstants::default(),
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> PathBuf {
        default_config_dir().join(SETTINGS_FILE_NAME)
    }

    /// Target duration of one frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_frame_rate.max(1)
    }

    /// Cursor offset for a capture mode. Frozen frames contain no pointer, so no offset applies.
    pub fn cursor_offset_for(&self, mode: CaptureMode) -> (i32, i32) {
        if mode.applies_cursor_offset() {
            self.cursor_offset
        } else {
            (0, 0)
        }
    }

    /// Parse settings from a JSON file and validate them.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        Ok(settings.validate())
    }

    /// Load from the default location, falling back to defaults if that fails.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e:#}; using default settings");
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values, logging each correction.
    pub fn validate(mut self) -> Self {
        let defaults = Settings::default();

        if !(1..=1000).contains(&self.target_frame_rate) {
            log::warn!(
                "target_frame_rate {} out of range, using {}",
                self.target_frame_rate,
                defaults.target_frame_rate
            );
            self.target_frame_rate = defaults.target_frame_rate;
        }
        if !(1..=MAX_SAMPLE_RADIUS).contains(&self.sample_radius) {
            let clamped = self.sample_radius.clamp(1, MAX_SAMPLE_RADIUS);
            log::warn!("sample_radius {} out of range, using {clamped}", self.sample_radius);
            self.sample_radius = clamped;
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            log::warn!("dpi {} invalid, using {}", self.dpi, defaults.dpi);
            self.dpi = defaults.dpi;
        }
        if self.detection.min_size < 1 {
            self.detection.min_size = 1;
        }

        let style = &mut self.style;
        if style.shadow_opacity.is_nan() {
            style.shadow_opacity = defaults.style.shadow_opacity;
        } else if !(0.0..=1.0).contains(&style.shadow_opacity) {
            log::warn!("shadow_opacity {} clamped", style.shadow_opacity);
            style.shadow_opacity = style.shadow_opacity.clamp(0.0, 1.0);
        }
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            log::warn!("font_size {} invalid, using {}", style.font_size, defaults.style.font_size);
            style.font_size = defaults.style.font_size;
        }
        for (name, value) in [
            ("text_box_corner_radius", &mut style.text_box_corner_radius),
            ("feet_half_length", &mut style.feet_half_length),
            ("shadow_radius", &mut style.shadow_radius),
            ("line_width", &mut style.line_width),
            ("label_padding", &mut style.label_padding),
            ("label_margin", &mut style.label_margin),
        ] {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("{name} {value} is invalid, using 0");
                *value = 0.0;
            }
        }
        if !style.shadow_offset.is_finite() {
            log::warn!(
                "shadow_offset {} invalid, using {}",
                style.shadow_offset,
                defaults.style.shadow_offset
            );
            style.shadow_offset = defaults.style.shadow_offset;
        }

        self
    }
}
