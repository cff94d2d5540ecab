use mt_rendering::Color;
use mt_settings::{Settings, Units};

/// Alpha factor applied to the feet of degenerate measurements.
pub const DEGENERATE_FEET_ALPHA: f32 = 0.35;

/// Alpha factor applied to the outline of locked measurements.
pub const LOCKED_OUTLINE_ALPHA: f32 = 0.8;

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Resolved overlay style.
///
/// Built once from [`Settings`] at startup and shared read-only by every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub line_color: Color,
    pub line_width: f32,
    pub feet_half_length: f32,
    pub show_cross_lines: bool,

    pub font_size: f32,
    pub text_color: Color,
    pub label_background: Color,
    pub label_padding: f32,
    pub label_margin: f32,
    pub corner_radius: f32,

    pub shadow_color: Color,
    pub shadow_radius: f32,
    pub shadow_offset: f32,

    pub units: Units,
    pub dpi: f32,
}

impl OverlayStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        let style = &settings.style;
        Self {
            line_color: color(style.line_color),
            line_width: style.line_width,
            feet_half_length: style.feet_half_length,
            show_cross_lines: style.show_cross_lines,

            font_size: style.font_size,
            text_color: color(style.label_text_color),
            label_background: color(style.label_background),
            label_padding: style.label_padding,
            label_margin: style.label_margin,
            corner_radius: style.text_box_corner_radius,

            shadow_color: Color::BLACK.scale_alpha(style.shadow_opacity),
            shadow_radius: style.shadow_radius,
            shadow_offset: style.shadow_offset,

            units: settings.units,
            dpi: settings.dpi,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
