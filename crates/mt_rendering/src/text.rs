//! Text metrics shared by layout and raster backends.
//!
//! Layout never rasterises text itself; it asks a [`TextMeasurer`] (normally the backend that will
//! draw the label) how large a line is, so the label box always fits the rendered glyphs.

/// Measures single lines of label text.
pub trait TextMeasurer {
    /// Size `(width, height)` of a single line of `text` at `font_size`.
    fn text_size(&self, text: &str, font_size: f32) -> (f32, f32);
}

/// Horizontal advance per glyph of [`MonospaceMetrics`], as a fraction of the font size.
pub const ADVANCE_RATIO: f32 = 0.6;

/// Fixed-pitch estimate used when no font is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMetrics;

impl TextMeasurer for MonospaceMetrics {
    fn text_size(&self, text: &str, font_size: f32) -> (f32, f32) {
        let glyphs = text.chars().count() as f32;
        (glyphs * font_size * ADVANCE_RATIO, font_size)
    }
}
