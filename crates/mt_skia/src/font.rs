//! Outline font used for label text.

use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, FontVec, Glyph, PxScale, ScaleFont, point};
use fontdb::{Database, Family, Query};
use mt_rendering::TextMeasurer;

use crate::RasterError;

/// A loaded font face, cheap to clone.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl LabelFont {
    /// Parse face `index` of a font file already in memory.
    pub fn from_vec(data: Vec<u8>, index: u32) -> Result<Self, RasterError> {
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| RasterError::InvalidFont(e.to_string()))?;
        Ok(Self {
            font: FontArc::new(font),
        })
    }

    /// Load the first face of a TrueType/OpenType file.
    pub fn from_file(path: &Path) -> Result<Self, RasterError> {
        let data = std::fs::read(path).map_err(|e| RasterError::FontUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_vec(data, 0)
    }

    /// First sans-serif face installed on the system, or any face when none matches.
    pub fn system() -> Option<Self> {
        let mut db = Database::new();
        db.load_system_fonts();

        let query = Query {
            families: &[Family::SansSerif, Family::Name("DejaVu Sans"), Family::Monospace],
            ..Query::default()
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|face| face.id))?;

        match db.with_face_data(id, |data, index| Self::from_vec(data.to_vec(), index))? {
            Ok(font) => Some(font),
            Err(e) => {
                log::warn!("system font rejected: {e}");
                None
            }
        }
    }

    /// Pixels above the baseline at `font_size`.
    pub fn ascent(&self, font_size: f32) -> f32 {
        self.font.as_scaled(PxScale::from(font_size)).ascent()
    }

    /// Glyphs of `text` with their baseline starting at `(x, baseline)`, and the advance width.
    pub(crate) fn layout(
        &self,
        text: &str,
        font_size: f32,
        x: f32,
        baseline: f32,
    ) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(PxScale::from(font_size));
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0;
        let mut previous = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(scaled.scale(), point(x + caret, baseline)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }
        (glyphs, caret)
    }

    pub(crate) fn font(&self) -> &FontArc {
        &self.font
    }
}

impl TextMeasurer for LabelFont {
    fn text_size(&self, text: &str, font_size: f32) -> (f32, f32) {
        let scaled = self.font.as_scaled(PxScale::from(font_size));
        let (_, width) = self.layout(text, font_size, 0.0, 0.0);
        (width, scaled.ascent() - scaled.descent())
    }
}
