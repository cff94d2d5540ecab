use ab_glyph::Font;
use mt_rendering::{
    Color, DrawStyle, MonospaceMetrics, Point, Rectangle, RenderBackend, TextMeasurer, TextStyle,
};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8, Stroke,
    Transform,
};

use crate::{LabelFont, RasterError};

/// Cubic Bézier factor for a quarter circle.
const BEZIER_K: f32 = 0.552_284_8;

/// Upper bound on the layers used to approximate a blurred shadow.
const MAX_SHADOW_LAYERS: u32 = 8;

fn to_skia_color(color: Color) -> Result<tiny_skia::Color, RasterError> {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a.clamp(0.0, 1.0),
    )
    .ok_or(RasterError::InvalidColor)
}

fn paint(color: Color) -> Result<Paint<'static>, RasterError> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color)?);
    paint.anti_alias = true;
    Ok(paint)
}

fn check_finite(what: &'static str, values: &[f32]) -> Result<(), RasterError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RasterError::NonFiniteGeometry(what))
    }
}

fn rect_path(rect: Rectangle) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(rect.x, rect.y);
    pb.line_to(rect.right(), rect.y);
    pb.line_to(rect.right(), rect.bottom());
    pb.line_to(rect.x, rect.bottom());
    pb.close();
    pb.finish()
}

fn rounded_rect_path(rect: Rectangle, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width * 0.5).min(rect.height * 0.5).max(0.0);
    if r <= 0.0 {
        return rect_path(rect);
    }

    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * BEZIER_K;

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

/// Source-over blend of `color` at `coverage` onto a premultiplied pixel.
fn blend(dst: PremultipliedColorU8, color: Color, coverage: f32) -> PremultipliedColorU8 {
    let sa = color.a.clamp(0.0, 1.0) * coverage.clamp(0.0, 1.0);
    let keep = 1.0 - sa;
    let channel =
        |src: f32, dst: u8| (src.clamp(0.0, 1.0) * sa * 255.0 + dst as f32 * keep).round() as u8;

    let r = channel(color.r, dst.red());
    let g = channel(color.g, dst.green());
    let b = channel(color.b, dst.blue());
    let a = channel(1.0, dst.alpha());
    PremultipliedColorU8::from_rgba(r.min(a), g.min(a), b.min(a), a).unwrap_or(dst)
}

/// Raster backend drawing into an RGBA [`Pixmap`].
///
/// The pixmap starts transparent; callers [`clear`](Self::clear) it before each frame. Text is
/// only inked once a [`LabelFont`] is attached; without one it is measured as fixed-pitch and
/// skipped.
pub struct PixmapBackend {
    pixmap: Pixmap,
    font: Option<LabelFont>,
}

impl PixmapBackend {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self { pixmap, font: None })
    }

    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn font(&self) -> Option<&LabelFont> {
        self.font.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    fn fill(&mut self, path: &Path, color: Color) -> Result<(), RasterError> {
        let paint = paint(color)?;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }

    fn stroke(&mut self, path: &Path, style: &DrawStyle) -> Result<(), RasterError> {
        if style.stroke_width <= 0.0 || style.stroke_color.a <= 0.0 {
            return Ok(());
        }
        let paint = paint(style.stroke_color)?;
        let stroke = Stroke {
            width: style.stroke_width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
        Ok(())
    }

    fn fill_and_stroke(&mut self, path: Option<Path>, style: &DrawStyle) -> Result<(), RasterError> {
        // Zero-area shapes produce no path and draw nothing.
        let Some(path) = path else {
            return Ok(());
        };
        if let Some(fill) = style.fill_color {
            self.fill(&path, fill)?;
        }
        self.stroke(&path, style)
    }
}

impl RenderBackend for PixmapBackend {
    type Error = RasterError;

    fn draw_rectangle(&mut self, rect: Rectangle, style: &DrawStyle) -> Result<(), RasterError> {
        check_finite("rectangle", &[rect.x, rect.y, rect.width, rect.height])?;
        self.fill_and_stroke(rect_path(rect), style)
    }

    fn draw_rounded_rectangle(
        &mut self,
        rect: Rectangle,
        radius: f32,
        style: &DrawStyle,
    ) -> Result<(), RasterError> {
        check_finite(
            "rounded rectangle",
            &[rect.x, rect.y, rect.width, rect.height, radius],
        )?;
        self.fill_and_stroke(rounded_rect_path(rect, radius), style)
    }

    fn draw_line(&mut self, start: Point, end: Point, style: &DrawStyle) -> Result<(), RasterError> {
        check_finite("line", &[start.x, start.y, end.x, end.y])?;
        let mut pb = PathBuilder::new();
        pb.move_to(start.x, start.y);
        pb.line_to(end.x, end.y);
        match pb.finish() {
            Some(path) => self.stroke(&path, style),
            None => Ok(()),
        }
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        style: &TextStyle,
    ) -> Result<(), RasterError> {
        check_finite("text", &[position.x, position.y, style.font_size])?;
        let Some(font) = &self.font else {
            return Ok(());
        };

        let baseline = position.y + font.ascent(style.font_size);
        let (glyphs, _) = font.layout(text, style.font_size, position.x, baseline);
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        let pixels = self.pixmap.pixels_mut();

        for glyph in glyphs {
            let Some(outline) = font.font().outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            let (x0, y0) = (bounds.min.x as i32, bounds.min.y as i32);
            outline.draw(|gx, gy, coverage| {
                let x = x0 + gx as i32;
                let y = y0 + gy as i32;
                if coverage <= 0.0 || x < 0 || y < 0 || x >= width || y >= height {
                    return;
                }
                let i = (y * width + x) as usize;
                pixels[i] = blend(pixels[i], style.color, coverage);
            });
        }
        Ok(())
    }

    fn draw_drop_shadow(
        &mut self,
        rect: Rectangle,
        corner_radius: f32,
        blur_radius: f32,
        color: Color,
    ) -> Result<(), RasterError> {
        check_finite(
            "drop shadow",
            &[rect.x, rect.y, rect.width, rect.height, corner_radius, blur_radius],
        )?;

        // Concentric translucent layers stand in for a gaussian blur: outermost first, each one
        // smaller, so coverage ramps up towards the footprint.
        let blur = blur_radius.max(0.0);
        let layers = (blur.ceil() as u32).clamp(1, MAX_SHADOW_LAYERS);
        let layer_color = color.scale_alpha(1.0 / layers as f32);

        for layer in 0..layers {
            let spread = blur * (layers - layer) as f32 / layers as f32;
            let path = rounded_rect_path(rect.expand(spread), corner_radius + spread);
            if let Some(path) = path {
                self.fill(&path, layer_color)?;
            }
        }
        Ok(())
    }
}

impl TextMeasurer for PixmapBackend {
    fn text_size(&self, text: &str, font_size: f32) -> (f32, f32) {
        match &self.font {
            Some(font) => font.text_size(text, font_size),
            None => MonospaceMetrics.text_size(text, font_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use mt_rendering::{RenderItem, RenderList};

    use super::*;

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    fn alpha_at(backend: &PixmapBackend, x: u32, y: u32) -> u8 {
        backend
            .pixmap()
            .pixel(x, y)
            .map(|p| p.alpha())
            .unwrap_or_default()
    }

    #[test]
    fn zero_sized_pixmap_is_rejected() {
        assert!(matches!(
            PixmapBackend::new(0, 10),
            Err(RasterError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn filled_rectangle_covers_its_area() {
        let mut backend = PixmapBackend::new(20, 20).unwrap();
        backend
            .draw_rectangle(Rectangle::new(5.0, 5.0, 10.0, 10.0), &DrawStyle::fill(RED))
            .unwrap();

        assert_eq!(alpha_at(&backend, 10, 10), 255);
        assert_eq!(alpha_at(&backend, 2, 2), 0);
        let bytes = backend.to_rgba_bytes();
        let i = (10 * 20 + 10) * 4;
        assert_eq!(&bytes[i..i + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn pixel_centred_line_stays_on_its_row() {
        let mut backend = PixmapBackend::new(20, 20).unwrap();
        backend
            .draw_line(
                Point::new(2.5, 10.5),
                Point::new(17.5, 10.5),
                &DrawStyle::stroke(RED, 1.0),
            )
            .unwrap();

        assert!(alpha_at(&backend, 8, 10) > 200);
        assert_eq!(alpha_at(&backend, 8, 8), 0);
        assert_eq!(alpha_at(&backend, 8, 12), 0);
    }

    #[test]
    fn rounded_corners_stay_clear() {
        let mut backend = PixmapBackend::new(40, 40).unwrap();
        backend
            .draw_rounded_rectangle(
                Rectangle::new(0.0, 0.0, 40.0, 40.0),
                10.0,
                &DrawStyle::fill(RED),
            )
            .unwrap();

        assert_eq!(alpha_at(&backend, 0, 0), 0);
        assert_eq!(alpha_at(&backend, 20, 20), 255);
        assert_eq!(alpha_at(&backend, 20, 0), 255);
    }

    #[test]
    fn text_without_a_font_is_measured_but_not_inked() {
        let mut backend = PixmapBackend::new(80, 30).unwrap();
        let style = TextStyle {
            font_size: 10.0,
            color: Color::WHITE,
        };
        backend
            .draw_text("50 \u{d7} 50", Point::new(4.0, 4.0), &style)
            .unwrap();

        assert!(backend.data().iter().all(|b| *b == 0));
        assert_eq!(backend.text_size("50", 10.0), (12.0, 10.0));
    }

    #[test]
    fn text_stays_inside_its_measured_box() {
        let Some(font) = LabelFont::system() else {
            return;
        };
        let mut backend = PixmapBackend::new(120, 40).unwrap().with_font(font);
        let style = TextStyle {
            font_size: 14.0,
            color: Color::WHITE,
        };
        backend
            .draw_text("50 \u{d7} 50", Point::new(4.0, 4.0), &style)
            .unwrap();

        let (w, h) = backend.text_size("50 \u{d7} 50", 14.0);
        let mut inside = 0;
        for y in 0..40 {
            for x in 0..120 {
                let a = alpha_at(&backend, x, y);
                let within = x as f32 >= 2.0
                    && (x as f32) < 4.0 + w + 2.0
                    && y as f32 >= 2.0
                    && (y as f32) < 4.0 + h + 2.0;
                if within {
                    inside += usize::from(a > 0);
                } else {
                    assert_eq!(a, 0, "ink outside label at ({x}, {y})");
                }
            }
        }
        assert!(inside > 0);
    }

    #[test]
    fn drop_shadow_fades_outwards() {
        let mut backend = PixmapBackend::new(60, 60).unwrap();
        backend
            .draw_drop_shadow(
                Rectangle::new(20.0, 20.0, 20.0, 20.0),
                4.0,
                6.0,
                Color::BLACK.scale_alpha(0.4),
            )
            .unwrap();

        let center = alpha_at(&backend, 30, 30);
        let fringe = alpha_at(&backend, 30, 16);
        assert!(center > fringe, "center {center} fringe {fringe}");
        assert!(fringe > 0);
        assert_eq!(alpha_at(&backend, 30, 5), 0);
        assert!(center <= 102);
    }

    #[test]
    fn non_finite_geometry_is_an_error() {
        let mut backend = PixmapBackend::new(10, 10).unwrap();
        let err = backend
            .draw_line(
                Point::new(f32::NAN, 0.0),
                Point::new(5.0, 5.0),
                &DrawStyle::stroke(RED, 1.0),
            )
            .unwrap_err();
        assert_eq!(err, RasterError::NonFiniteGeometry("line"));
    }

    #[test]
    fn rendering_the_same_list_twice_is_pixel_identical() {
        let mut list = RenderList::new();
        list.submit(RenderItem::DropShadow {
            rect: Rectangle::new(15.0, 15.0, 30.0, 14.0),
            corner_radius: 4.0,
            blur_radius: 6.0,
            color: Color::BLACK.scale_alpha(0.4),
            z_order: 1,
        });
        list.submit(RenderItem::RoundedRectangle {
            rect: Rectangle::new(10.0, 10.0, 30.0, 14.0),
            radius: 4.0,
            style: DrawStyle::fill(Color::rgba(0.1, 0.1, 0.1, 0.9)),
            z_order: 2,
        });
        list.submit(RenderItem::Text {
            text: "12.70 mm".to_string(),
            position: Point::new(12.0, 12.0),
            style: TextStyle {
                font_size: 10.0,
                color: Color::WHITE,
            },
            z_order: 3,
        });

        let mut backend = PixmapBackend::new(64, 48).unwrap();
        list.execute(&mut backend).unwrap();
        let first = backend.data().to_vec();

        backend.clear();
        list.execute(&mut backend).unwrap();
        assert_eq!(backend.data(), first.as_slice());
    }
}
