use mt_app::{MeasureAxes, Measurement, MeasurementSnapshot};
use mt_rendering::{
    Color, DrawStyle, Point, Rectangle, RenderItem, RenderList, TextMeasurer, TextStyle, z_order,
};

use crate::label::place_label;
use crate::theme::{DEGENERATE_FEET_ALPHA, LOCKED_OUTLINE_ALPHA, OverlayStyle};

/// Pixel-centre edges of a measurement: the outermost measured pixels, not the half-open bounds.
#[derive(Debug, Clone, Copy)]
struct Edges {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Edges {
    fn of(m: &Measurement) -> Self {
        let b = m.bounds;
        Self {
            left: b.left as f32 + 0.5,
            top: b.top as f32 + 0.5,
            right: b.right as f32 - 0.5,
            bottom: b.bottom as f32 - 0.5,
        }
    }

    fn mid_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    fn mid_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }
}

fn line(start: Point, end: Point, color: Color, width: f32, z_order: i32) -> RenderItem {
    RenderItem::Line {
        start,
        end,
        style: DrawStyle::stroke(color, width),
        z_order,
    }
}

/// Horizontal extent line of a one-axis measurement through its sample row.
fn horizontal_span(e: &Edges, y: f32) -> (Point, Point) {
    (Point::new(e.left, y), Point::new(e.right, y))
}

fn vertical_span(e: &Edges, x: f32) -> (Point, Point) {
    (Point::new(x, e.top), Point::new(x, e.bottom))
}

/// Measured extent: a rectangle outline for cross measurements, a line otherwise.
fn push_outline(list: &mut RenderList, m: &Measurement, is_live: bool, style: &OverlayStyle) {
    let e = Edges::of(m);
    let (color, z) = if is_live {
        (style.line_color, z_order::LIVE_MEASUREMENT)
    } else {
        (
            style.line_color.scale_alpha(LOCKED_OUTLINE_ALPHA),
            z_order::LOCKED_MEASUREMENTS,
        )
    };

    match m.axes {
        MeasureAxes::Cross => list.submit(RenderItem::Rectangle {
            rect: Rectangle::from_bounds(e.left, e.top, e.right, e.bottom),
            style: DrawStyle::stroke(color, style.line_width),
            z_order: z,
        }),
        MeasureAxes::Horizontal => {
            let (a, b) = horizontal_span(&e, e.mid_y());
            list.submit(line(a, b, color, style.line_width, z));
        }
        MeasureAxes::Vertical => {
            let (a, b) = vertical_span(&e, e.mid_x());
            list.submit(line(a, b, color, style.line_width, z));
        }
    }
}

/// Perpendicular ticks at both ends and the midpoint of every measured edge.
fn push_feet(list: &mut RenderList, m: &Measurement, style: &OverlayStyle) {
    let e = Edges::of(m);
    let h = style.feet_half_length;
    let color = if m.is_degenerate() {
        style.line_color.scale_alpha(DEGENERATE_FEET_ALPHA)
    } else {
        style.line_color
    };

    let tick = |start: Point, end: Point| {
        line(start, end, color, style.line_width, z_order::FEET)
    };

    let horizontal_edges = match m.axes {
        MeasureAxes::Cross => vec![e.top, e.bottom],
        MeasureAxes::Horizontal => vec![e.mid_y()],
        MeasureAxes::Vertical => Vec::new(),
    };
    for y in horizontal_edges {
        for x in [e.left, e.mid_x(), e.right] {
            list.submit(tick(Point::new(x, y - h), Point::new(x, y + h)));
        }
    }

    let vertical_edges = match m.axes {
        MeasureAxes::Cross => vec![e.left, e.right],
        MeasureAxes::Vertical => vec![e.mid_x()],
        MeasureAxes::Horizontal => Vec::new(),
    };
    for x in vertical_edges {
        for y in [e.top, e.mid_y(), e.bottom] {
            list.submit(tick(Point::new(x - h, y), Point::new(x + h, y)));
        }
    }
}

/// Measuring lines through the sample point of a cross measurement.
fn push_cross_lines(list: &mut RenderList, m: &Measurement, style: &OverlayStyle) {
    if m.axes != MeasureAxes::Cross {
        return;
    }

    let e = Edges::of(m);
    let x = m.sample.x as f32 + 0.5;
    let y = m.sample.y as f32 + 0.5;
    let color = style.line_color;

    let (a, b) = horizontal_span(&e, y);
    list.submit(line(a, b, color, style.line_width, z_order::CROSS_LINES));
    let (a, b) = vertical_span(&e, x);
    list.submit(line(a, b, color, style.line_width, z_order::CROSS_LINES));
}

/// Shadow, rounded box and dimension text.
fn push_label(
    list: &mut RenderList,
    m: &Measurement,
    screen: Rectangle,
    style: &OverlayStyle,
    metrics: &dyn TextMeasurer,
) {
    let text = style
        .units
        .format_label(m.width(), m.height(), m.axes, style.dpi);
    let (text_w, text_h) = metrics.text_size(&text, style.font_size);
    let size = (
        text_w + style.label_padding * 2.0,
        text_h + style.label_padding * 2.0,
    );

    let b = m.bounds;
    let anchor = Rectangle::from_bounds(b.left as f32, b.top as f32, b.right as f32, b.bottom as f32);
    let (rect, _) = place_label(anchor, size, screen, style.label_margin);

    list.submit(RenderItem::DropShadow {
        rect: rect.translate(style.shadow_offset, style.shadow_offset),
        corner_radius: style.corner_radius,
        blur_radius: style.shadow_radius,
        color: style.shadow_color,
        z_order: z_order::LABEL_SHADOW,
    });
    list.submit(RenderItem::RoundedRectangle {
        rect,
        radius: style.corner_radius,
        style: DrawStyle::fill(style.label_background),
        z_order: z_order::LABEL_BOX,
    });
    list.submit(RenderItem::Text {
        text,
        position: Point::new(rect.x + style.label_padding, rect.y + style.label_padding),
        style: TextStyle {
            font_size: style.font_size,
            color: style.text_color,
        },
        z_order: z_order::LABEL_TEXT,
    });
}

/// Build the overlay for one frame.
///
/// Pure function of its inputs: the same snapshot always yields the same list. Label boxes are
/// sized with `metrics`, normally the backend that will draw the text. Returns `None` when there
/// is nothing to draw.
pub fn build_measurement_overlay_render_list(
    snapshot: &MeasurementSnapshot,
    screen_size: (i32, i32),
    style: &OverlayStyle,
    metrics: &dyn TextMeasurer,
) -> Option<RenderList> {
    if snapshot.is_empty() {
        return None;
    }

    let screen = Rectangle::new(0.0, 0.0, screen_size.0 as f32, screen_size.1 as f32);
    let mut render_list = RenderList::with_capacity(snapshot.measurements().count() * 20);

    for (m, is_live) in snapshot.measurements() {
        push_outline(&mut render_list, m, is_live, style);
        if is_live && style.show_cross_lines {
            push_cross_lines(&mut render_list, m, style);
        }
        push_feet(&mut render_list, m, style);
        push_label(&mut render_list, m, screen, style, metrics);
    }

    render_list.sort_by_z_order();
    Some(render_list)
}

#[cfg(test)]
mod tests {
    use mt_app::{BoundingBox, DEGENERATE_MIN_SIZE, Phase, PointI32};
    use mt_rendering::MonospaceMetrics;

    use super::*;

    fn build(
        snapshot: &MeasurementSnapshot,
        screen_size: (i32, i32),
        style: &OverlayStyle,
    ) -> Option<RenderList> {
        build_measurement_overlay_render_list(snapshot, screen_size, style, &MonospaceMetrics)
    }

    fn measurement(bounds: BoundingBox, axes: MeasureAxes) -> Measurement {
        Measurement::new(bounds, bounds.center(), axes, DEGENERATE_MIN_SIZE)
    }

    fn snapshot(live: Option<Measurement>, locked: Vec<Measurement>) -> MeasurementSnapshot {
        MeasurementSnapshot {
            phase: if locked.is_empty() {
                Phase::Tracking
            } else {
                Phase::Locked
            },
            live,
            locked,
        }
    }

    fn count(list: &RenderList, pred: impl Fn(&RenderItem) -> bool) -> usize {
        list.iter().filter(|item| pred(item)).count()
    }

    fn feet(list: &RenderList) -> Vec<&RenderItem> {
        list.iter()
            .filter(|item| item.z_order() == z_order::FEET)
            .collect()
    }

    #[test]
    fn empty_snapshot_draws_nothing() {
        let list = build(
            &MeasurementSnapshot::default(),
            (1920, 1080),
            &OverlayStyle::default(),
        );
        assert!(list.is_none());
    }

    #[test]
    fn live_cross_measurement_items() {
        let m = measurement(BoundingBox::new(75, 75, 125, 125), MeasureAxes::Cross);
        let list = build(
            &snapshot(Some(m), vec![]),
            (1920, 1080),
            &OverlayStyle::default(),
        )
        .unwrap();

        // outline + 2 cross lines + 12 feet + shadow + box + text
        assert_eq!(list.len(), 18);
        assert_eq!(feet(&list).len(), 12);
        assert_eq!(
            count(&list, |i| matches!(i, RenderItem::DropShadow { .. })),
            1
        );

        let text = list
            .iter()
            .find_map(|item| match item {
                RenderItem::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .unwrap();
        assert_eq!(text, "50 × 50");
    }

    #[test]
    fn items_are_ordered_by_layer() {
        let live = measurement(BoundingBox::new(10, 10, 60, 40), MeasureAxes::Cross);
        let locked = measurement(BoundingBox::new(200, 200, 260, 230), MeasureAxes::Cross);
        let list = build(
            &snapshot(Some(live), vec![locked]),
            (800, 600),
            &OverlayStyle::default(),
        )
        .unwrap();

        let orders: Vec<i32> = list.iter().map(RenderItem::z_order).collect();
        assert!(orders.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(orders[0], z_order::LOCKED_MEASUREMENTS);
        assert_eq!(
            count(&list, |i| matches!(i, RenderItem::Text { .. })),
            2
        );
    }

    #[test]
    fn live_box_equal_to_a_locked_one_is_drawn_once() {
        let m = measurement(BoundingBox::new(75, 75, 125, 125), MeasureAxes::Cross);
        let list = build(
            &snapshot(Some(m), vec![m]),
            (800, 600),
            &OverlayStyle::default(),
        )
        .unwrap();

        assert_eq!(
            count(&list, |i| matches!(i, RenderItem::DropShadow { .. })),
            1
        );
        assert_eq!(
            count(&list, |i| matches!(i, RenderItem::Text { .. })),
            1
        );
        // Drawn as the locked measurement, so no live cross lines.
        assert_eq!(count(&list, |i| i.z_order() == z_order::CROSS_LINES), 0);
    }

    #[test]
    fn label_box_follows_measured_text_size() {
        struct Wide;
        impl TextMeasurer for Wide {
            fn text_size(&self, _text: &str, font_size: f32) -> (f32, f32) {
                (100.0, font_size)
            }
        }

        let m = measurement(BoundingBox::new(75, 75, 125, 125), MeasureAxes::Cross);
        let style = OverlayStyle::default();
        let list = build_measurement_overlay_render_list(
            &snapshot(Some(m), vec![]),
            (800, 600),
            &style,
            &Wide,
        )
        .unwrap();

        let label = list
            .iter()
            .find_map(|item| match item {
                RenderItem::RoundedRectangle { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(label.width, 100.0 + style.label_padding * 2.0);
        assert_eq!(label.height, style.font_size + style.label_padding * 2.0);
    }

    #[test]
    fn cross_lines_only_for_live_measurement_when_enabled() {
        let m = measurement(BoundingBox::new(10, 10, 60, 40), MeasureAxes::Cross);
        let cross = |list: &RenderList| count(list, |i| i.z_order() == z_order::CROSS_LINES);

        let style = OverlayStyle::default();
        let list =
            build(&snapshot(None, vec![m]), (800, 600), &style)
                .unwrap();
        assert_eq!(cross(&list), 0);

        let style = OverlayStyle {
            show_cross_lines: false,
            ..OverlayStyle::default()
        };
        let list =
            build(&snapshot(Some(m), vec![]), (800, 600), &style)
                .unwrap();
        assert_eq!(cross(&list), 0);
    }

    #[test]
    fn feet_straddle_the_edges_with_configured_half_length() {
        let m = measurement(BoundingBox::new(10, 20, 30, 60), MeasureAxes::Cross);
        let list = build(
            &snapshot(Some(m), vec![]),
            (800, 600),
            &OverlayStyle::default(),
        )
        .unwrap();

        for item in feet(&list) {
            let RenderItem::Line { start, end, .. } = item else {
                panic!("feet are lines");
            };
            let length = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
            assert!((length - 4.0).abs() < 1e-4);
        }

        // Tick across the top edge at its left end.
        assert!(feet(&list).iter().any(|item| matches!(
            item,
            RenderItem::Line { start, end, .. }
                if *start == Point::new(10.5, 18.5) && *end == Point::new(10.5, 22.5)
        )));
    }

    #[test]
    fn degenerate_measurement_has_dimmed_feet() {
        let m = measurement(BoundingBox::new(10, 10, 12, 40), MeasureAxes::Cross);
        assert!(m.is_degenerate());
        let style = OverlayStyle::default();
        let list =
            build(&snapshot(Some(m), vec![]), (800, 600), &style)
                .unwrap();

        for item in feet(&list) {
            let RenderItem::Line { style: s, .. } = item else {
                panic!("feet are lines");
            };
            assert!(s.stroke_color.a < style.line_color.a);
        }
    }

    #[test]
    fn single_axis_measurement_draws_a_line_and_one_dimension() {
        let m = Measurement::new(
            BoundingBox::new(40, 100, 160, 101),
            PointI32::new(100, 100),
            MeasureAxes::Horizontal,
            DEGENERATE_MIN_SIZE,
        );
        assert!(!m.is_degenerate());

        let list = build(
            &snapshot(Some(m), vec![]),
            (800, 600),
            &OverlayStyle::default(),
        )
        .unwrap();

        assert_eq!(
            count(&list, |i| matches!(i, RenderItem::Rectangle { .. })),
            0
        );
        assert_eq!(feet(&list).len(), 3);
        assert!(list.iter().any(|item| matches!(
            item,
            RenderItem::Text { text, .. } if text == "120"
        )));
    }

    #[test]
    fn label_avoids_the_measured_box() {
        let m = measurement(BoundingBox::new(300, 200, 400, 260), MeasureAxes::Cross);
        let list = build(
            &snapshot(Some(m), vec![]),
            (800, 600),
            &OverlayStyle::default(),
        )
        .unwrap();

        let label = list
            .iter()
            .find_map(|item| match item {
                RenderItem::RoundedRectangle { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        let measured = Rectangle::from_bounds(300.0, 200.0, 400.0, 260.0);
        assert!(!label.intersects(&measured));
    }

    #[test]
    fn same_snapshot_builds_identical_lists() {
        let live = measurement(BoundingBox::new(10, 10, 60, 40), MeasureAxes::Cross);
        let locked = measurement(BoundingBox::new(200, 200, 260, 230), MeasureAxes::Vertical);
        let snap = snapshot(Some(live), vec![locked]);
        let style = OverlayStyle::default();

        let a = build(&snap, (800, 600), &style);
        let b = build(&snap, (800, 600), &style);
        assert_eq!(a, b);
    }
}
