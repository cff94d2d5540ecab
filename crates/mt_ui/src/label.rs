use mt_rendering::Rectangle;

/// Where a label ended up relative to the box it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    Below,
    Above,
    Right,
    Left,
    /// No outside position fits; centred on the box and clamped to the screen.
    Inside,
}

/// Position a label of `size` next to `anchor`, keeping it on `screen`.
///
/// Outside positions are tried below, above, right, then left, `margin` away from the anchor.
pub fn place_label(
    anchor: Rectangle,
    size: (f32, f32),
    screen: Rectangle,
    margin: f32,
) -> (Rectangle, LabelPlacement) {
    let (w, h) = size;
    let center = anchor.center();
    let centered_x = center.x - w * 0.5;
    let centered_y = center.y - h * 0.5;

    let candidates = [
        (
            Rectangle::new(centered_x, anchor.bottom() + margin, w, h),
            LabelPlacement::Below,
        ),
        (
            Rectangle::new(centered_x, anchor.y - margin - h, w, h),
            LabelPlacement::Above,
        ),
        (
            Rectangle::new(anchor.right() + margin, centered_y, w, h),
            LabelPlacement::Right,
        ),
        (
            Rectangle::new(anchor.x - margin - w, centered_y, w, h),
            LabelPlacement::Left,
        ),
    ];

    if let Some(found) = candidates
        .into_iter()
        .find(|(rect, _)| screen.contains_rect(rect))
    {
        return found;
    }

    let x = centered_x.min(screen.right() - w).max(screen.x);
    let y = centered_y.min(screen.bottom() - h).max(screen.y);
    (Rectangle::new(x, y, w, h), LabelPlacement::Inside)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rectangle = Rectangle::new(0.0, 0.0, 1920.0, 1080.0);

    #[test]
    fn prefers_below() {
        let anchor = Rectangle::new(100.0, 100.0, 50.0, 50.0);
        let (rect, placement) = place_label(anchor, (40.0, 20.0), SCREEN, 8.0);
        assert_eq!(placement, LabelPlacement::Below);
        assert_eq!(rect, Rectangle::new(105.0, 158.0, 40.0, 20.0));
        assert!(!rect.intersects(&anchor));
    }

    #[test]
    fn falls_back_to_above_at_bottom_edge() {
        let anchor = Rectangle::new(100.0, 1040.0, 50.0, 30.0);
        let (rect, placement) = place_label(anchor, (40.0, 20.0), SCREEN, 8.0);
        assert_eq!(placement, LabelPlacement::Above);
        assert_eq!(rect.bottom(), 1032.0);
    }

    #[test]
    fn tall_box_uses_side_positions() {
        let anchor = Rectangle::new(0.0, 0.0, 200.0, 1080.0);
        let (rect, placement) = place_label(anchor, (40.0, 20.0), SCREEN, 8.0);
        assert_eq!(placement, LabelPlacement::Right);
        assert_eq!(rect.x, 208.0);

        let anchor = Rectangle::new(1800.0, 0.0, 120.0, 1080.0);
        let (_, placement) = place_label(anchor, (40.0, 20.0), SCREEN, 8.0);
        assert_eq!(placement, LabelPlacement::Left);
    }

    #[test]
    fn full_screen_box_clamps_inside() {
        let (rect, placement) = place_label(SCREEN, (40.0, 20.0), SCREEN, 8.0);
        assert_eq!(placement, LabelPlacement::Inside);
        assert!(SCREEN.contains_rect(&rect));
        assert_eq!(rect.center(), SCREEN.center());
    }

    #[test]
    fn oversized_label_pins_to_screen_origin() {
        let screen = Rectangle::new(0.0, 0.0, 30.0, 30.0);
        let (rect, placement) = place_label(screen, (80.0, 40.0), screen, 8.0);
        assert_eq!(placement, LabelPlacement::Inside);
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
    }
}
