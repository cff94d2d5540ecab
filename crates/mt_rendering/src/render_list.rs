use crate::types::{Color, DrawStyle, Point, Rectangle, TextStyle};

/// Platform-specific backend for executing render items.
pub trait RenderBackend {
    type Error;

    fn draw_rectangle(&mut self, rect: Rectangle, style: &DrawStyle) -> Result<(), Self::Error>;
    fn draw_rounded_rectangle(
        &mut self,
        rect: Rectangle,
        radius: f32,
        style: &DrawStyle,
    ) -> Result<(), Self::Error>;
    fn draw_line(&mut self, start: Point, end: Point, style: &DrawStyle)
    -> Result<(), Self::Error>;

    /// Draw a single line of text with its top-left corner at `position`.
    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        style: &TextStyle,
    ) -> Result<(), Self::Error>;

    /// Draw a soft shadow under a rounded rectangle.
    ///
    /// `rect` is the shadow footprint (already offset); `blur_radius` is how far the shadow fades
    /// out beyond it.
    fn draw_drop_shadow(
        &mut self,
        rect: Rectangle,
        corner_radius: f32,
        blur_radius: f32,
        color: Color,
    ) -> Result<(), Self::Error>;
}

/// Render primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    Rectangle {
        rect: Rectangle,
        style: DrawStyle,
        z_order: i32,
    },

    RoundedRectangle {
        rect: Rectangle,
        radius: f32,
        style: DrawStyle,
        z_order: i32,
    },

    Line {
        start: Point,
        end: Point,
        style: DrawStyle,
        z_order: i32,
    },

    Text {
        text: String,
        position: Point,
        style: TextStyle,
        z_order: i32,
    },

    DropShadow {
        rect: Rectangle,
        corner_radius: f32,
        blur_radius: f32,
        color: Color,
        z_order: i32,
    },
}

impl RenderItem {
    /// Get z-order for sorting.
    pub fn z_order(&self) -> i32 {
        match self {
            RenderItem::Rectangle { z_order, .. } => *z_order,
            RenderItem::RoundedRectangle { z_order, .. } => *z_order,
            RenderItem::Line { z_order, .. } => *z_order,
            RenderItem::Text { z_order, .. } => *z_order,
            RenderItem::DropShadow { z_order, .. } => *z_order,
        }
    }
}

/// Z-order layer constants.
pub mod z_order {
    /// Measurements frozen by a lock action.
    pub const LOCKED_MEASUREMENTS: i32 = 100;
    /// The live (tracking) measurement outline.
    pub const LIVE_MEASUREMENT: i32 = 200;
    /// Measuring lines through the sample point.
    pub const CROSS_LINES: i32 = 250;
    /// Tick marks at the measured extent.
    pub const FEET: i32 = 300;
    pub const LABEL_SHADOW: i32 = 400;
    pub const LABEL_BOX: i32 = 500;
    pub const LABEL_TEXT: i32 = 600;
}

/// Render list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    items: Vec<RenderItem>,
}

impl RenderList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn submit(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// Stable sort, so items on the same layer keep submission order.
    pub fn sort_by_z_order(&mut self) {
        self.items.sort_by_key(|item| item.z_order());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderItem> {
        self.items.iter()
    }

    /// Execute all items against a backend.
    pub fn execute<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), B::Error> {
        self.sort_by_z_order();

        for item in &self.items {
            Self::render_item(backend, item)?;
        }

        Ok(())
    }

    fn render_item<B: RenderBackend>(backend: &mut B, item: &RenderItem) -> Result<(), B::Error> {
        match item {
            RenderItem::Rectangle { rect, style, .. } => backend.draw_rectangle(*rect, style)?,
            RenderItem::RoundedRectangle {
                rect,
                radius,
                style,
                ..
            } => backend.draw_rounded_rectangle(*rect, *radius, style)?,
            RenderItem::Line {
                start, end, style, ..
            } => backend.draw_line(*start, *end, style)?,
            RenderItem::Text {
                text,
                position,
                style,
                ..
            } => backend.draw_text(text, *position, style)?,
            RenderItem::DropShadow {
                rect,
                corner_radius,
                blur_radius,
                color,
                ..
            } => backend.draw_drop_shadow(*rect, *corner_radius, *blur_radius, *color)?,
        }

        Ok(())
    }
}
