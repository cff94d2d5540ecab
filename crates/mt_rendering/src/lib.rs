pub mod render_list;
pub mod text;
pub mod types;

pub use render_list::{RenderBackend, RenderItem, RenderList, z_order};
pub use text::{MonospaceMetrics, TextMeasurer};
pub use types::{Color, DrawStyle, Point, Rectangle, TextStyle};
