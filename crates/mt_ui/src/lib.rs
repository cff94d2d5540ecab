pub mod label;
pub mod measurement_overlay;
pub mod theme;

pub use label::{LabelPlacement, place_label};
pub use measurement_overlay::build_measurement_overlay_render_list;
pub use theme::OverlayStyle;
