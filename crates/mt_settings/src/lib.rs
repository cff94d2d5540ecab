pub mod constants;
pub mod defaults;
pub mod settings;

pub use settings::{DetectionSettings, Settings, StyleConstants, Units};
