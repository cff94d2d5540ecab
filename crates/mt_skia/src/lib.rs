use thiserror::Error;

pub mod backend;
pub mod font;

pub use backend::PixmapBackend;
pub use font::LabelFont;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("cannot allocate a {width}x{height} pixmap")]
    InvalidSize { width: u32, height: u32 },

    #[error("non-finite coordinates in {0}")]
    NonFiniteGeometry(&'static str),

    #[error("color components out of range")]
    InvalidColor,

    #[error("invalid font data: {0}")]
    InvalidFont(String),

    #[error("cannot read font {path}: {reason}")]
    FontUnreadable { path: String, reason: String },
}
