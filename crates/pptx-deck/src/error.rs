use thiserror::Error;

/// Errors produced while building, writing or reading back a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Slide dimensions fall outside what PresentationML allows.
    #[error("Slide size {width}x{height} EMU is outside the allowed range {min}..={max} EMU per edge")]
    InvalidSlideSize {
        width: i64,
        height: i64,
        min: i64,
        max: i64,
    },

    /// Writing or reading the ZIP container failed.
    #[error("ZIP container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A part could not be generated or parsed.
    #[error("XML error in '{part}': {detail}")]
    Xml { part: String, detail: String },

    /// A part the package needs is missing.
    #[error("Package is missing part '{0}'")]
    MissingPart(String),
}
