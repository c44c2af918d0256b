//! Error types for shapeperf

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PerfError>;

/// Main error type for shapeperf
#[derive(Debug, Error)]
pub enum PerfError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    Shaping(#[from] ShapingError),
}

/// The kinds of native resource the HarfBuzz bridge allocates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeResource {
    Buffer,
    Blob,
    Face,
    Font,
}

impl fmt::Display for NativeResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeResource::Buffer => "shaping buffer",
            NativeResource::Blob => "font blob",
            NativeResource::Face => "font face",
            NativeResource::Font => "compiled font",
        };
        f.write_str(name)
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font not found: {0}")]
    NotFound(String),

    #[error("Invalid font data for {name}: {reason}")]
    InvalidData { name: String, reason: String },

    #[error("Failed to read font {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Shaping errors
///
/// Every variant is recoverable; none of them leaves a native resource in an
/// inconsistent state.
#[derive(Debug, Error)]
pub enum ShapingError {
    /// The engine handed back a null handle or reported a failed allocation
    #[error("Failed to allocate {resource} ({detail})")]
    Allocation {
        resource: NativeResource,
        detail: String,
    },

    /// The engine rejected the font bytes
    #[error("Font data rejected: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No font to shape with")]
    MissingFont,

    /// Non-empty input produced no glyphs
    #[error("Nothing got shaped from {text_len} bytes of input")]
    EmptyResult { text_len: usize },

    #[error("Glyph index {index} out of range for a sequence of {len} glyphs")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Malformed tag: {0}")]
    Tag(String),
}
