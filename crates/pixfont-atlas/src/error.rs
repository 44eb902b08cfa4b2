// this_file: crates/pixfont-atlas/src/error.rs

//! Error types for atlas building and font assembly.
//!
//! Everything here is a configuration error: fatal to the load call,
//! surfaced to the caller, who decides between a fallback font and
//! propagation. The layout/wrapping side never produces errors.

use std::path::PathBuf;

use pixfont_core::Size;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtlasError>;

/// What can go wrong while building an atlas or assembling a font.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("missing font file path")]
    MissingPath,

    #[error("failed to read font '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file '{0}' is empty")]
    EmptyFile(PathBuf),

    #[error("failed to parse outline font: {0}")]
    InvalidFont(String),

    #[error("empty glyph range {first}..={last}")]
    EmptyGlyphRange { first: i32, last: i32 },

    #[error("glyph atlas {}x{} overflowed while packing", atlas.width, atlas.height)]
    PackingOverflow { atlas: Size },

    #[error("failed to decode glyph sheet '{path}': {source}")]
    SheetDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("glyph sheet error: {0}")]
    Sheet(String),
}
