//! Error types for the `tmln-raster` crate.

use std::path::PathBuf;

/// Errors that can occur while preparing or writing an image.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The requested canvas has no pixels.
    #[error("canvas size {width}x{height} has no pixels")]
    EmptyCanvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The font file could not be read.
    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        /// Path of the font file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The font file is not a usable TTF/OTF font.
    #[error("invalid font {}: {source}", path.display())]
    FontParse {
        /// Path of the font file.
        path: PathBuf,
        /// The underlying font error.
        source: ab_glyph::InvalidFont,
    },

    /// Encoding or writing the image failed.
    #[error("failed to write image {}: {source}", path.display())]
    Save {
        /// Output path.
        path: PathBuf,
        /// The underlying image error.
        source: image::ImageError,
    },
}
