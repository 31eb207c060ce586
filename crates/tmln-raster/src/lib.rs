//! Raster drawing backend for tmln.
//!
//! Implements the renderer's [`tmln_core::Draw`] primitives over an
//! [`image::RgbaImage`] using `imageproc`, and exports whole timelines as
//! PNG files.
//!
//! # Modules
//!
//! - [`canvas`] -- [`ImageCanvas`], the RGBA drawing surface
//! - [`export`] -- [`export_png`] batch rendering
//! - [`error`] -- [`CanvasError`]

pub mod canvas;
pub mod error;
pub mod export;

pub use canvas::{ImageCanvas, TEXT_SCALE};
pub use error::CanvasError;
pub use export::{ExportSummary, export_png};
