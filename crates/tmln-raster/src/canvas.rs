//! [`Draw`] backend over an in-memory RGBA image.
//!
//! Shapes are filled with the style's foreground color and labels are
//! drawn in its background color. Coordinates outside the image are
//! clipped.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;
use tmln_core::Draw;
use tmln_types::{Color, Style};
use tracing::warn;

use crate::error::CanvasError;

/// Label size in pixels.
pub const TEXT_SCALE: f32 = 12.0;

/// An RGBA image the renderer can draw on.
pub struct ImageCanvas {
    image: RgbaImage,
    font: Option<FontVec>,
    scale: PxScale,
    warned_no_font: bool,
}

impl ImageCanvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::EmptyCanvas { width, height });
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, to_rgba(background)),
            font: None,
            scale: PxScale::from(TEXT_SCALE),
            warned_no_font: false,
        })
    }

    /// Use `font` for labels.
    #[must_use]
    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Read a TTF/OTF font from disk.
    pub fn load_font(path: &Path) -> Result<FontVec, CanvasError> {
        let bytes = std::fs::read(path).map_err(|source| CanvasError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        FontVec::try_from_vec(bytes).map_err(|source| CanvasError::FontParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether labels can be drawn.
    pub const fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// The image drawn so far.
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the canvas, returning its image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the image as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), CanvasError> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| CanvasError::Save {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Clip `[start, start + len)` to `[0, limit)`.
    fn clip(start: i32, len: u32, limit: u32) -> Option<(i32, u32)> {
        let lo = i64::from(start).max(0);
        let hi = i64::from(start)
            .saturating_add(i64::from(len))
            .min(i64::from(limit));
        if hi <= lo {
            return None;
        }
        let origin = i32::try_from(lo).ok()?;
        let size = u32::try_from(hi.saturating_sub(lo)).ok()?;
        Some((origin, size))
    }
}

impl Draw for ImageCanvas {
    #[allow(clippy::cast_possible_truncation)]
    fn text_height(&self) -> i32 {
        let height = self.font.as_ref().map_or(self.scale.y, |font| {
            font.as_scaled(self.scale).height()
        });
        height.ceil() as i32
    }

    #[allow(clippy::cast_precision_loss)]
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, style: &Style) {
        draw_line_segment_mut(
            &mut self.image,
            (x1 as f32, y1 as f32),
            (x2 as f32, y2 as f32),
            to_rgba(style.fg()),
        );
    }

    fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, style: &Style) {
        let Some((x, width)) = Self::clip(x, width, self.image.width()) else {
            return;
        };
        let Some((y, height)) = Self::clip(y, height, self.image.height()) else {
            return;
        };
        draw_filled_rect_mut(
            &mut self.image,
            Rect::at(x, y).of_size(width, height),
            to_rgba(style.fg()),
        );
    }

    fn text(&mut self, x: i32, y: i32, text: &str, style: &Style) {
        let Some(font) = self.font.as_ref() else {
            if !self.warned_no_font {
                warn!("no font configured, labels are not drawn");
                self.warned_no_font = true;
            }
            return;
        };
        draw_text_mut(
            &mut self.image,
            to_rgba(style.bg()),
            x,
            y,
            self.scale,
            font,
            text,
        );
    }
}

const fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}
