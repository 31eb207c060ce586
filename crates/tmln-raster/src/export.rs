//! Batch export of a whole timeline to a PNG file.

use std::path::Path;

use tmln_core::{EventSource, RenderConfig, Renderer, Scale, TimeSelection, ViewConfig};
use tmln_types::{Color, Styles};
use tracing::info;

use crate::canvas::ImageCanvas;
use crate::error::CanvasError;

/// What an export produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Rows drawn.
    pub rows: usize,
    /// Events in the store.
    pub events: usize,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Render every event of `data` that fits the configured image and write
/// it to `output`.
///
/// The image shows the full data span. Rows are chosen by start time within
/// that span, up to as many as the row layout fits.
pub fn export_png(
    data: &dyn EventSource,
    styles: &mut Styles,
    render: &RenderConfig,
    view: &ViewConfig,
    output: &Path,
) -> Result<ExportSummary, CanvasError> {
    let mut canvas = ImageCanvas::new(render.width, render.height, Color::parse(&render.background))?;
    if let Some(path) = &render.font {
        canvas = canvas.with_font(ImageCanvas::load_font(path)?);
    }

    let scale = Scale::with_layout(
        data.span(),
        data.len(),
        render.width,
        render.height,
        view.row_layout(),
    );
    let selection = TimeSelection::new(data, scale.num_events(), scale.span());
    let renderer = Renderer::new(styles);
    let rows = renderer.render(&selection, &scale, &mut canvas);
    canvas.save_png(output)?;

    info!(
        output = %output.display(),
        rows,
        events = data.len(),
        width = render.width,
        height = render.height,
        "timeline exported"
    );
    Ok(ExportSummary {
        rows,
        events: data.len(),
        width: render.width,
        height: render.height,
    })
}
