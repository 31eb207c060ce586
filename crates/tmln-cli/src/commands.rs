//! Command implementations. Each returns the text printed on stdout.

use std::path::Path;

use anyhow::{Context, Result};
use tmln_core::{EventSource, LoadJson, LoadSummary, PointerButton, Timeline, TmlnConfig, VectorData};
use tmln_raster::export_png;
use tmln_types::Styles;
use tracing::{info, warn};

/// Pointer position and view state for `tmln inspect`.
#[derive(Debug, Clone, Copy)]
pub struct InspectRequest {
    /// Pixel column.
    pub x: i32,
    /// Pixel row.
    pub y: i32,
    /// Zoom factor.
    pub zoom: f64,
    /// Horizontal scroll in seconds.
    pub scroll_x: f64,
    /// Vertical scroll in rows.
    pub scroll_y: usize,
}

/// Load a document. The path becomes the store's source name.
pub fn load(input: &Path) -> Result<(VectorData, Styles)> {
    let mut data = VectorData::new(input.display().to_string());
    let mut styles = Styles::new();
    let summary: LoadSummary = LoadJson::new(&mut data, &mut styles)
        .load_file(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    if summary.events_skipped > 0 || summary.steps_skipped > 0 || summary.styles_skipped > 0 {
        warn!(
            events_skipped = summary.events_skipped,
            steps_skipped = summary.steps_skipped,
            styles_skipped = summary.styles_skipped,
            "some records were skipped"
        );
    }
    Ok((data, styles))
}

/// `tmln render`: export the timeline to `output`.
pub fn render(input: &Path, output: &Path, config: &TmlnConfig) -> Result<String> {
    let (data, mut styles) = load(input)?;
    let summary = export_png(&data, &mut styles, &config.render, &config.view, output)
        .with_context(|| format!("failed to export {}", output.display()))?;
    Ok(format!(
        "wrote {} ({}x{}, {} of {} events)",
        output.display(),
        summary.width,
        summary.height,
        summary.rows,
        summary.events
    ))
}

/// `tmln inspect`: report the step under a pixel of the interactive view.
pub fn inspect(input: &Path, request: &InspectRequest, config: &TmlnConfig) -> Result<String> {
    let (data, mut styles) = load(input)?;
    let mut timeline = Timeline::new(
        &data,
        &mut styles,
        config.render.width,
        config.render.height,
        &config.view,
    );
    let zoom = timeline.zoom(request.zoom - timeline.zoom_factor());
    timeline.scroll_x(request.scroll_x);
    timeline.scroll_y(request.scroll_y);
    info!(zoom, x = request.x, y = request.y, "inspecting");

    if timeline.click(PointerButton::Primary, request.x, request.y) {
        Ok(timeline.info().to_owned())
    } else {
        Ok(format!("nothing at ({}, {})", request.x, request.y))
    }
}

/// `tmln summary`: describe the loaded data.
pub fn summary(input: &Path) -> Result<String> {
    let (data, styles) = load(input)?;
    let span = data.span();
    Ok(format!(
        "source: {}\nevents: {}\nspan: {} .. {} ({:.6}s)\nstyles: {}",
        data.source(),
        data.len(),
        span.start(),
        span.end(),
        span.duration_seconds(),
        styles.len()
    ))
}
