//! Mapping from time and event count onto a fixed pixel viewport.
//!
//! A [`Scale`] knows the full span and event count of the data, the
//! viewport size, a zoom factor and the visible start time. From those it
//! derives the visible span, the row height, how many rows fit and the
//! seconds-to-pixel ratio. It never looks at events; callers pair it with
//! a selection that shows `num_events()` rows.

use tmln_types::{Ts, TsSpan};

/// Default lower bound for zoom factors chosen by callers.
pub const MIN_ZOOM: f64 = 0.1;

/// Zoom factor showing the full span.
pub const MAX_ZOOM: f64 = 1.0;

/// Row height bounds used by the adaptive row-height search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Height tried first, in pixels.
    pub preferred: u32,
    /// Floor the search never goes below.
    pub min: u32,
    /// Ceiling for zoomed-in rows.
    pub max: u32,
}

impl RowLayout {
    /// Create a layout, repairing inconsistent bounds.
    ///
    /// `min` is at least 1, `preferred` at least `min`, `max` at least
    /// `preferred`.
    pub fn new(preferred: u32, min: u32, max: u32) -> Self {
        let min = min.max(1);
        let preferred = preferred.max(min);
        let max = max.max(preferred);
        Self {
            preferred,
            min,
            max,
        }
    }
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::new(15, 5, 30)
    }
}

/// Pixel geometry of the visible part of a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    span: TsSpan,
    num_events: usize,
    event_height: u32,
    sec_to_pixel: f64,
    zoom: f64,
    actual_span: TsSpan,
    actual_num_events: usize,
    actual_width: u32,
    actual_height: u32,
    layout: RowLayout,
}

impl Scale {
    /// Create a fully zoomed-out scale with the default row layout.
    pub fn new(actual_span: TsSpan, actual_num_events: usize, width: u32, height: u32) -> Self {
        Self::with_layout(
            actual_span,
            actual_num_events,
            width,
            height,
            RowLayout::default(),
        )
    }

    /// Create a fully zoomed-out scale.
    pub fn with_layout(
        actual_span: TsSpan,
        actual_num_events: usize,
        width: u32,
        height: u32,
        layout: RowLayout,
    ) -> Self {
        let mut scale = Self {
            span: actual_span,
            num_events: 0,
            event_height: layout.preferred,
            sec_to_pixel: 0.0,
            zoom: MAX_ZOOM,
            actual_span,
            actual_num_events,
            actual_width: width,
            actual_height: height,
            layout,
        };
        scale.calc_events();
        scale.update_ratio();
        scale
    }

    /// Change the viewport size. Zoom and start time are kept.
    pub fn set_actual_size(&mut self, width: u32, height: u32) {
        self.actual_width = width;
        self.actual_height = height;
        self.calc_events();
        self.update_ratio();
    }

    /// Change the zoom factor; `1.0` shows the whole span.
    ///
    /// The visible span keeps its start and covers `zoom` times the full
    /// duration. Factors outside `(0, 1]` are clamped, and non-finite or
    /// non-positive factors reset to `1.0`.
    pub fn set_scale(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom.min(MAX_ZOOM)
        } else {
            MAX_ZOOM
        };
        self.calc_span();
        self.update_ratio();
        self.calc_events();
    }

    /// Move the visible window to start at `start`, keeping its duration.
    pub fn set_start(&mut self, start: Ts) {
        self.span.set_start(start);
        self.calc_span();
        self.update_ratio();
        self.calc_events();
    }

    /// Pixel offset of `ts` from the visible start, truncated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn time_to_x(&self, ts: Ts) -> i32 {
        (self.sec_to_pixel * ts.saturating_sub(self.span.start()).to_seconds()) as i32
    }

    /// Pixel width of `span`, truncated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn span_width(&self, span: &TsSpan) -> u32 {
        (self.sec_to_pixel * span.duration_seconds()) as u32
    }

    /// Visible span.
    pub const fn span(&self) -> TsSpan {
        self.span
    }

    /// Number of rows that fit the viewport.
    pub const fn num_events(&self) -> usize {
        self.num_events
    }

    /// Row height in pixels.
    pub const fn event_height(&self) -> u32 {
        self.event_height
    }

    /// Pixels per second of the visible span.
    pub const fn sec_to_pixel(&self) -> f64 {
        self.sec_to_pixel
    }

    /// Current zoom factor.
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Full span of the data.
    pub const fn actual_span(&self) -> TsSpan {
        self.actual_span
    }

    /// Full event count of the data.
    pub const fn actual_num_events(&self) -> usize {
        self.actual_num_events
    }

    /// Viewport width in pixels.
    pub const fn actual_width(&self) -> u32 {
        self.actual_width
    }

    /// Viewport height in pixels.
    pub const fn actual_height(&self) -> u32 {
        self.actual_height
    }

    /// Row height bounds.
    pub const fn layout(&self) -> RowLayout {
        self.layout
    }

    const fn is_degenerate(&self) -> bool {
        self.actual_width == 0 || self.actual_num_events == 0
    }

    fn calc_span(&mut self) {
        let visible = if self.zoom >= MAX_ZOOM {
            self.actual_span.duration()
        } else {
            Ts::from_secs_f64(self.actual_span.duration_seconds() * self.zoom)
        };
        let start = self.span.start();
        self.span = TsSpan::new(start, start.saturating_add(visible));
    }

    fn update_ratio(&mut self) {
        let seconds = self.span.duration_seconds();
        self.sec_to_pixel = if self.is_degenerate() || seconds <= 0.0 {
            0.0
        } else {
            f64::from(self.actual_width) / seconds
        };
    }

    fn rows_that_fit(&self) -> usize {
        self.actual_height
            .checked_div(self.event_height)
            .and_then(|rows| usize::try_from(rows).ok())
            .unwrap_or(0)
    }

    fn calc_events(&mut self) {
        self.event_height = self.layout.preferred;
        if self.is_degenerate() {
            self.num_events = 0;
            return;
        }

        self.num_events = self.rows_that_fit();
        while self.event_height > self.layout.min && self.num_events < self.actual_num_events {
            self.event_height = self.event_height.saturating_sub(1);
            self.num_events = self.rows_that_fit();
        }

        if self.zoom < MAX_ZOOM {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let zoomed = (f64::from(self.event_height) / self.zoom) as u32;
            self.event_height = zoomed.min(self.layout.max);
            self.num_events = self.rows_that_fit();
        }
    }
}
