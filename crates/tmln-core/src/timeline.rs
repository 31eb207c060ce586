//! Interactive viewer state, independent of any GUI toolkit.
//!
//! A [`Timeline`] owns the [`Scale`], an [`OffsetSelection`] and a
//! [`Renderer`] for one viewport, and turns scrollbar, zoom and pointer
//! input into the start time and row window they describe. A front end
//! forwards its input events here, asks [`Timeline::x_scrollbar`] and
//! [`Timeline::y_scrollbar`] how to size its scrollbars, and shows
//! [`Timeline::info`] wherever it displays details of the clicked step.

use tmln_types::{Styles, Ts};
use tracing::debug;

use crate::config::ViewConfig;
use crate::data::EventSource;
use crate::render::{Draw, Renderer};
use crate::scale::{MAX_ZOOM, MIN_ZOOM, Scale};
use crate::selection::OffsetSelection;

/// Pointer button of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button: inspect the step under the pointer.
    Primary,
    /// Right button: clear the info text.
    Secondary,
    /// Any other button, ignored.
    Other,
}

/// Scrollbar geometry: position, visible page and total extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRange {
    /// Current position.
    pub value: u64,
    /// Extent visible at once.
    pub page: u64,
    /// Full extent.
    pub total: u64,
}

/// Scroll, zoom and inspection state of one timeline viewport.
pub struct Timeline<'a> {
    scale: Scale,
    selection: OffsetSelection<'a>,
    renderer: Renderer,
    zoom: f64,
    zoom_step: f64,
    min_zoom: f64,
    scroll_x: f64,
    scroll_y: usize,
    info: String,
}

impl<'a> Timeline<'a> {
    /// Create a fully zoomed-out viewer over `data`.
    pub fn new(
        data: &'a dyn EventSource,
        styles: &mut Styles,
        width: u32,
        height: u32,
        view: &ViewConfig,
    ) -> Self {
        let scale = Scale::with_layout(data.span(), data.len(), width, height, view.row_layout());
        let selection = OffsetSelection::new(data, scale.num_events(), 0);
        let min_zoom = if view.min_zoom.is_finite() && view.min_zoom > 0.0 {
            view.min_zoom.min(MAX_ZOOM)
        } else {
            MIN_ZOOM
        };
        let zoom_step = if view.zoom_step.is_finite() {
            view.zoom_step.abs()
        } else {
            0.0
        };
        Self {
            scale,
            selection,
            renderer: Renderer::new(styles),
            zoom: MAX_ZOOM,
            zoom_step,
            min_zoom,
            scroll_x: 0.0,
            scroll_y: 0,
            info: String::new(),
        }
    }

    /// Whether there is anything to show.
    pub fn has_data(&self) -> bool {
        self.selection.data_size() > 0
    }

    /// Change the viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.scale.set_actual_size(width, height);
        self.clamp_scroll();
    }

    /// Change the zoom factor by `diff`, clamped to `[min_zoom, 1.0]`.
    ///
    /// Returns the new zoom factor.
    pub fn zoom(&mut self, diff: f64) -> f64 {
        let zoom = self.zoom + diff;
        self.zoom = if zoom.is_finite() {
            zoom.clamp(self.min_zoom, MAX_ZOOM)
        } else {
            MAX_ZOOM
        };
        self.scale.set_scale(self.zoom);
        self.clamp_scroll();
        debug!(zoom = self.zoom, "zoom changed");
        self.zoom
    }

    /// Zoom in by one configured step.
    pub fn zoom_in(&mut self) -> f64 {
        self.zoom(-self.zoom_step)
    }

    /// Zoom out by one configured step.
    pub fn zoom_out(&mut self) -> f64 {
        self.zoom(self.zoom_step)
    }

    /// Current zoom factor.
    pub const fn zoom_factor(&self) -> f64 {
        self.zoom
    }

    /// Set the horizontal scroll position, in seconds from the data start.
    pub fn scroll_x(&mut self, seconds: f64) {
        self.scroll_x = if seconds.is_finite() { seconds } else { 0.0 };
        self.clamp_scroll();
    }

    /// Set the vertical scroll position, in rows.
    pub fn scroll_y(&mut self, rows: usize) {
        self.scroll_y = rows;
        self.clamp_scroll();
    }

    /// Horizontal scrollbar in whole seconds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn x_scrollbar(&self) -> ScrollRange {
        ScrollRange {
            value: self.scroll_x as u64,
            page: self.scale.span().duration_seconds() as u64,
            total: self.selection.data_span().duration_seconds() as u64,
        }
    }

    /// Vertical scrollbar in rows.
    pub fn y_scrollbar(&self) -> ScrollRange {
        let rows = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
        ScrollRange {
            value: rows(self.scroll_y),
            page: rows(self.scale.num_events()),
            total: rows(self.selection.data_size()),
        }
    }

    /// Draw the visible rows. Returns the number of rows drawn.
    pub fn draw(&mut self, draw: &mut dyn Draw) -> usize {
        if !self.has_data() {
            return 0;
        }
        self.sync();
        self.renderer.render(&self.selection, &self.scale, draw)
    }

    /// Handle a click at viewport pixel `(x, y)`.
    ///
    /// A primary click on a step sets the info text to
    /// `"<event> <step> <seconds>s"` and returns `true`. A secondary click
    /// clears the info text.
    pub fn click(&mut self, button: PointerButton, x: i32, y: i32) -> bool {
        match button {
            PointerButton::Primary => {
                if !self.has_data() {
                    return false;
                }
                self.sync();
                let text = self
                    .renderer
                    .find_event(&self.selection, &self.scale, x, y)
                    .map(|hit| {
                        format!(
                            "{} {} {:.6}s",
                            hit.event.label(),
                            hit.step.label(),
                            hit.step.span().duration_seconds()
                        )
                    });
                match text {
                    Some(text) => {
                        debug!(x, y, info = %text, "step selected");
                        self.info = text;
                        true
                    }
                    None => false,
                }
            }
            PointerButton::Secondary => {
                self.info.clear();
                false
            }
            PointerButton::Other => false,
        }
    }

    /// Details of the last clicked step, empty when nothing is selected.
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Current pixel geometry.
    pub const fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Current row window.
    pub const fn selection(&self) -> &OffsetSelection<'a> {
        &self.selection
    }

    fn clamp_scroll(&mut self) {
        let total = self.selection.data_span().duration_seconds();
        let page = self.scale.span().duration_seconds();
        let max_x = (total - page).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);

        let max_y = self
            .selection
            .data_size()
            .saturating_sub(self.scale.num_events());
        self.scroll_y = self.scroll_y.min(max_y);
    }

    fn sync(&mut self) {
        let start = self
            .selection
            .data_span()
            .start()
            .saturating_add(Ts::from_secs_f64(self.scroll_x));
        self.scale.set_start(start);
        self.selection
            .set_selection(self.scale.num_events(), self.scroll_y);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tmln_types::{Event, EventStep, Style, TsSpan};

    use super::*;
    use crate::data::{MEMORY_SOURCE, VectorData};

    #[derive(Default)]
    struct Recorder {
        rects: Vec<(i32, i32, u32, u32)>,
    }

    impl Draw for Recorder {
        fn text_height(&self) -> i32 {
            100
        }

        fn line(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32, _style: &Style) {}

        fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, _style: &Style) {
            self.rects.push((x, y, width, height));
        }

        fn text(&mut self, _x: i32, _y: i32, _text: &str, _style: &Style) {}
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Ten back-to-back 10s events over 0..100s, each with one full-width step.
    fn store(styles: &mut Styles) -> VectorData {
        let style = styles.get_style("blue");
        VectorData::from_events(
            MEMORY_SOURCE,
            (0..10_i64).map(|i| {
                let span = TsSpan::new(Ts::new(i * 10, 0), Ts::new(i * 10 + 10, 0));
                Event::new(format!("e{i}"), "", span, Arc::clone(&style))
                    .with_step(EventStep::new("run", "", span, Arc::clone(&style)))
            }),
        )
    }

    #[test]
    fn primary_click_inspects_and_secondary_clears() {
        let mut styles = Styles::new();
        let data = store(&mut styles);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 800, &ViewConfig::default());

        assert!(timeline.click(PointerButton::Primary, 15, 3));
        assert_eq!(timeline.info(), "e0 run 10.000000s");

        // Nothing under the pointer keeps the previous text.
        assert!(!timeline.click(PointerButton::Primary, 500, 3));
        assert_eq!(timeline.info(), "e0 run 10.000000s");

        assert!(!timeline.click(PointerButton::Other, 15, 3));
        assert!(!timeline.click(PointerButton::Secondary, 0, 0));
        assert_eq!(timeline.info(), "");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut styles = Styles::new();
        let data = store(&mut styles);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 800, &ViewConfig::default());

        assert!(approx(timeline.zoom_in(), 0.9));
        assert!(approx(timeline.zoom_out(), 1.0));
        assert!(approx(timeline.zoom_out(), 1.0));
        assert!(approx(timeline.zoom(-5.0), 0.1));
        assert!(approx(timeline.zoom(f64::NAN), 1.0));
        assert!(approx(timeline.scale().zoom(), 1.0));
    }

    #[test]
    fn horizontal_scrollbar_follows_zoom() {
        let mut styles = Styles::new();
        let data = store(&mut styles);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 800, &ViewConfig::default());

        assert_eq!(
            timeline.x_scrollbar(),
            ScrollRange {
                value: 0,
                page: 100,
                total: 100
            }
        );

        timeline.zoom(-0.5);
        timeline.scroll_x(30.0);
        assert_eq!(
            timeline.x_scrollbar(),
            ScrollRange {
                value: 30,
                page: 50,
                total: 100
            }
        );

        timeline.scroll_x(80.0);
        assert_eq!(timeline.x_scrollbar().value, 50);
        timeline.scroll_x(-3.0);
        assert_eq!(timeline.x_scrollbar().value, 0);
    }

    #[test]
    fn horizontal_scroll_moves_hit_targets() {
        let mut styles = Styles::new();
        let data = store(&mut styles);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 800, &ViewConfig::default());

        timeline.zoom(-0.5);
        timeline.scroll_x(50.0);
        assert_eq!(timeline.scale().event_height(), 30);

        // Row 5 is e5 (50..60s), now at the left edge, 200px wide.
        assert!(timeline.click(PointerButton::Primary, 100, 160));
        assert_eq!(timeline.info(), "e5 run 10.000000s");
        assert_eq!(timeline.scale().span().start(), Ts::new(50, 0));
    }

    #[test]
    fn vertical_scroll_is_clamped_and_moves_rows() {
        let mut styles = Styles::new();
        let data = store(&mut styles);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 30, &ViewConfig::default());
        assert_eq!(timeline.scale().num_events(), 6);

        timeline.scroll_y(10);
        assert_eq!(
            timeline.y_scrollbar(),
            ScrollRange {
                value: 4,
                page: 6,
                total: 10
            }
        );

        let mut draw = Recorder::default();
        assert_eq!(timeline.draw(&mut draw), 6);
        assert_eq!(draw.rects.first(), Some(&(400, 0, 100, 5)));

        assert!(timeline.click(PointerButton::Primary, 405, 2));
        assert_eq!(timeline.info(), "e4 run 10.000000s");
    }

    #[test]
    fn resize_recomputes_rows() {
        let mut styles = Styles::new();
        let data = store(&mut styles);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 30, &ViewConfig::default());
        timeline.scroll_y(4);
        timeline.resize(500, 800);
        assert_eq!(timeline.scale().num_events(), 53);
        assert_eq!(timeline.y_scrollbar().value, 0);
        assert!(approx(timeline.scale().sec_to_pixel(), 5.0));
    }

    #[test]
    fn empty_store_draws_nothing() {
        let mut styles = Styles::new();
        let data = VectorData::new(MEMORY_SOURCE);
        let mut timeline = Timeline::new(&data, &mut styles, 1000, 800, &ViewConfig::default());

        assert!(!timeline.has_data());
        let mut draw = Recorder::default();
        assert_eq!(timeline.draw(&mut draw), 0);
        assert!(draw.rects.is_empty());
        assert!(!timeline.click(PointerButton::Primary, 0, 0));
    }
}
