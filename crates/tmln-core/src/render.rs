//! Drawing events through an abstract canvas and hit-testing pixels.
//!
//! The renderer emits only the four [`Draw`] primitives; it never touches
//! pixels. Row `i` of the output is the event at `view.begin() + i`.

use std::sync::Arc;

use tmln_types::{Event, EventStep, Style, Styles};

use crate::data::EventSource;
use crate::scale::Scale;

/// Style name used for row separator lines.
pub const LINE_STYLE_NAME: &str = "black";

/// Drawing primitives the renderer needs from a backend.
pub trait Draw {
    /// Height of rendered text in pixels.
    fn text_height(&self) -> i32;

    /// Draw a line from `(x1, y1)` to `(x2, y2)`.
    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, style: &Style);

    /// Fill a rectangle with its top-left corner at `(x, y)`.
    fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, style: &Style);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn text(&mut self, x: i32, y: i32, text: &str, style: &Style);
}

/// Result of a successful hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Event on the row that was hit.
    pub event: &'a Event,
    /// Step under the pointer.
    pub step: &'a EventStep,
}

/// Draws selection rows and maps pixels back to steps.
#[derive(Debug, Clone)]
pub struct Renderer {
    line_style: Arc<Style>,
}

impl Renderer {
    /// Create a renderer, resolving the separator style from `styles`.
    pub fn new(styles: &mut Styles) -> Self {
        Self {
            line_style: styles.get_style(LINE_STYLE_NAME),
        }
    }

    /// Draw every visible event of `data`, one row each.
    ///
    /// Returns the number of rows drawn.
    pub fn render(&self, data: &dyn EventSource, scale: &Scale, draw: &mut dyn Draw) -> usize {
        let width = i32::try_from(scale.actual_width()).unwrap_or(i32::MAX);
        let height = row_height(scale);

        let mut y = 0_i32;
        let mut rows = 0_usize;
        for event in data.window().filter_map(|idx| data.get(idx)) {
            render_event(draw, y, event, scale);
            draw.line(0, y, width, y, &self.line_style);
            y = y.saturating_add(height);
            draw.line(0, y, width, y, &self.line_style);
            rows = rows.saturating_add(1);
        }
        rows
    }

    /// Find the step under pixel `(x, y)`.
    ///
    /// The row is `y / row_height`. Steps of that row are scanned in order
    /// and the last one whose pixel range `[x1, x1 + width]` contains `x`
    /// wins; the scan stops at the first step starting right of `x`.
    #[allow(clippy::unused_self)]
    pub fn find_event<'d>(
        &self,
        data: &'d dyn EventSource,
        scale: &Scale,
        x: i32,
        y: i32,
    ) -> Option<Hit<'d>> {
        if y < 0 {
            return None;
        }
        let row = usize::try_from(y.checked_div(row_height(scale))?).ok()?;
        if row >= data.len() {
            return None;
        }
        let event = data.get(data.begin().checked_add(row)?)?;

        let mut hit = None;
        for step in event.steps() {
            let x1 = scale.time_to_x(step.start());
            if x1 > x {
                break;
            }
            let width = i32::try_from(scale.span_width(step.span())).unwrap_or(i32::MAX);
            if x <= x1.saturating_add(width) {
                hit = Some(Hit { event, step });
            }
        }
        hit
    }
}

fn render_event(draw: &mut dyn Draw, y: i32, event: &Event, scale: &Scale) {
    let height = scale.event_height();
    draw.rectangle(
        scale.time_to_x(event.start()),
        y,
        scale.span_width(event.span()),
        height,
        event.style(),
    );

    for step in event.steps() {
        draw.rectangle(
            scale.time_to_x(step.start()),
            y,
            scale.span_width(step.span()),
            height,
            step.style(),
        );
    }

    let height = row_height(scale);
    let text_height = draw.text_height();
    if height >= text_height {
        let offset = height.saturating_sub(text_height) / 2;
        draw.text(0, y.saturating_add(offset), event.label(), event.style());
    }
}

fn row_height(scale: &Scale) -> i32 {
    i32::try_from(scale.event_height()).unwrap_or(i32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tmln_types::{Color, Ts, TsSpan};

    use super::*;
    use crate::data::{MEMORY_SOURCE, VectorData};
    use crate::selection::OffsetSelection;

    #[derive(Debug, PartialEq, Eq)]
    enum Op {
        Line(i32, i32, i32, i32),
        Rect(i32, i32, u32, u32, String),
        Text(i32, i32, String),
    }

    #[derive(Default)]
    struct Recorder {
        text_height: i32,
        ops: Vec<Op>,
    }

    impl Draw for Recorder {
        fn text_height(&self) -> i32 {
            self.text_height
        }

        fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, style: &Style) {
            assert_eq!(style.fg(), Color::BLACK);
            self.ops.push(Op::Line(x1, y1, x2, y2));
        }

        fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, style: &Style) {
            self.ops.push(Op::Rect(x, y, width, height, style.name().to_owned()));
        }

        fn text(&mut self, x: i32, y: i32, text: &str, _style: &Style) {
            self.ops.push(Op::Text(x, y, text.to_owned()));
        }
    }

    fn secs(sec: i64) -> Ts {
        Ts::new(sec, 0)
    }

    fn span(start: i64, end: i64) -> TsSpan {
        TsSpan::new(secs(start), secs(end))
    }

    /// Two events on a 0..100s timeline, 1000px wide: 10 px per second.
    fn fixture(styles: &mut Styles) -> VectorData {
        let first = Event::new("first", "", span(1, 5), styles.get_style("grey"))
            .with_step(EventStep::new("a", "", span(1, 3), styles.get_style("red")))
            .with_step(EventStep::new("b", "", span(3, 5), styles.get_style("blue")));
        let second = Event::new("second", "", span(0, 100), styles.get_style("green"));
        VectorData::from_events(MEMORY_SOURCE, [first, second])
    }

    #[test]
    fn render_emits_rows_steps_and_separators() {
        let mut styles = Styles::new();
        let data = fixture(&mut styles);
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 2, 1000, 800);
        let mut draw = Recorder {
            text_height: 11,
            ..Recorder::default()
        };

        let rows = renderer.render(&data, &scale, &mut draw);
        assert_eq!(rows, 2);
        assert_eq!(
            draw.ops,
            vec![
                Op::Rect(10, 0, 40, 15, "grey".into()),
                Op::Rect(10, 0, 20, 15, "red".into()),
                Op::Rect(30, 0, 20, 15, "blue".into()),
                Op::Text(0, 2, "first".into()),
                Op::Line(0, 0, 1000, 0),
                Op::Line(0, 15, 1000, 15),
                Op::Rect(0, 15, 1000, 15, "green".into()),
                Op::Text(0, 17, "second".into()),
                Op::Line(0, 15, 1000, 15),
                Op::Line(0, 30, 1000, 30),
            ]
        );
    }

    #[test]
    fn labels_are_skipped_when_rows_are_too_short() {
        let mut styles = Styles::new();
        let data = fixture(&mut styles);
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 2, 1000, 800);
        let mut draw = Recorder {
            text_height: 16,
            ..Recorder::default()
        };

        renderer.render(&data, &scale, &mut draw);
        assert!(!draw.ops.iter().any(|op| matches!(op, Op::Text(..))));
    }

    #[test]
    fn render_draws_only_the_window() {
        let mut styles = Styles::new();
        let data = fixture(&mut styles);
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 2, 1000, 800);
        let selection = OffsetSelection::new(&data, 1, 1);
        let mut draw = Recorder::default();

        assert_eq!(renderer.render(&selection, &scale, &mut draw), 1);
        assert_eq!(draw.ops.first(), Some(&Op::Rect(0, 0, 1000, 15, "green".into())));
    }

    #[test]
    fn hit_test_finds_step_under_pointer() {
        let mut styles = Styles::new();
        let data = fixture(&mut styles);
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 2, 1000, 800);

        let hit = renderer.find_event(&data, &scale, 15, 3).unwrap();
        assert_eq!(hit.event.label(), "first");
        assert_eq!(hit.step.label(), "a");

        let hit = renderer.find_event(&data, &scale, 45, 14).unwrap();
        assert_eq!(hit.step.label(), "b");
    }

    #[test]
    fn hit_test_shared_edge_goes_to_later_step() {
        let mut styles = Styles::new();
        let data = fixture(&mut styles);
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 2, 1000, 800);

        let hit = renderer.find_event(&data, &scale, 30, 0).unwrap();
        assert_eq!(hit.step.label(), "b");
    }

    #[test]
    fn hit_test_misses() {
        let mut styles = Styles::new();
        let data = fixture(&mut styles);
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 2, 1000, 800);

        // Left of the first step.
        assert!(renderer.find_event(&data, &scale, 5, 3).is_none());
        // Right of the last step.
        assert!(renderer.find_event(&data, &scale, 60, 3).is_none());
        // Row without steps.
        assert!(renderer.find_event(&data, &scale, 500, 20).is_none());
        // Below the last row and above the first.
        assert!(renderer.find_event(&data, &scale, 15, 31).is_none());
        assert!(renderer.find_event(&data, &scale, 15, -1).is_none());
    }

    #[test]
    fn hit_test_rows_are_relative_to_the_view() {
        let mut styles = Styles::new();
        let mut data = fixture(&mut styles);
        data.push(
            Event::new("third", "", span(50, 60), styles.get_style("red"))
                .with_step(EventStep::new("c", "", span(50, 60), styles.get_style("red"))),
        );
        let renderer = Renderer::new(&mut styles);
        let scale = Scale::new(span(0, 100), 3, 1000, 800);
        let selection = OffsetSelection::new(&data, 2, 1);

        let hit = renderer.find_event(&selection, &scale, 550, 16).unwrap();
        assert_eq!(hit.event.label(), "third");
        assert!(renderer.find_event(&selection, &scale, 15, 3).is_none());
    }
}
