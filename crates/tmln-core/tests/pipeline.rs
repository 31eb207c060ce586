//! End-to-end tests for the load → select → scale → render pipeline.
//!
//! Documents are written to a scratch directory and loaded from disk so
//! the file path becomes the store's source name, as it does in the CLI.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use std::sync::Arc;

use tmln_core::{
    Draw, EventSource, LoadJson, OffsetSelection, PointerButton, Renderer, Scale, TimeSelection,
    Timeline, VectorData, ViewConfig, visible_events,
};
use tmln_types::{Event, EventStep, Style, Styles, Ts, TsSpan};

const DOCUMENT: &str = r##"{
  "styles": [
    {"name": "compile", "fg": "#3366cc", "bg": "white"},
    {"name": "test", "fg": "#33aa33"}
  ],
  "events": [
    {"label": "job-1", "start": "2024-03-01T12:00:00", "end": "2024-03-01T12:00:40",
     "steps": [
       {"label": "compile", "start": "2024-03-01T12:00:00", "end": "2024-03-01T12:00:30", "style": "compile"},
       {"label": "test", "start": "2024-03-01T12:00:30", "end": "2024-03-01T12:00:40", "style": "test"}
     ]},
    {"label": "job-2", "start": "2024-03-01T12:00:10.5", "end": "2024-03-01T12:01:40",
     "steps": [
       {"label": "compile", "start": "2024-03-01T12:00:10.5", "end": "2024-03-01T12:01:40", "style": "compile"}
     ]},
    {"label": "job-3", "start": "2024-03-01T12:00:20", "end": "2024-03-01T12:00:25", "style": "red"},
    {"label": "broken", "start": "2024-03-01T12:00:21"}
  ]
}"##;

/// 2024-03-01T12:00:00Z.
const T0: i64 = 1_709_294_400;

#[derive(Default)]
struct Recorder {
    rects: Vec<(i32, i32, u32, u32, String)>,
    labels: Vec<String>,
}

impl Draw for Recorder {
    fn text_height(&self) -> i32 {
        10
    }

    fn line(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32, _style: &Style) {}

    fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32, style: &Style) {
        self.rects
            .push((x, y, width, height, style.name().to_owned()));
    }

    fn text(&mut self, _x: i32, _y: i32, text: &str, _style: &Style) {
        self.labels.push(text.to_owned());
    }
}

fn load_document() -> (VectorData, Styles) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.json");
    std::fs::write(&path, DOCUMENT).unwrap();

    let mut data = VectorData::new(path.display().to_string());
    let mut styles = Styles::new();
    let summary = LoadJson::new(&mut data, &mut styles)
        .load_file(&path)
        .unwrap();
    assert_eq!(summary.events, 3);
    assert_eq!(summary.events_skipped, 1);
    assert_eq!(summary.steps, 3);
    assert_eq!(summary.styles, 2);
    assert!(data.source().ends_with("jobs.json"));
    (data, styles)
}

#[test]
fn store_span_matches_event_spans() {
    let (data, _) = load_document();

    let start = visible_events(&data).map(Event::start).min().unwrap();
    let end = visible_events(&data).map(Event::end).max().unwrap();
    assert_eq!(data.span(), TsSpan::new(start, end));
    assert_eq!(data.span().start(), Ts::new(T0, 0));
    assert_eq!(data.span().end(), Ts::new(T0 + 100, 0));
    assert_eq!(data.get(1).unwrap().start(), Ts::new(T0 + 10, 500_000_000));
}

#[test]
fn export_renders_time_window() {
    let (data, mut styles) = load_document();
    let scale = Scale::new(data.span(), data.len(), 1000, 800);
    let selection = TimeSelection::new(&data, scale.num_events(), scale.span());
    let renderer = Renderer::new(&mut styles);
    let mut draw = Recorder::default();

    assert_eq!(renderer.render(&selection, &scale, &mut draw), 3);
    assert_eq!(draw.labels, ["job-1", "job-2", "job-3"]);
    assert_eq!(
        draw.rects[..3],
        [
            (0, 0, 400, 15, "default".to_owned()),
            (0, 0, 300, 15, "compile".to_owned()),
            (300, 0, 100, 15, "test".to_owned()),
        ]
    );
    assert_eq!(draw.rects[5], (200, 30, 50, 15, "red".to_owned()));
}

#[test]
fn time_window_narrows_export() {
    let (data, _) = load_document();
    let window = TsSpan::new(Ts::new(T0 + 10, 0), Ts::new(T0 + 30, 0));
    let selection = TimeSelection::new(&data, 10, window);
    let labels: Vec<&str> = visible_events(&selection).map(Event::label).collect();
    assert_eq!(labels, ["job-2", "job-3"]);
}

#[test]
fn hit_test_on_rendered_rows() {
    let mut styles = Styles::new();
    let style = styles.get_style("blue");
    let span = TsSpan::new(Ts::new(1, 0), Ts::new(5, 0));
    let data = VectorData::from_events(
        "memory",
        [Event::new("target", "", span, Arc::clone(&style))
            .with_step(EventStep::new("whole", "", span, style))],
    );
    // 0..100s over 1000px: the event covers pixels [10, 50].
    let scale = Scale::new(TsSpan::new(Ts::new(0, 0), Ts::new(100, 0)), 1, 1000, 800);
    let renderer = Renderer::new(&mut styles);

    let hit = renderer.find_event(&data, &scale, 30, 3).unwrap();
    assert_eq!(hit.event.label(), "target");
    assert_eq!(hit.step.label(), "whole");
    assert!(renderer.find_event(&data, &scale, 60, 3).is_none());
}

#[test]
fn offset_window_over_loaded_store() {
    let (data, _) = load_document();
    let selection = OffsetSelection::new(&data, 2, 1);
    assert_eq!(selection.window(), 1..3);
    assert_eq!(
        selection.span(),
        TsSpan::new(Ts::new(T0 + 10, 500_000_000), Ts::new(T0 + 25, 0))
    );
}

#[test]
fn timeline_inspects_loaded_steps() {
    let (data, mut styles) = load_document();
    let mut timeline = Timeline::new(&data, &mut styles, 1000, 800, &ViewConfig::default());

    assert!(timeline.click(PointerButton::Primary, 350, 5));
    assert_eq!(timeline.info(), "job-1 test 10.000000s");

    assert!(timeline.click(PointerButton::Primary, 500, 20));
    assert_eq!(timeline.info(), "job-2 compile 89.500000s");
}

#[test]
fn timestamp_arithmetic_round_trips() {
    let samples = [
        Ts::new(0, 0),
        Ts::new(1, 999_999_999),
        Ts::new(-3, 250_000_000),
        Ts::new(T0, 123_456_789),
        Ts::from_secs_f64(231.12),
    ];
    for a in samples {
        for b in samples {
            let sum = a + b;
            assert!((0..1_000_000_000).contains(&sum.nsec()));
            assert_eq!(sum - b, a);
        }
    }
    assert_eq!(
        Ts::new(1, 0) + Ts::new(0, 999_999_999) + Ts::new(0, 1),
        Ts::new(2, 0)
    );
    let diff = Ts::new(2, 200_000_000) - Ts::new(1, 500_000_000);
    assert!((diff.to_seconds() - 0.7).abs() < 1e-9);
}
