//! JSON document loader.
//!
//! Reads `{"events": [...], "styles": [...]}` into an event store and a
//! style table. A document without an `events` array is rejected as a
//! whole; individual events, steps and styles missing a required field are
//! skipped and counted in the returned [`LoadSummary`].
//!
//! Styles are registered before events are built so that events can refer
//! to styles declared anywhere in the document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tmln_types::{Color, Event, EventStep, Style, Styles, Ts, TsSpan};
use tracing::{debug, info, warn};

use crate::data::{EventSource, StoreError};

/// Errors that abort a load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("failed to parse JSON: {source}")]
    Json {
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The document is not an object with an `events` array.
    #[error("invalid document: {source}")]
    Document {
        /// What the document was missing.
        source: serde_json::Error,
    },

    /// The target store refused an event.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Counts of what a load accepted and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Events appended to the store.
    pub events: usize,
    /// Events dropped for missing required fields.
    pub events_skipped: usize,
    /// Steps attached to loaded events.
    pub steps: usize,
    /// Steps dropped for missing required fields.
    pub steps_skipped: usize,
    /// Styles newly registered.
    pub styles: usize,
    /// Styles dropped for missing fields or because the name was taken.
    pub styles_skipped: usize,
}

/// Top-level document. Records stay untyped so one bad record does not
/// fail the whole array.
#[derive(Debug, Deserialize)]
struct DocumentRecord {
    events: Vec<Value>,
    #[serde(default)]
    styles: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    label: String,
    info: Option<String>,
    start: String,
    end: String,
    style: Option<String>,
    steps: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct StepRecord {
    label: String,
    info: Option<String>,
    start: String,
    end: String,
    style: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StyleRecord {
    name: String,
    fg: String,
    bg: Option<String>,
}

/// Loads JSON documents into a store and a style table.
pub struct LoadJson<'a> {
    data: &'a mut dyn EventSource,
    styles: &'a mut Styles,
}

impl<'a> LoadJson<'a> {
    /// Create a loader appending to `data` and registering into `styles`.
    pub fn new(data: &'a mut dyn EventSource, styles: &'a mut Styles) -> Self {
        Self { data, styles }
    }

    /// Load a document from a file.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadSummary, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&text)
    }

    /// Load a document from JSON text.
    pub fn load_str(&mut self, text: &str) -> Result<LoadSummary, LoadError> {
        let value = serde_json::from_str(text).map_err(|source| LoadError::Json { source })?;
        self.load_value(value)
    }

    /// Load an already-parsed document.
    pub fn load_value(&mut self, value: Value) -> Result<LoadSummary, LoadError> {
        let document: DocumentRecord =
            serde_json::from_value(value).map_err(|source| LoadError::Document { source })?;
        let mut summary = LoadSummary::default();

        for style in document.styles.unwrap_or_default() {
            if self.add_style(style) {
                summary.styles = summary.styles.saturating_add(1);
            } else {
                summary.styles_skipped = summary.styles_skipped.saturating_add(1);
            }
        }

        for record in document.events {
            match serde_json::from_value::<EventRecord>(record) {
                Ok(record) => {
                    let event = self.build_event(record, &mut summary);
                    self.data.add_event(event)?;
                    summary.events = summary.events.saturating_add(1);
                }
                Err(err) => {
                    debug!(error = %err, "skipping event");
                    summary.events_skipped = summary.events_skipped.saturating_add(1);
                }
            }
        }

        info!(
            source = self.data.source(),
            events = summary.events,
            events_skipped = summary.events_skipped,
            steps = summary.steps,
            styles = summary.styles,
            "timeline data loaded"
        );
        Ok(summary)
    }

    fn add_style(&mut self, record: Value) -> bool {
        let record: StyleRecord = match serde_json::from_value(record) {
            Ok(record) => record,
            Err(err) => {
                debug!(error = %err, "skipping style");
                return false;
            }
        };
        let fg = Color::parse(&record.fg);
        let bg = record.bg.as_deref().map_or(Color::BLACK, Color::parse);
        let added = self.styles.add_style(Style::new(&record.name, fg, bg));
        if !added {
            debug!(name = %record.name, "style already registered");
        }
        added
    }

    fn build_event(&mut self, record: EventRecord, summary: &mut LoadSummary) -> Event {
        let span = parse_span(&record.label, &record.start, &record.end);
        let style = self.resolve_style(record.style.as_deref());
        let mut event = Event::new(record.label, record.info.unwrap_or_default(), span, style);

        for step in record.steps.unwrap_or_default() {
            match serde_json::from_value::<StepRecord>(step) {
                Ok(step) => {
                    let span = parse_span(&step.label, &step.start, &step.end);
                    let style = self.resolve_style(step.style.as_deref());
                    event.add_step(EventStep::new(
                        step.label,
                        step.info.unwrap_or_default(),
                        span,
                        style,
                    ));
                    summary.steps = summary.steps.saturating_add(1);
                }
                Err(err) => {
                    debug!(event = event.label(), error = %err, "skipping step");
                    summary.steps_skipped = summary.steps_skipped.saturating_add(1);
                }
            }
        }
        event
    }

    fn resolve_style(&mut self, name: Option<&str>) -> Arc<Style> {
        match name {
            Some(name) if !name.is_empty() => self.styles.get_style(name),
            _ => Arc::clone(self.styles.default_style()),
        }
    }
}

fn parse_span(label: &str, start: &str, end: &str) -> TsSpan {
    TsSpan::new(parse_ts(label, start), parse_ts(label, end))
}

fn parse_ts(label: &str, text: &str) -> Ts {
    text.parse().unwrap_or_else(|err| {
        warn!(label, input = text, error = %err, "malformed timestamp, using best-effort value");
        Ts::parse_lenient(text)
    })
}
