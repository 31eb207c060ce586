//! Event store interface and the owning vector-backed store.
//!
//! [`EventSource`] is the read interface every consumer works against. The
//! owning [`VectorData`] store implements it, and so do the windowing views
//! in [`crate::selection`], which report a narrower index range and span
//! over the same storage.
//!
//! Indices are absolute: a view whose window is `[5, 9)` answers
//! `get(5)..get(8)`, not `get(0)..get(3)`.

use std::ops::Range;

use tmln_types::{Event, TsSpan};

/// Source name of stores that were not loaded from a file.
pub const MEMORY_SOURCE: &str = "memory";

/// Errors returned by store mutation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is a read-only view over another store.
    #[error("cannot append to read-only view ({view})")]
    ReadOnly {
        /// Kind of view that rejected the append.
        view: &'static str,
    },
}

/// Read interface over an ordered, append-only sequence of events.
pub trait EventSource {
    /// Where the events came from (a file path or [`MEMORY_SOURCE`]).
    fn source(&self) -> &str;

    /// Time covered by the visible events.
    fn span(&self) -> TsSpan;

    /// Number of visible events, `end() - begin()`.
    fn len(&self) -> usize;

    /// Whether no events are visible.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First visible index.
    fn begin(&self) -> usize;

    /// One past the last visible index.
    fn end(&self) -> usize;

    /// Event at absolute index `idx`, if it is visible.
    fn get(&self, idx: usize) -> Option<&Event>;

    /// Append an event. Views reject this with [`StoreError::ReadOnly`].
    fn add_event(&mut self, event: Event) -> Result<(), StoreError>;

    /// Visible index range, `begin()..end()`.
    fn window(&self) -> Range<usize> {
        self.begin()..self.end()
    }
}

/// Iterate over the visible events of a store, in index order.
pub fn visible_events<S>(source: &S) -> impl Iterator<Item = &Event>
where
    S: EventSource + ?Sized,
{
    source.window().filter_map(move |idx| source.get(idx))
}

/// Growable, owning event store.
///
/// The span starts out as the first event's span; every later append
/// extends its end to cover the new event. The start is never moved, so
/// events are expected in start order.
#[derive(Debug, Clone)]
pub struct VectorData {
    source: String,
    span: TsSpan,
    events: Vec<Event>,
}

impl VectorData {
    /// Create an empty store.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            span: TsSpan::epoch(),
            events: Vec::new(),
        }
    }

    /// Create a store from already-built events.
    pub fn from_events(source: impl Into<String>, events: impl IntoIterator<Item = Event>) -> Self {
        let mut data = Self::new(source);
        for event in events {
            data.push(event);
        }
        data
    }

    /// Append an event and extend the span.
    pub fn push(&mut self, event: Event) {
        if self.events.is_empty() {
            self.span = *event.span();
        } else if event.end() > self.span.end() {
            self.span.set_end(event.end());
        }
        self.events.push(event);
    }

    /// All stored events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl EventSource for VectorData {
    fn source(&self) -> &str {
        &self.source
    }

    fn span(&self) -> TsSpan {
        self.span
    }

    fn len(&self) -> usize {
        self.events.len()
    }

    fn begin(&self) -> usize {
        0
    }

    fn end(&self) -> usize {
        self.events.len()
    }

    fn get(&self, idx: usize) -> Option<&Event> {
        self.events.get(idx)
    }

    fn add_event(&mut self, event: Event) -> Result<(), StoreError> {
        self.push(event);
        Ok(())
    }
}
