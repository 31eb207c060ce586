//! Windowing views over an event store.
//!
//! Both views borrow the underlying store and expose a contiguous index
//! window through the same [`EventSource`] interface, so the renderer can
//! draw either one without knowing how the window was chosen:
//!
//! - [`OffsetSelection`] windows by row count and row offset (scrollbars).
//! - [`TimeSelection`] windows by row count and a time span (image export).
//!
//! Views are read-only; [`EventSource::add_event`] fails with
//! [`StoreError::ReadOnly`].

use tmln_types::{Event, TsSpan};
use tracing::debug;

use crate::data::{EventSource, StoreError};

/// Window of at most `max_num` events starting `offset` events into the
/// underlying store.
pub struct OffsetSelection<'a> {
    data: &'a dyn EventSource,
    max_num: usize,
    offset: usize,
    span: TsSpan,
    begin: usize,
    end: usize,
}

impl<'a> OffsetSelection<'a> {
    /// Create the view and compute its window.
    pub fn new(data: &'a dyn EventSource, max_num: usize, offset: usize) -> Self {
        let mut selection = Self {
            data,
            max_num,
            offset,
            span: TsSpan::epoch(),
            begin: data.begin(),
            end: data.begin(),
        };
        selection.recompute();
        selection
    }

    /// Change the window parameters.
    ///
    /// Returns `false` without touching the window when neither parameter
    /// changed.
    pub fn set_selection(&mut self, max_num: usize, offset: usize) -> bool {
        if max_num == self.max_num && offset == self.offset {
            return false;
        }
        self.max_num = max_num;
        self.offset = offset;
        self.recompute();
        true
    }

    /// Maximum number of events in the window.
    pub const fn max_num(&self) -> usize {
        self.max_num
    }

    /// Requested offset into the underlying store.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the underlying store.
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    /// Span of the underlying store.
    pub fn data_span(&self) -> TsSpan {
        self.data.span()
    }

    fn recompute(&mut self) {
        let base = self.data.begin();
        let size = self.data.len();
        let first = self.offset.min(size);
        let last = self.offset.saturating_add(self.max_num).min(size);
        self.begin = base.saturating_add(first);
        self.end = base.saturating_add(last);

        let first_event = self.data.get(self.begin);
        let last_event = self.end.checked_sub(1).and_then(|idx| self.data.get(idx));
        self.span = match (first_event, last_event) {
            (Some(first), Some(last)) if self.begin < self.end => {
                TsSpan::new(first.start(), last.end())
            }
            _ => TsSpan::epoch(),
        };

        debug!(
            offset = self.offset,
            max_num = self.max_num,
            begin = self.begin,
            end = self.end,
            "offset selection recomputed"
        );
    }
}

impl EventSource for OffsetSelection<'_> {
    fn source(&self) -> &str {
        self.data.source()
    }

    fn span(&self) -> TsSpan {
        self.span
    }

    fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    fn begin(&self) -> usize {
        self.begin
    }

    fn end(&self) -> usize {
        self.end
    }

    fn get(&self, idx: usize) -> Option<&Event> {
        if (self.begin..self.end).contains(&idx) {
            self.data.get(idx)
        } else {
            None
        }
    }

    fn add_event(&mut self, _event: Event) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly {
            view: "offset selection",
        })
    }
}

/// Window of at most `max_num` events whose start lies inside a time span.
///
/// The scan walks the store from its first index and stops at the first
/// event starting after the span's end, so the store must be ordered by
/// start time.
pub struct TimeSelection<'a> {
    data: &'a dyn EventSource,
    max_num: usize,
    span: TsSpan,
    begin: usize,
    end: usize,
}

impl<'a> TimeSelection<'a> {
    /// Create the view and scan for its window.
    pub fn new(data: &'a dyn EventSource, max_num: usize, span: TsSpan) -> Self {
        let mut selection = Self {
            data,
            max_num,
            span,
            begin: data.end(),
            end: data.end(),
        };
        selection.scan();
        selection
    }

    /// Change the window parameters and rescan.
    pub fn set_selection(&mut self, max_num: usize, span: TsSpan) {
        self.max_num = max_num;
        self.span = span;
        self.scan();
    }

    /// Maximum number of events in the window.
    pub const fn max_num(&self) -> usize {
        self.max_num
    }

    /// Size of the underlying store.
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    fn scan(&mut self) {
        self.begin = self.data.end();
        self.end = self.data.end();

        let mut found = 0_usize;
        if self.max_num > 0 {
            for idx in self.data.window() {
                let Some(event) = self.data.get(idx) else {
                    continue;
                };
                if event.start() > self.span.end() {
                    break;
                }
                if !self.span.contains(event.start()) {
                    continue;
                }
                if found == 0 {
                    self.begin = idx;
                }
                self.end = idx.saturating_add(1);
                found = found.saturating_add(1);
                if found >= self.max_num {
                    break;
                }
            }
        }

        debug!(
            span = %self.span,
            max_num = self.max_num,
            found,
            begin = self.begin,
            end = self.end,
            "time selection scanned"
        );
    }
}

impl EventSource for TimeSelection<'_> {
    fn source(&self) -> &str {
        self.data.source()
    }

    fn span(&self) -> TsSpan {
        self.span
    }

    fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    fn begin(&self) -> usize {
        self.begin
    }

    fn end(&self) -> usize {
        self.end
    }

    fn get(&self, idx: usize) -> Option<&Event> {
        if (self.begin..self.end).contains(&idx) {
            self.data.get(idx)
        } else {
            None
        }
    }

    fn add_event(&mut self, _event: Event) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly {
            view: "time selection",
        })
    }
}
