//! Timeline events and their steps.

use std::sync::Arc;

use crate::style::Style;
use crate::time::{Ts, TsSpan};

/// A labeled sub-interval of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStep {
    label: String,
    info: String,
    span: TsSpan,
    style: Arc<Style>,
}

impl EventStep {
    /// Create a step.
    pub fn new(
        label: impl Into<String>,
        info: impl Into<String>,
        span: TsSpan,
        style: Arc<Style>,
    ) -> Self {
        Self {
            label: label.into(),
            info: info.into(),
            span,
            style,
        }
    }

    /// Step label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Free-form info text, empty when absent.
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Time covered by the step.
    pub const fn span(&self) -> &TsSpan {
        &self.span
    }

    /// Start of the step.
    pub const fn start(&self) -> Ts {
        self.span.start()
    }

    /// End of the step.
    pub const fn end(&self) -> Ts {
        self.span.end()
    }

    /// Style used to draw the step.
    pub fn style(&self) -> &Style {
        &self.style
    }
}

/// A single row in the timeline: a labeled interval made of ordered steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    label: String,
    info: String,
    span: TsSpan,
    style: Arc<Style>,
    steps: Vec<EventStep>,
}

impl Event {
    /// Create an event without steps.
    pub fn new(
        label: impl Into<String>,
        info: impl Into<String>,
        span: TsSpan,
        style: Arc<Style>,
    ) -> Self {
        Self {
            label: label.into(),
            info: info.into(),
            span,
            style,
            steps: Vec::new(),
        }
    }

    /// Builder form of [`Event::add_step`].
    #[must_use]
    pub fn with_step(mut self, step: EventStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step. Steps keep insertion order.
    pub fn add_step(&mut self, step: EventStep) {
        self.steps.push(step);
    }

    /// Event label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Free-form info text, empty when absent.
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Time covered by the event.
    pub const fn span(&self) -> &TsSpan {
        &self.span
    }

    /// Start of the event.
    pub const fn start(&self) -> Ts {
        self.span.start()
    }

    /// End of the event.
    pub const fn end(&self) -> Ts {
        self.span.end()
    }

    /// Style used to draw the event.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Steps in insertion order.
    pub fn steps(&self) -> &[EventStep] {
        &self.steps
    }
}
