//! Shared value types for the tmln timeline renderer.
//!
//! Everything the engine crates pass around lives here: timestamps and
//! spans, colors and the style table, and the events drawn as timeline
//! rows.
//!
//! # Modules
//!
//! - [`time`] -- Nanosecond-precision [`Ts`] and half-open [`TsSpan`]
//! - [`style`] -- [`Color`], [`Style`] and the [`Styles`] table
//! - [`event`] -- [`Event`] rows and their [`EventStep`]s

pub mod event;
pub mod style;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use event::{Event, EventStep};
pub use style::{Color, DEFAULT_STYLE_NAME, Style, Styles};
pub use time::{NSEC_PER_SEC, TimeError, Ts, TsSpan};
