//! Timeline engine for tmln: event storage, windowing, pixel geometry,
//! rendering through an abstract canvas, JSON loading and viewer state.
//!
//! Data flows from an event store through a selection (which bounds the
//! working set) and a scale (which computes pixel geometry for it) into
//! the renderer, which either draws the rows or answers what lies under a
//! pixel.
//!
//! # Modules
//!
//! - [`data`] -- [`EventSource`] store interface and the owning [`VectorData`]
//! - [`selection`] -- Count+offset and count+time-span windows over a store
//! - [`scale`] -- Time and row count to pixel mapping with adaptive row height
//! - [`render`] -- [`Draw`] primitives, the [`Renderer`] and hit-testing
//! - [`load`] -- JSON document loader
//! - [`timeline`] -- Toolkit-independent scroll, zoom and inspect state
//! - [`config`] -- YAML configuration

pub mod config;
pub mod data;
pub mod load;
pub mod render;
pub mod scale;
pub mod selection;
pub mod timeline;

pub use config::{ConfigError, LoggingConfig, RenderConfig, TmlnConfig, ViewConfig};
pub use data::{EventSource, MEMORY_SOURCE, StoreError, VectorData, visible_events};
pub use load::{LoadError, LoadJson, LoadSummary};
pub use render::{Draw, Hit, LINE_STYLE_NAME, Renderer};
pub use scale::{MAX_ZOOM, MIN_ZOOM, RowLayout, Scale};
pub use selection::{OffsetSelection, TimeSelection};
pub use timeline::{PointerButton, ScrollRange, Timeline};
