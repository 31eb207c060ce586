//! Configuration loading and typed config structures for tmln.
//!
//! The optional configuration file is YAML (see `tmln-config.yaml` at the
//! project root). Every field has a default, so an empty file or no file
//! at all yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::scale::{MIN_ZOOM, RowLayout};

/// Environment variable overriding `render.font`.
pub const FONT_ENV: &str = "TMLN_FONT";

/// Environment variable overriding `logging.level`.
pub const LOG_ENV: &str = "TMLN_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TmlnConfig {
    /// Image export settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Row layout and zoom behavior.
    #[serde(default)]
    pub view: ViewConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TmlnConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TMLN_FONT` overrides `render.font`
    /// - `TMLN_LOG` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `TMLN_FONT` and `TMLN_LOG` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var(FONT_ENV).ok(), std::env::var(LOG_ENV).ok());
    }

    /// Apply override values; `None` leaves a field unchanged.
    pub fn apply_overrides(&mut self, font: Option<String>, level: Option<String>) {
        if let Some(font) = font.filter(|f| !f.is_empty()) {
            self.render.font = Some(PathBuf::from(font));
        }
        if let Some(level) = level.filter(|l| !l.is_empty()) {
            self.logging.level = level;
        }
    }
}

/// Image export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Output path used when the command line names none.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Font file (TTF or OTF) for labels. Labels are skipped without one.
    #[serde(default)]
    pub font: Option<PathBuf>,

    /// Canvas background, `#rrggbb` or a built-in color name.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            font: None,
            background: default_background(),
        }
    }
}

/// Row layout and zoom configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewConfig {
    /// Zoom factor change per zoom-in/zoom-out action.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Smallest zoom factor (most zoomed in).
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,

    /// Preferred row height in pixels.
    #[serde(default = "default_row_height")]
    pub row_height: u32,

    /// Row height floor in pixels.
    #[serde(default = "default_min_row_height")]
    pub min_row_height: u32,

    /// Row height ceiling for zoomed-in rows.
    #[serde(default = "default_max_row_height")]
    pub max_row_height: u32,
}

impl ViewConfig {
    /// Row heights as a [`RowLayout`].
    pub fn row_layout(&self) -> RowLayout {
        RowLayout::new(self.row_height, self.min_row_height, self.max_row_height)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_step: default_zoom_step(),
            min_zoom: default_min_zoom(),
            row_height: default_row_height(),
            min_row_height: default_min_row_height(),
            max_row_height: default_max_row_height(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_width() -> u32 {
    1600
}

const fn default_height() -> u32 {
    800
}

fn default_output() -> PathBuf {
    PathBuf::from("render.png")
}

fn default_background() -> String {
    "white".to_owned()
}

const fn default_zoom_step() -> f64 {
    0.1
}

const fn default_min_zoom() -> f64 {
    MIN_ZOOM
}

const fn default_row_height() -> u32 {
    15
}

const fn default_min_row_height() -> u32 {
    5
}

const fn default_max_row_height() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}
