//! `tmln` command-line front end.
//!
//! Loads a JSON timeline document and either exports it as a PNG image,
//! answers what lies under a pixel of the interactive view, or prints a
//! short summary of the data.
//!
//! ```text
//! JSON --> VectorData --> Selection --> Scale --> Renderer --> PNG / hit test
//! ```
//!
//! Logging goes to stderr; command output goes to stdout.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tmln_core::TmlnConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Render and inspect event timelines.
#[derive(Parser, Debug)]
#[command(name = "tmln", version)]
#[command(about = "Render and inspect event timelines")]
struct Args {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Viewport width in pixels (overrides render.width)
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Viewport height in pixels (overrides render.height)
    #[arg(long, global = true)]
    height: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the whole timeline as a PNG image
    Render {
        /// Input JSON document
        input: PathBuf,
        /// Output image (defaults to render.output)
        output: Option<PathBuf>,
    },

    /// Report the step under a viewport pixel
    Inspect {
        /// Input JSON document
        input: PathBuf,
        /// Pixel column
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        /// Pixel row
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
        /// Zoom factor, 1.0 shows the whole span
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        /// Horizontal scroll in seconds from the data start
        #[arg(long, default_value_t = 0.0)]
        scroll_x: f64,
        /// Vertical scroll in rows
        #[arg(long, default_value_t = 0)]
        scroll_y: usize,
    },

    /// Print source, event count, span and style count
    Summary {
        /// Input JSON document
        input: PathBuf,
    },
}

fn load_config(args: &Args) -> Result<TmlnConfig> {
    let mut config = match &args.config {
        Some(path) => TmlnConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let mut config = TmlnConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

/// Application entry point.
///
/// Parses arguments, loads configuration, initializes logging and runs the
/// selected command.
///
/// # Errors
///
/// Returns an error if the configuration, the input document or the
/// output image cannot be read or written.
fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!(
        width = config.render.width,
        height = config.render.height,
        "configuration loaded"
    );

    let output = match args.command {
        Command::Render { input, output } => {
            let output = output.unwrap_or_else(|| config.render.output.clone());
            commands::render(&input, &output, &config)?
        }
        Command::Inspect {
            input,
            x,
            y,
            zoom,
            scroll_x,
            scroll_y,
        } => commands::inspect(
            &input,
            &commands::InspectRequest {
                x,
                y,
                zoom,
                scroll_x,
                scroll_y,
            },
            &config,
        )?,
        Command::Summary { input } => commands::summary(&input)?,
    };
    println!("{output}");
    Ok(())
}
