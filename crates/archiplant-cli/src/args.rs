//! Command-line argument definitions for the Archiplant CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input payload, the output directory,
//! configuration file selection, rendering, export and logging verbosity.

use clap::Parser;

use archiplant::render::ImageFormat;

/// Command-line arguments for the Archiplant diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON model
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Directory the artifacts are written to
    #[arg(short, long, default_value = "archiplant-out")]
    pub output_dir: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Image formats to render (png, svg). Defaults to the configured formats
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<ImageFormat>,

    /// Write the PlantUML source and metadata without rendering images
    #[arg(long)]
    pub no_render: bool,

    /// Also export the model as an Archi XML document
    #[arg(long)]
    pub xml: bool,

    /// Treat relationship matrix violations as errors
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
