//! Strata CLI library
//!
//! This module contains the core CLI logic for the Strata pipeline diagram
//! tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::ConfigError;

use log::info;

use strata::{Drawing, PipelineDiagram, StrataError, config::OutputConfig};

/// Run the Strata CLI application
///
/// Reads the pipeline at `args.input`, lays it out and writes the drawing.
/// An explicit `args.output` overrides the configured output; its extension
/// picks the format (`.svg` is SVG, anything else HTML).
///
/// # Errors
///
/// Returns `StrataError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Dependency cycles
/// - Rendering errors
pub fn run(args: &Args) -> Result<Drawing, StrataError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing pipeline"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(output) = &args.output {
        app_config = app_config.with_output(OutputConfig::from_path(output));
    }

    let diagram = PipelineDiagram::from_path(&args.input, app_config)?;
    let drawing = diagram.draw()?;

    info!(
        output_file:? = drawing.path(),
        format:? = drawing.format();
        "Pipeline exported successfully"
    );

    Ok(drawing)
}
