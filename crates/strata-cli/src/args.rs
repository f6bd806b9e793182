//! Command-line argument definitions for the Strata CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Strata pipeline diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input YAML pipeline
    #[arg(help = "Path to the input pipeline file")]
    pub input: String,

    /// Path to the output file. `.svg` writes a bare SVG document, anything
    /// else an HTML page. Defaults to `output.path` from the configuration.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["strata", "daily.yml"]).unwrap();
        assert_eq!(args.input, "daily.yml");
        assert!(args.output.is_none());
        assert!(args.config.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_parse_all_options() {
        let args = Args::try_parse_from([
            "strata",
            "daily.yml",
            "-o",
            "out.svg",
            "--config",
            "strata.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.output.as_deref(), Some("out.svg"));
        assert_eq!(args.config.as_deref(), Some("strata.toml"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["strata"]).is_err());
    }
}
