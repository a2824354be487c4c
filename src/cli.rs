//! CLI argument parsing for framegraph

use crate::frame::Verbosity;
use crate::parser::ParseMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the frame timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Summary line and a terminal timeline (default)
    Text,
    /// JSON report for machine parsing
    Json,
    /// CSV of every drawn bar
    Csv,
    /// HTML page with an SVG timeline
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "framegraph")]
#[command(version)]
#[command(about = "Display frame execution using trace data generated by the TIDL API", long_about = None)]
pub struct Cli {
    /// Path to trace log file
    #[arg(default_value = "trace.log")]
    pub input_file: PathBuf,

    /// Level of graph detail. 0->Summary, 1->Details
    #[arg(short, long, value_enum, default_value = "0")]
    pub verbosity: Verbosity,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Skip records with an invalid key, number or phase instead of aborting
    #[arg(long = "skip-invalid")]
    pub skip_invalid: bool,

    /// Print every frame's recorded ranges
    #[arg(long)]
    pub dump: bool,

    /// Enable debug tracing output to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn parse_mode(&self) -> ParseMode {
        if self.skip_invalid {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        }
    }
}
