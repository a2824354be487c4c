use anyhow::{Context, Result};
use clap::Parser;
use framegraph::cli::{Cli, OutputFormat};
use framegraph::csv_output::CsvOutput;
use framegraph::html_output::HtmlOutput;
use framegraph::json_output::JsonReport;
use framegraph::timeline::Timeline;
use framegraph::{parser, text_output};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings are always shown, `--debug` shows everything
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_report(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            print!("{report}");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let (frames, stats) = parser::load_trace(&args.input_file, args.parse_mode())
        .with_context(|| format!("Failed to read trace {}", args.input_file.display()))?;
    tracing::debug!(?stats, "ingest complete");

    let out_of_order = frames.out_of_order_frames();
    if !out_of_order.is_empty() {
        tracing::warn!(
            frames = ?out_of_order,
            "frame indices are not in chronological order; microseconds per frame may be misleading"
        );
    }

    let summary = frames.summary()?;

    // Keep stdout machine-readable when a structured report goes there
    if args.format == OutputFormat::Text || args.output.is_some() {
        println!("{summary}");
    } else {
        eprintln!("{summary}");
    }

    if args.dump {
        eprint!("{frames}");
    }

    let title = args.input_file.display().to_string();
    let timeline = Timeline::build(&frames, args.verbosity, title);

    let report = match args.format {
        OutputFormat::Text => text_output::render_timeline(&timeline),
        OutputFormat::Csv => CsvOutput::new(&timeline, true).to_csv(),
        OutputFormat::Json => JsonReport {
            summary: &summary,
            offset: frames.offset(),
            ingest: &stats,
            timeline: &timeline,
        }
        .to_json()?,
        OutputFormat::Html => HtmlOutput::new(&timeline).with_summary(&summary).to_html(),
    };

    write_report(&report, args.output.as_deref())
}
