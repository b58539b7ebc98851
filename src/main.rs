//! imsz - Print the format and pixel dimensions of images.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imsz::{
    config::{Config, Input, OutputFormat},
    detect_path, DetectionOutcome,
};

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut all_ok = true;
    for input in config.inputs() {
        let label = input.label();
        let outcome = probe(&input);
        debug!(input = %label, ok = outcome.is_ok(), "Probed input");
        all_ok &= outcome.is_ok();

        match config.output {
            OutputFormat::Text => print_text(&label, &outcome),
            OutputFormat::Json => print_json(&label, &outcome),
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so they never mix with results on stdout.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "imsz=debug" } else { "imsz=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn probe(input: &Input) -> DetectionOutcome {
    match input {
        Input::Path(path) => detect_path(path),
        Input::Stdin => probe_stdin(),
    }
}

/// Probe standard input through its descriptor so a redirected file stays seekable.
#[cfg(unix)]
fn probe_stdin() -> DetectionOutcome {
    use std::os::fd::AsFd;

    let stdin = std::io::stdin();
    imsz::detect_fd(stdin.as_fd())
}

#[cfg(not(unix))]
fn probe_stdin() -> DetectionOutcome {
    imsz::detect_stream(std::io::stdin().lock())
}

// =============================================================================
// Output
// =============================================================================

fn print_text(label: &str, outcome: &DetectionOutcome) {
    match outcome {
        Ok(info) => println!("{}: {}, {} x {}", label, info.format, info.width, info.height),
        Err(e) => eprintln!("{}: {}", label, e),
    }
}

/// One line of JSON output.
#[derive(Debug, Serialize)]
struct Report<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

impl<'a> Report<'a> {
    fn new(path: &'a str, outcome: &DetectionOutcome) -> Self {
        match outcome {
            Ok(info) => Report {
                path,
                format: Some(info.format.name()),
                format_id: Some(info.format.id()),
                width: Some(info.width),
                height: Some(info.height),
                error: None,
                kind: None,
            },
            Err(e) => Report {
                path,
                format: e.attempted_format().map(|format| format.name()),
                format_id: e.attempted_format().map(|format| format.id()),
                width: None,
                height: None,
                error: Some(e.to_string()),
                kind: Some(e.kind()),
            },
        }
    }
}

fn print_json(label: &str, outcome: &DetectionOutcome) {
    match serde_json::to_string(&Report::new(label, outcome)) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("Failed to serialize result for {}: {}", label, e),
    }
}
