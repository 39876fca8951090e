//! vizsel-run - compiles a view spec and prints the result
//!
//! Reads a JSON view spec, compiles its selections and scales, and writes the
//! compiled artifact (or a single view of it) to stdout as JSON. Warnings and
//! progress go to stderr through `tracing`; each warning is logged once, as it
//! is raised.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "vizsel-run")]
#[command(about = "Compile the selections of a view spec into signals and scales")]
struct Cli {
    /// Path to a JSON view spec
    spec: PathBuf,

    /// Print only the named view
    #[arg(long)]
    view: Option<String>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vizsel=debug,vizsel_resolve=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let output = match vizsel::compile_file(&cli.spec) {
        Ok(output) => output,
        Err(e) => {
            error!("Failed to compile {}: {}", cli.spec.display(), e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Compiled {} views, {} top-level signals, {} warnings",
        output.compiled.views.len(),
        output.compiled.signals.len(),
        output.warnings.len()
    );

    let rendered = match &cli.view {
        Some(name) => match output.compiled.view(name) {
            Some(view) => render(view, cli.compact),
            None => {
                error!("No view named '{}'", name);
                return ExitCode::FAILURE;
            }
        },
        None => render(&output.compiled, cli.compact),
    };

    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}
