//! DZI Assembler - rebuild layer images from tiled pyramids.
//!
//! This binary parses the command line, sets up logging and runs one
//! assembly pass.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dzi_assembler::{Config, RunSummary, SummaryFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Event dir: {:?}", config.event_dir);
    info!("  Tile dir: {:?}", config.resolved_tex_dir());
    info!("  Output dir: {:?}", config.resolved_output_dir());
    info!("  Lower layers: {}", config.enable_lower_layers);
    if config.dry_run {
        info!("  Dry run: nothing will be deleted or written");
    }

    match dzi_assembler::run(&config).await {
        Ok(summary) => {
            print_summary(&summary, config.summary);
            info!("Assembled all groups successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            error!("Ensure the --event-dir and --tex-dir paths exist.");
            error!(
                "e.g.: dzi-assembler --event-dir <event> --tex-dir <tex> --output-dir <dist> --enable-lower-layers <true|false>"
            );
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "dzi_assembler=debug"
    } else {
        "dzi_assembler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Print the run summary to stdout.
fn print_summary(summary: &RunSummary, format: SummaryFormat) {
    match format {
        SummaryFormat::Text => {
            for layer in &summary.layers {
                match &layer.output {
                    Some(path) => println!(
                        "{} layer_{} {}x{} -> {}",
                        layer.group,
                        layer.layer_index,
                        layer.target_width,
                        layer.target_height,
                        path.display()
                    ),
                    None => println!(
                        "{} layer_{} {:?}",
                        layer.group, layer.layer_index, layer.status
                    ),
                }
            }
            println!(
                "{} group(s), {} written, {} skipped",
                summary.groups.len(),
                summary.written(),
                summary.skipped()
            );
        }
        SummaryFormat::Json => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize summary: {}", e),
        },
    }
}
