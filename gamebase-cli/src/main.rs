//! gamebase CLI
//!
//! Converts the GameBase64 collection disc image into a directory tree that
//! fits the per-directory limits of C64 SD-card loaders.

mod display;
mod error;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use gamebase_lib::{ConvertSummary, Settings, convert};

use crate::display::ProgressDisplay;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "gamebase", version)]
#[command(
    about = "Download the GameBase64 disc image and lay its games out in SD-card sized folders",
    long_about = None
)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();
    init_logging();

    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".if_supports_color(Stderr, |t| t.red()));
        std::process::exit(1);
    }
}

/// `info` by default; `RUST_LOG` overrides.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run() -> Result<(), CliError> {
    let settings = Settings::load().map_err(CliError::settings)?;
    log::debug!("Settings:\n{}", settings.to_toml_string());

    let display = ProgressDisplay::new();
    let result = convert(&settings, &|progress| display.handle(progress));
    display.clear();

    let summary = result?;
    print_summary(&settings, &summary);
    Ok(())
}

fn print_summary(settings: &Settings, summary: &ConvertSummary) {
    println!(
        "{} {} games from {} archives in {} folders under {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.games.if_supports_color(Stdout, |t| t.bold()),
        summary.archives,
        summary.buckets,
        settings
            .output_dir
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    if summary.downloaded {
        println!(
            "  {}",
            format!("Source image downloaded to {}", settings.image_file.display())
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
