//! Terminal rendering of conversion progress.

use std::cell::Cell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use gamebase_lib::ConvertProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Spinner,
    Download,
    Extract,
}

/// A single progress bar that switches between a spinner, a byte counter
/// while downloading and an `M/N` counter while extracting.
pub(crate) struct ProgressDisplay {
    pb: ProgressBar,
    phase: Cell<Phase>,
}

impl ProgressDisplay {
    pub(crate) fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self {
            pb,
            phase: Cell::new(Phase::Spinner),
        }
    }

    fn enter(&self, phase: Phase, len: u64) {
        if self.phase.get() == phase {
            return;
        }
        let style = match phase {
            Phase::Spinner => spinner_style(),
            Phase::Download => download_style(),
            Phase::Extract => extract_style(),
        };
        self.pb.set_style(style);
        self.pb.set_length(len);
        self.pb.set_position(0);
        self.phase.set(phase);
    }

    pub(crate) fn handle(&self, progress: ConvertProgress) {
        match progress {
            ConvertProgress::PreparingOutput { path } => {
                self.pb.set_message(format!("Preparing {}", path.display()));
            }
            ConvertProgress::CheckingImage { path } => {
                self.pb.set_message(format!("Checking {}", path.display()));
            }
            ConvertProgress::Downloading {
                bytes_done,
                bytes_total,
            } => {
                self.enter(Phase::Download, bytes_total);
                if bytes_total == 0 {
                    self.pb.set_message(format!("Downloading ({bytes_done} bytes)"));
                }
                self.pb.set_position(bytes_done);
            }
            ConvertProgress::ImageReady { downloaded } => {
                self.enter(Phase::Spinner, 0);
                let verb = if downloaded { "Downloaded" } else { "Found" };
                self.pb.set_message(format!("{verb} source image"));
            }
            ConvertProgress::ArchivesFound { count } => {
                self.pb.set_message(format!("Found {count} archives"));
            }
            ConvertProgress::Extracting {
                archive,
                index,
                total,
            } => {
                self.enter(Phase::Extract, total as u64);
                self.pb.set_position(index as u64);
                self.pb.set_message(archive);
            }
            ConvertProgress::Named { .. } => {}
            ConvertProgress::Placing { bucket, games } => {
                self.enter(Phase::Spinner, 0);
                self.pb.set_message(format!("Placing {games} games in {bucket}"));
            }
            ConvertProgress::CleaningUp => {
                self.enter(Phase::Spinner, 0);
                self.pb.set_message("Removing temporary files");
            }
            ConvertProgress::Done => self.pb.finish_and_clear(),
        }
    }

    pub(crate) fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .expect("static pattern")
        .tick_chars("/-\\|")
}

fn download_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "  {spinner:.cyan} Downloading [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}",
    )
    .expect("static pattern")
    .tick_chars("/-\\|")
    .progress_chars("=> ")
}

fn extract_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} Extracting [{pos}/{len}] {msg}")
        .expect("static pattern")
        .tick_chars("/-\\|")
}
