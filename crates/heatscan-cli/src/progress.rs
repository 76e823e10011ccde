use heatscan_core::ProgressReporter;
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

/// CLI progress reporter: one spinner per root while it is walked.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_message(format!("Scanning {}...", root.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_scan_progress(&self, files_matched: usize, _current_path: &Path) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Scanning... {} files found", HumanCount(files_matched as u64)));
        }
    }

    fn on_scan_complete(&self, root: &Path, records: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m {}: {} files in {:.2}s",
            root.display(),
            records,
            duration_secs
        );
    }

    fn on_merge_complete(&self, unique_files: usize, total_lines: u64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Merged: {} unique files, {} lines",
            HumanCount(unique_files as u64),
            HumanCount(total_lines)
        );
    }
}
