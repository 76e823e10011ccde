use std::path::Path;

/// Trait for reporting scan progress.
///
/// The CLI implements it with indicatif spinners. All methods have default
/// no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_scan_progress(&self, _files_matched: usize, _current_path: &Path) {}
    fn on_scan_complete(&self, _root: &Path, _records: usize, _duration_secs: f64) {}
    fn on_merge_complete(&self, _unique_files: usize, _total_lines: u64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
