use super::filter::IgnoreSet;
use super::lines;
use crate::hasher;
use crate::model::FileRecord;
use crate::progress::ProgressReporter;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// What a walk looks for.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub ignore: IgnoreSet,
    /// File-name suffix, e.g. `.py`. Matched case-sensitively.
    pub extension: String,
    pub count_lines: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub files_seen: usize,
    pub files_matched: usize,
    pub records: usize,
    pub skipped_time_error: usize,
    pub skipped_hash_error: usize,
    pub dirs_skipped: usize,
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: Self) {
        self.files_seen += other.files_seen;
        self.files_matched += other.files_matched;
        self.records += other.records;
        self.skipped_time_error += other.skipped_time_error;
        self.skipped_hash_error += other.skipped_hash_error;
        self.dirs_skipped += other.dirs_skipped;
    }
}

/// Walks `root` and returns one record per matching file. Files whose
/// timestamps or content cannot be read are skipped; the walk never aborts
/// on a single entry.
pub fn scan_root(
    root: &Path,
    options: &ScanOptions,
    reporter: &dyn ProgressReporter,
) -> (Vec<FileRecord>, ScanStats) {
    let mut records = Vec::new();
    let mut stats = ScanStats::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, &options.ignore));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                warn!("Skipping unreadable entry {}: {}", path, err);
                stats.dirs_skipped += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }
        stats.files_seen += 1;

        if !entry.file_name().to_string_lossy().ends_with(&options.extension) {
            continue;
        }
        stats.files_matched += 1;

        let path = entry.path();
        let (created_at, modified_at) = match read_file_times(path) {
            Ok(times) => times,
            Err(err) => {
                warn!("Skipping {}: cannot read timestamps: {}", path.display(), err);
                stats.skipped_time_error += 1;
                continue;
            }
        };

        let fingerprint = match hasher::fingerprint_file(path) {
            Ok(fp) => fp,
            Err(err) => {
                warn!("Skipping {}: cannot hash content: {}", path.display(), err);
                stats.skipped_hash_error += 1;
                continue;
            }
        };

        let line_count = options.count_lines.then(|| lines::count_lines(path));
        trace!("{} -> {} ({:?} lines)", path.display(), fingerprint, line_count);

        records.push(FileRecord {
            fingerprint: Some(fingerprint),
            path: path.to_path_buf(),
            created_at: Some(created_at),
            modified_at: Some(modified_at),
            line_count,
        });
        reporter.on_scan_progress(records.len(), path);
    }

    stats.records = records.len();
    debug!(
        "Scanned {}: {} files seen, {} matched, {} recorded",
        root.display(),
        stats.files_seen,
        stats.files_matched,
        stats.records
    );
    (records, stats)
}

fn is_pruned(entry: &DirEntry, ignore: &IgnoreSet) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let pruned = ignore.is_ignored(&entry.file_name().to_string_lossy());
    if pruned {
        trace!("Pruning directory {}", entry.path().display());
    }
    pruned
}

/// Creation and modification time in local wall-clock time. Platforms
/// without a birth time report the modification time as creation time.
pub fn read_file_times(path: &Path) -> io::Result<(NaiveDateTime, NaiveDateTime)> {
    let metadata = fs::metadata(path)?;
    let modified = metadata.modified()?;
    let created = metadata.created().unwrap_or(modified);
    Ok((to_local(created), to_local(modified)))
}

fn to_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
