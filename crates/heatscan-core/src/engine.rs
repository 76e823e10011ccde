use crate::aggregate::Aggregator;
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner::{self, ScanOptions, ScanStats};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct ScanEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct ScanResult {
    pub aggregate: Aggregator,
    pub stats: ScanStats,
    pub scan_duration: Duration,
    pub merge_duration: Duration,
    pub roots_scanned: usize,
}

impl ScanResult {
    pub fn unique_files(&self) -> usize {
        self.aggregate.len()
    }

    pub fn total_lines(&self) -> u64 {
        self.aggregate.total_lines()
    }
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the aggregation pipeline over every configured root, in order:
    /// 1. Walk the root and fingerprint matching files
    /// 2. Merge the root's records into the shared aggregate
    ///
    /// A root is fully scanned before it is merged. Missing roots are skipped.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanResult, Error> {
        if self.config.root_paths.is_empty() {
            return Err(Error::Other("No root directories configured".to_string()));
        }

        let options = ScanOptions::from_config(&self.config);
        debug!(
            "Scanning for '{}' files, {} ignore entries, count_lines={}",
            options.extension,
            options.ignore.len(),
            options.count_lines
        );

        let mut aggregate = if options.count_lines {
            Aggregator::new()
        } else {
            Aggregator::lenient_line_counts()
        };
        let mut stats = ScanStats::default();
        let mut scan_duration = Duration::ZERO;
        let mut merge_duration = Duration::ZERO;
        let mut roots_scanned = 0;

        for root in &self.config.root_paths {
            let root_path = Path::new(root);
            if !root_path.is_dir() {
                warn!("Skipping {}: not a directory", root_path.display());
                continue;
            }

            info!("Scanning {}...", root_path.display());
            reporter.on_scan_start(root_path);
            let scan_start = Instant::now();
            let (records, root_stats) = scanner::scan_root(root_path, &options, reporter);
            let elapsed = scan_start.elapsed();
            scan_duration += elapsed;
            reporter.on_scan_complete(root_path, records.len(), elapsed.as_secs_f64());

            if root_stats.skipped_time_error > 0 || root_stats.skipped_hash_error > 0 {
                warn!(
                    "{}: {} files skipped on timestamp errors, {} on hash errors",
                    root_path.display(),
                    root_stats.skipped_time_error,
                    root_stats.skipped_hash_error
                );
            }
            stats += root_stats;

            let merge_start = Instant::now();
            aggregate.merge_all(records);
            aggregate.add_root(root_label(root_path));
            merge_duration += merge_start.elapsed();
            roots_scanned += 1;

            debug!(
                "After {}: {} unique files, {} lines",
                root_path.display(),
                aggregate.len(),
                aggregate.total_lines()
            );
        }

        reporter.on_merge_complete(aggregate.len(), aggregate.total_lines());
        info!(
            "{} unique files, {} lines across {} roots",
            aggregate.len(),
            aggregate.total_lines(),
            roots_scanned
        );

        Ok(ScanResult {
            aggregate,
            stats,
            scan_duration,
            merge_duration,
            roots_scanned,
        })
    }
}

/// Base name of a root directory, used to label output. Falls back to the
/// full path for roots like `/`.
pub fn root_label(root: &Path) -> String {
    let normalized: PathBuf = root.components().collect();
    normalized
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}
