pub mod filter;
pub mod lines;
pub mod walk;

pub use filter::IgnoreSet;
pub use walk::{scan_root, ScanOptions, ScanStats};

use crate::config::AppConfig;

impl ScanOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ignore: IgnoreSet::new(&config.ignore_dirs, &config.keep_dirs),
            extension: config.extension.clone(),
            count_lines: config.count_lines,
        }
    }
}
