pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod model;
pub mod progress;
pub mod report;
pub mod scanner;

pub use aggregate::{Aggregator, MergeOutcome};
pub use config::AppConfig;
pub use engine::{ScanEngine, ScanResult};
pub use error::Error;
pub use model::{FileRecord, TrackedFile};
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::ScanStats;
