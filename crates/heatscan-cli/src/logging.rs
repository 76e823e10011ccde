use std::env;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_TARGETS: [&str; 2] = ["heatscan", "heatscan_core"];
const DEFAULT_LOG_FILE: &str = "./logs/heatscan.log";

/// Filter directives: the variable's value when set, otherwise `level` for
/// this program's own targets only.
fn directives(var: Option<String>, level: &str) -> String {
    var.unwrap_or_else(|| {
        LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// Splits `LOG_FILE_PATH` into the directory and file name the appender wants.
fn split_log_path(path: &str) -> (&Path, &Path) {
    let path = Path::new(path);
    match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) if !dir.as_os_str().is_empty() => (dir, Path::new(name)),
        (_, Some(name)) => (Path::new("."), Path::new(name)),
        _ => split_log_path(DEFAULT_LOG_FILE),
    }
}

pub fn init_logger() -> impl Drop {
    // stdout carries progress-level messages; the file also gets per-file detail
    let stdout_filter = EnvFilter::new(directives(env::var("TRACING_LEVEL").ok(), "info"));
    let file_filter = EnvFilter::new(directives(env::var("LOG_FILE_LEVEL").ok(), "debug"));

    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (log_dir, log_name) = split_log_path(&log_file_path);

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .with_target(false)
                .without_time()
                .with_ansi(true)
                .with_filter(stdout_filter),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .init();

    debug!("Logging to stdout and {}", log_file_path);

    guard
}
