use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, NaiveDateTime};
use tempfile::tempdir;

use heatscan_core::analysis::{daily, hourly, work_hours, EventKind};
use heatscan_core::hasher::hash_data;
use heatscan_core::report::ReportWriter;
use heatscan_core::{AppConfig, ScanEngine, SilentReporter};

const DAY: u64 = 24 * 60 * 60;
// 2024-03-01T12:00:00Z
const BASE: u64 = 1_709_294_400;

fn day(n: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(BASE + (n - 1) * DAY)
}

fn local(t: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(t).naive_local()
}

fn write_file(path: &Path, content: &str, modified: SystemTime) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    let f = fs::File::options().write(true).open(path).unwrap();
    f.set_modified(modified).unwrap();
}

fn config_for(roots: &[&Path]) -> AppConfig {
    AppConfig::with_roots(roots.iter().map(|r| r.to_string_lossy().into_owned()))
}

#[test]
fn test_newer_duplicate_in_second_root_wins() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    write_file(&a.join("x.py"), "print(1)\n", day(1));
    write_file(&b.join("x.py"), "print(1)\n", day(5));

    let result = ScanEngine::new(config_for(&[&a, &b]))
        .scan(&SilentReporter)
        .unwrap();

    assert_eq!(result.unique_files(), 1);
    assert_eq!(result.total_lines(), 1);
    let kept = result.aggregate.get(&hash_data(b"print(1)\n")).unwrap();
    assert_eq!(kept.modified_at, local(day(5)));
    assert_eq!(kept.path, b.join("x.py"));
    assert_eq!(kept.line_count, 1);
    assert_eq!(result.aggregate.roots(), &["A".to_string(), "B".to_string()]);
}

#[test]
fn test_older_duplicate_in_second_root_is_ignored() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    write_file(&a.join("x.py"), "print(1)\nprint(2)\n", day(5));
    write_file(&b.join("copy_of_x.py"), "print(1)\nprint(2)\n", day(1));

    let result = ScanEngine::new(config_for(&[&a, &b]))
        .scan(&SilentReporter)
        .unwrap();

    assert_eq!(result.unique_files(), 1);
    assert_eq!(result.total_lines(), 2);
    let kept = result.aggregate.records().next().unwrap();
    assert_eq!(kept.path, a.join("x.py"));
}

#[test]
fn test_distinct_files_both_survive() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("one.py"), "a = 1\n", day(2));
    write_file(&root.join("pkg/two.py"), "b = 2\nc = 3\nd = 4\n", day(3));

    let result = ScanEngine::new(config_for(&[&root]))
        .scan(&SilentReporter)
        .unwrap();

    assert_eq!(result.unique_files(), 2);
    assert_eq!(result.total_lines(), 4);
    assert_eq!(result.stats.records, 2);
}

#[test]
fn test_rescanning_same_root_is_idempotent() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("a.py"), "a\n", day(1));
    write_file(&root.join("b.py"), "b\nb\n", day(2));
    write_file(&root.join("sub/a_again.py"), "a\n", day(3));

    let once = ScanEngine::new(config_for(&[&root]))
        .scan(&SilentReporter)
        .unwrap();
    let twice = ScanEngine::new(config_for(&[&root, &root]))
        .scan(&SilentReporter)
        .unwrap();

    assert_eq!(once.unique_files(), 2);
    assert_eq!(once.unique_files(), twice.unique_files());
    assert_eq!(once.total_lines(), twice.total_lines());
    for file in once.aggregate.records() {
        assert_eq!(twice.aggregate.get(&file.fingerprint), Some(file));
    }
}

#[test]
fn test_keep_list_overrides_ignore_list() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("tests/test_a.py"), "assert True\n", day(1));
    write_file(&root.join("node_modules/pkg/m.py"), "m\n", day(1));
    write_file(&root.join("src/Node_Modules/n.py"), "n\n", day(1));
    write_file(&root.join(".hidden/h.py"), "h\n", day(1));
    write_file(&root.join("mypkg.egg-info/e.py"), "e\n", day(1));
    write_file(&root.join("src/main.py"), "main()\n", day(1));

    let mut config = config_for(&[&root]);
    config.ignore_dirs.push("tests".to_string());

    let result = ScanEngine::new(config).scan(&SilentReporter).unwrap();

    let mut names: Vec<String> = result
        .aggregate
        .records()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["main.py", "test_a.py"]);
}

#[test]
fn test_only_matching_suffix_is_scanned() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("a.py"), "a\n", day(1));
    write_file(&root.join("a.pyc"), "junk", day(1));
    write_file(&root.join("notes.txt"), "notes\n", day(1));

    let result = ScanEngine::new(config_for(&[&root]))
        .scan(&SilentReporter)
        .unwrap();
    assert_eq!(result.unique_files(), 1);
    assert_eq!(result.stats.files_seen, 3);
    assert_eq!(result.stats.files_matched, 1);

    let mut rust_config = config_for(&[&root]);
    rust_config.extension = ".rs".to_string();
    let result = ScanEngine::new(rust_config).scan(&SilentReporter).unwrap();
    assert!(result.aggregate.is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_without_aborting() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("ok.py"), "ok\n", day(1));
    std::os::unix::fs::symlink(root.join("missing.py"), root.join("dangling.py")).unwrap();

    let result = ScanEngine::new(config_for(&[&root]))
        .scan(&SilentReporter)
        .unwrap();

    assert_eq!(result.unique_files(), 1);
    assert_eq!(result.total_lines(), 1);
    assert_eq!(result.stats.skipped_time_error, 1);
}

#[test]
fn test_missing_root_is_skipped() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("a.py"), "a\n", day(1));
    let missing = tmp.path().join("does_not_exist");

    let result = ScanEngine::new(config_for(&[&missing, &root]))
        .scan(&SilentReporter)
        .unwrap();

    assert_eq!(result.roots_scanned, 1);
    assert_eq!(result.aggregate.roots(), &["proj".to_string()]);
    assert_eq!(result.unique_files(), 1);
}

#[test]
fn test_without_line_counting() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("a.py"), "a\nb\nc\n", day(1));

    let mut config = config_for(&[&root]);
    config.count_lines = false;
    let result = ScanEngine::new(config).scan(&SilentReporter).unwrap();

    assert_eq!(result.unique_files(), 1);
    assert_eq!(result.total_lines(), 0);
    assert_eq!(result.aggregate.rejected(), 0);
}

#[test]
fn test_scan_to_reports() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("proj");
    write_file(&root.join("a.py"), "a\nb\n", day(1));
    write_file(&root.join("b.py"), "c\n", day(3));

    let result = ScanEngine::new(config_for(&[&root]))
        .scan(&SilentReporter)
        .unwrap();
    let files: Vec<_> = result.aggregate.records().collect();

    let out = tmp.path().join("out");
    let writer = ReportWriter::new(&out, "loc_charts", result.aggregate.roots()).unwrap();
    assert!(writer.label().starts_with("proj_"));

    let loc = daily::daily_loc(files.iter().copied());
    assert!(!writer.write_daily_loc(&loc).unwrap().is_empty());

    let modified = hourly::hourly_counts(files.iter().copied(), EventKind::Modified, None);
    let heatmap = writer.write_hourly(&modified).unwrap().unwrap();
    let heatmap_rows = fs::read_to_string(heatmap).unwrap().lines().count();
    assert_eq!(heatmap_rows, 1 + modified.counts.len());

    let hours = work_hours::estimated_hours(files.iter().copied());
    assert!(hours.values().any(|h| *h > 0.0));
    assert!(!writer.write_estimated_hours(&hours).unwrap().is_empty());

    let summary = writer.write_summary(&result.aggregate).unwrap().unwrap();
    let summary_rows = fs::read_to_string(summary).unwrap().lines().count();
    assert_eq!(summary_rows, 3);
}
