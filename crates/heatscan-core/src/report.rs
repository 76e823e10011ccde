use crate::aggregate::Aggregator;
use crate::analysis::daily::{DailyActivity, DailyLoc};
use crate::analysis::hourly::HourlyCounts;
use crate::analysis::split_by_year;
use crate::error::Error;
use crate::hasher::hash_data;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LABEL_HASH_LENGTH: usize = 8;

/// `<root>_<root>..._<hash8>`: the joined root names (spaces replaced) plus a
/// short hash of that joined name.
pub fn output_label(roots: &[String]) -> String {
    let joined = roots
        .iter()
        .map(|r| r.replace(' ', "_"))
        .collect::<Vec<_>>()
        .join("_");
    let hash = hash_data(joined.as_bytes()).short(LABEL_HASH_LENGTH);
    format!("{}_{}", joined, hash)
}

#[derive(Debug, Serialize)]
struct HourRow {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    count: u32,
}

#[derive(Debug, Serialize)]
struct ActivityRow {
    date: NaiveDate,
    created: u32,
    modified: u32,
}

#[derive(Debug, Serialize)]
struct LocRow {
    date: NaiveDate,
    created_loc: u64,
    modified_loc: u64,
}

#[derive(Debug, Serialize)]
struct HoursRow {
    date: NaiveDate,
    hours: f64,
}

#[derive(Debug, Serialize)]
struct FileRow {
    fingerprint: String,
    path: String,
    created_at: NaiveDateTime,
    modified_at: NaiveDateTime,
    line_count: u64,
}

/// Writes bucketed series as CSV under `<base_dir>/<prefix>_<label>/`.
pub struct ReportWriter {
    dir: PathBuf,
    label: String,
}

impl ReportWriter {
    pub fn new(base_dir: &Path, prefix: &str, roots: &[String]) -> Result<Self, Error> {
        let label = output_label(roots);
        let dir = base_dir.join(format!("{}_{}", prefix, label));
        fs::create_dir_all(&dir).map_err(|source| Error::Output {
            path: dir.clone(),
            source,
        })?;
        debug!("Report folder: {}", dir.display());
        Ok(Self { dir, label })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn write_hourly(&self, counts: &HourlyCounts) -> Result<Option<PathBuf>, Error> {
        if counts.is_empty() {
            info!("No {} activity in range; hourly report skipped", counts.kind.label());
            return Ok(None);
        }
        let rows = counts.counts.iter().map(|(key, count)| HourRow {
            year: key.year,
            month: key.month,
            day: key.day,
            hour: key.hour,
            count: *count,
        });
        let name = format!("heatmap_{}_{}.csv", counts.kind.label(), self.label);
        self.write_rows(&name, rows).map(Some)
    }

    /// One file per year with activity.
    pub fn write_daily_activity(
        &self,
        series: &BTreeMap<NaiveDate, DailyActivity>,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();
        for (year, days) in split_by_year(series) {
            let rows = days.into_iter().map(|(date, a)| ActivityRow {
                date,
                created: a.created,
                modified: a.modified,
            });
            written.push(self.write_rows(&format!("activity_{}_{}.csv", year, self.label), rows)?);
        }
        self.log_empty(&written, "daily activity");
        Ok(written)
    }

    pub fn write_daily_loc(
        &self,
        series: &BTreeMap<NaiveDate, DailyLoc>,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();
        for (year, days) in split_by_year(series) {
            let rows = days.into_iter().map(|(date, loc)| LocRow {
                date,
                created_loc: loc.created_loc,
                modified_loc: loc.modified_loc,
            });
            written.push(
                self.write_rows(&format!("loc_activity_{}_{}.csv", year, self.label), rows)?,
            );
        }
        self.log_empty(&written, "lines-of-code");
        Ok(written)
    }

    pub fn write_estimated_hours(
        &self,
        series: &BTreeMap<NaiveDate, f64>,
    ) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();
        for (year, days) in split_by_year(series) {
            let rows = days.into_iter().map(|(date, hours)| HoursRow { date, hours });
            written.push(self.write_rows(&format!("time_{}_{}.csv", year, self.label), rows)?);
        }
        self.log_empty(&written, "estimated hours");
        Ok(written)
    }

    /// Every retained file, oldest modification first.
    pub fn write_summary(&self, aggregate: &Aggregator) -> Result<Option<PathBuf>, Error> {
        if aggregate.is_empty() {
            info!("No files retained; summary skipped");
            return Ok(None);
        }
        let rows = aggregate.sorted_records().into_iter().map(|f| FileRow {
            fingerprint: f.fingerprint.to_hex(),
            path: f.path.display().to_string(),
            created_at: f.created_at,
            modified_at: f.modified_at,
            line_count: f.line_count,
        });
        self.write_rows(&format!("summary_{}.csv", self.label), rows)
            .map(Some)
    }

    fn write_rows<S, I>(&self, file_name: &str, rows: I) -> Result<PathBuf, Error>
    where
        S: Serialize,
        I: IntoIterator<Item = S>,
    {
        let path = self.dir.join(file_name);
        let file = File::create(&path).map_err(|source| Error::Output {
            path: path.clone(),
            source,
        })?;
        let mut wtr = csv::Writer::from_writer(file);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush().map_err(|source| Error::Output {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    fn log_empty(&self, written: &[PathBuf], what: &str) {
        if written.is_empty() {
            info!("No {} data; nothing written", what);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::daily::daily_activity;
    use crate::analysis::hourly::hourly_counts;
    use crate::analysis::test_support::*;
    use crate::analysis::EventKind;
    use tempfile::tempdir;

    #[test]
    fn test_output_label_is_stable() {
        let roots = vec!["my project".to_string(), "lib".to_string()];
        let label = output_label(&roots);
        assert!(label.starts_with("my_project_lib_"));
        assert_eq!(label.len(), "my_project_lib_".len() + 8);
        assert_eq!(label, output_label(&roots));
        assert_ne!(label, output_label(&["lib".to_string()]));
    }

    #[test]
    fn test_daily_activity_one_file_per_year() {
        let tmp = tempdir().unwrap();
        let files = vec![
            tracked("a", ts(2023, 12, 31, 9, 0), ts(2023, 12, 31, 9, 0), 1),
            tracked("b", ts(2024, 1, 2, 9, 0), ts(2024, 1, 5, 9, 0), 1),
        ];
        let writer = ReportWriter::new(tmp.path(), "activity_charts", &["proj".to_string()]).unwrap();
        let written = writer.write_daily_activity(&daily_activity(&files)).unwrap();

        assert_eq!(written.len(), 2);
        let content = fs::read_to_string(&written[1]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,created,modified");
        assert_eq!(lines[1], "2024-01-02,1,0");
        assert_eq!(lines[2], "2024-01-05,0,1");
    }

    #[test]
    fn test_empty_series_writes_nothing() {
        let tmp = tempdir().unwrap();
        let writer = ReportWriter::new(tmp.path(), "heatmap", &["proj".to_string()]).unwrap();
        let files: Vec<crate::model::TrackedFile> = Vec::new();

        assert!(writer
            .write_hourly(&hourly_counts(&files, EventKind::Created, None))
            .unwrap()
            .is_none());
        assert!(writer.write_summary(&Aggregator::new()).unwrap().is_none());
        assert_eq!(fs::read_dir(writer.dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_base_is_output_error() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = ReportWriter::new(&blocker, "heatmap", &["proj".to_string()])
            .err()
            .unwrap();
        assert!(matches!(err, Error::Output { .. }));
        assert!(err.to_string().contains("fewer root directories"));
    }
}
