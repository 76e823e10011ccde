pub mod daily;
pub mod hourly;
pub mod work_hours;

use crate::model::TrackedFile;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Which timestamp of a file an activity series is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created,
    Modified,
}

impl EventKind {
    pub fn timestamp(&self, file: &TrackedFile) -> NaiveDateTime {
        match self {
            EventKind::Created => file.created_at,
            EventKind::Modified => file.modified_at,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Modified => "modified",
        }
    }
}

/// Earliest calendar year among creation and modification times.
pub fn earliest_year<'a, I>(files: I) -> Option<i32>
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    files
        .into_iter()
        .map(|f| f.created_at.year().min(f.modified_at.year()))
        .min()
}

/// Start year for hourly reports: the requested one, else the earliest found.
pub fn resolve_start_year<'a, I>(requested: Option<i32>, files: I) -> Option<i32>
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    requested.or_else(|| earliest_year(files))
}

/// Something that can tell whether it carries any activity.
pub trait Activity {
    fn is_active(&self) -> bool;
}

impl Activity for f64 {
    fn is_active(&self) -> bool {
        *self > 0.0
    }
}

/// Splits a date-keyed series per calendar year, dropping years without activity.
pub fn split_by_year<T>(series: &BTreeMap<NaiveDate, T>) -> BTreeMap<i32, BTreeMap<NaiveDate, T>>
where
    T: Activity + Clone,
{
    let mut years: BTreeMap<i32, BTreeMap<NaiveDate, T>> = BTreeMap::new();
    for (date, value) in series {
        years
            .entry(date.year())
            .or_default()
            .insert(*date, value.clone());
    }
    years.retain(|_, days| days.values().any(Activity::is_active));
    years
}
