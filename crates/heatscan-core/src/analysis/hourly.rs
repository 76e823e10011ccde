use super::EventKind;
use crate::model::TrackedFile;
use chrono::{Datelike, Timelike};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

/// Number of files whose event fell in each calendar hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyCounts {
    pub kind: EventKind,
    pub counts: BTreeMap<HourKey, u32>,
}

impl HourlyCounts {
    pub fn get(&self, key: &HourKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Busiest hour, used as the top of the color scale.
    pub fn max(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.counts.keys().map(|k| k.year).collect()
    }

    /// Months of `year` with at least one event; empty months are not drawn.
    pub fn months_with_data(&self, year: i32) -> BTreeSet<u32> {
        self.counts
            .keys()
            .filter(|k| k.year == year)
            .map(|k| k.month)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Counts `kind` events per year/month/day/hour, skipping events before `start_year`.
pub fn hourly_counts<'a, I>(files: I, kind: EventKind, start_year: Option<i32>) -> HourlyCounts
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    let mut counts: BTreeMap<HourKey, u32> = BTreeMap::new();
    for file in files {
        let ts = kind.timestamp(file);
        if start_year.is_some_and(|start| ts.year() < start) {
            continue;
        }
        let key = HourKey {
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: ts.hour(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    HourlyCounts { kind, counts }
}
