use super::Activity;
use crate::model::TrackedFile;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Files created and modified on one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyActivity {
    pub created: u32,
    pub modified: u32,
}

/// Lines of code attributed to one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyLoc {
    pub created_loc: u64,
    pub modified_loc: u64,
}

impl Activity for DailyActivity {
    fn is_active(&self) -> bool {
        self.created > 0 || self.modified > 0
    }
}

impl Activity for DailyLoc {
    fn is_active(&self) -> bool {
        self.created_loc > 0 || self.modified_loc > 0
    }
}

/// Per-date counts of retained files by creation date and by modification date.
/// Dates with only one kind of event get 0 for the other.
pub fn daily_activity<'a, I>(files: I) -> BTreeMap<NaiveDate, DailyActivity>
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    let mut days: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();
    for file in files {
        days.entry(file.created_at.date()).or_default().created += 1;
        days.entry(file.modified_at.date()).or_default().modified += 1;
    }
    days
}

/// Per-date line sums by creation date and by modification date.
///
/// `modified_loc` is the full current size of files modified that day, not a
/// delta. A file created and modified on the same date only counts towards
/// `created_loc` for that date.
pub fn daily_loc<'a, I>(files: I) -> BTreeMap<NaiveDate, DailyLoc>
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    let mut days: BTreeMap<NaiveDate, DailyLoc> = BTreeMap::new();
    for file in files {
        let created = file.created_at.date();
        let modified = file.modified_at.date();
        days.entry(created).or_default().created_loc += file.line_count;
        let modified_day = days.entry(modified).or_default();
        if created != modified {
            modified_day.modified_loc += file.line_count;
        }
    }
    days
}
