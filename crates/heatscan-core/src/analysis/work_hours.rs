use crate::model::TrackedFile;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, BTreeSet};

pub const SLOTS_PER_DAY: u32 = 48;
pub const HOURS_PER_SLOT: f64 = 0.5;

/// Index of the 30-minute slot of the day containing `ts` (0..48).
pub fn slot_of(ts: &NaiveDateTime) -> u32 {
    ts.hour() * 2 + u32::from(ts.minute() >= 30)
}

/// Distinct 30-minute slots touched per date by any creation or
/// modification event.
pub fn active_slots<'a, I>(files: I) -> BTreeMap<NaiveDate, BTreeSet<u32>>
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    let mut slots: BTreeMap<NaiveDate, BTreeSet<u32>> = BTreeMap::new();
    for file in files {
        for ts in [&file.created_at, &file.modified_at] {
            slots.entry(ts.date()).or_default().insert(slot_of(ts));
        }
    }
    slots
}

/// Estimated hours worked per date: half an hour per active slot.
///
/// Every date between the first and last active date is present; idle days
/// are 0.0.
pub fn estimated_hours<'a, I>(files: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = &'a TrackedFile>,
{
    let slots = active_slots(files);
    let (Some(first), Some(last)) = (
        slots.keys().next().copied(),
        slots.keys().next_back().copied(),
    ) else {
        return BTreeMap::new();
    };

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| {
            let active = slots.get(&d).map_or(0, BTreeSet::len);
            (d, active as f64 * HOURS_PER_SLOT)
        })
        .collect()
}
