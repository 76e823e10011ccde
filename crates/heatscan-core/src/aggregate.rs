use crate::hasher::Fingerprint;
use crate::model::{FileRecord, Rejection, TrackedFile};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// What a single merge did to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First record for this fingerprint.
    Inserted,
    /// Strictly newer than the retained record, which it superseded.
    Replaced,
    /// Not newer than the retained record; discarded.
    Kept,
    Rejected(Rejection),
}

/// Deduplicated set of files keyed by content fingerprint, with a running
/// line total that always equals the sum over the retained records.
#[derive(Debug, Clone)]
pub struct Aggregator {
    files: HashMap<Fingerprint, TrackedFile>,
    total_lines: u64,
    rejected: usize,
    require_line_count: bool,
    roots: Vec<String>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// Aggregator that refuses records without a line count.
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            total_lines: 0,
            rejected: 0,
            require_line_count: true,
            roots: Vec::new(),
        }
    }

    /// Aggregator for runs that do not count lines; missing counts are 0.
    pub fn lenient_line_counts() -> Self {
        Self {
            require_line_count: false,
            ..Self::new()
        }
    }

    pub fn merge(&mut self, record: FileRecord) -> MergeOutcome {
        let file = match TrackedFile::from_record(record, self.require_line_count) {
            Ok(file) => file,
            Err(reason) => {
                self.rejected += 1;
                debug!("Rejected record: {}", reason);
                return MergeOutcome::Rejected(reason);
            }
        };

        match self.files.entry(file.fingerprint) {
            Entry::Vacant(slot) => {
                self.total_lines += file.line_count;
                slot.insert(file);
                MergeOutcome::Inserted
            }
            Entry::Occupied(mut slot) => {
                if file.modified_at > slot.get().modified_at {
                    debug!(
                        "{} supersedes {}",
                        file.path.display(),
                        slot.get().path.display()
                    );
                    self.total_lines -= slot.get().line_count;
                    self.total_lines += file.line_count;
                    slot.insert(file);
                    MergeOutcome::Replaced
                } else {
                    MergeOutcome::Kept
                }
            }
        }
    }

    /// Merges records in iteration order.
    pub fn merge_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = FileRecord>,
    {
        for record in records {
            self.merge(record);
        }
    }

    pub fn add_root(&mut self, label: impl Into<String>) {
        self.roots.push(label.into());
    }

    /// Labels of the roots that contributed, in scan order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&TrackedFile> {
        self.files.get(fingerprint)
    }

    pub fn records(&self) -> impl Iterator<Item = &TrackedFile> {
        self.files.values()
    }

    /// Retained records ordered by modification time, then path.
    pub fn sorted_records(&self) -> Vec<&TrackedFile> {
        let mut records: Vec<&TrackedFile> = self.files.values().collect();
        records.sort_by(|a, b| {
            a.modified_at
                .cmp(&b.modified_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        records
    }

    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
