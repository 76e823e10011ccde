use crate::hasher::Fingerprint;
use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;

/// A file as observed by the scanner. Any field may be missing when the
/// record comes from an untrusted source.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub fingerprint: Option<Fingerprint>,
    pub path: PathBuf,
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
    pub line_count: Option<u64>,
}

/// A validated record, as held inside the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedFile {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
    pub line_count: u64,
}

/// Why a record was refused at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFingerprint,
    MissingCreated,
    MissingModified,
    MissingLineCount,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self {
            Rejection::MissingFingerprint => "fingerprint",
            Rejection::MissingCreated => "creation time",
            Rejection::MissingModified => "modification time",
            Rejection::MissingLineCount => "line count",
        };
        write!(f, "missing {}", field)
    }
}

impl TrackedFile {
    /// Validates `record`. A missing line count becomes 0 unless `require_line_count`.
    pub fn from_record(record: FileRecord, require_line_count: bool) -> Result<Self, Rejection> {
        let fingerprint = record.fingerprint.ok_or(Rejection::MissingFingerprint)?;
        let modified_at = record.modified_at.ok_or(Rejection::MissingModified)?;
        let created_at = record.created_at.ok_or(Rejection::MissingCreated)?;
        let line_count = match record.line_count {
            Some(count) => count,
            None if require_line_count => return Err(Rejection::MissingLineCount),
            None => 0,
        };

        Ok(Self {
            fingerprint,
            path: record.path,
            created_at,
            modified_at,
            line_count,
        })
    }
}

impl TryFrom<FileRecord> for TrackedFile {
    type Error = Rejection;

    fn try_from(record: FileRecord) -> Result<Self, Self::Error> {
        Self::from_record(record, true)
    }
}
