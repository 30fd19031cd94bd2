//! The `revisions.txt` document model.
//!
//! Conan v2 clients discover recipe and binary revisions through small JSON
//! index files. The wire format is fixed: revision numbers are carried as
//! strings, timestamps as ISO-8601 UTC instants.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

/// One revision entry: the revision number as a string plus the timestamp
/// assigned when the index was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub revision: String,
    pub time: String,
}

impl RevisionEntry {
    /// Create an entry for a revision stamped at `at`.
    pub fn new(revision: u32, at: OffsetDateTime) -> Self {
        Self {
            revision: revision.to_string(),
            time: format_timestamp(at),
        }
    }

    /// The revision number, when the stored string parses as one.
    pub fn number(&self) -> Option<u32> {
        self.revision.parse().ok()
    }
}

/// A whole `revisions.txt` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionList {
    pub revisions: Vec<RevisionEntry>,
}

impl RevisionList {
    /// Parse an index document from its JSON bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| Error::InvalidIndex(format!("malformed revisions document: {e}")))
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::InvalidIndex(format!("unserializable revisions document: {e}")))
    }

    /// Revision numbers in file order, skipping entries whose stored string
    /// does not parse as a non-negative integer.
    pub fn numbers(&self) -> Vec<u32> {
        self.revisions.iter().filter_map(|e| e.number()).collect()
    }

    /// The entry with the highest numeric revision.
    pub fn latest(&self) -> Option<&RevisionEntry> {
        self.revisions
            .iter()
            .filter(|e| e.number().is_some())
            .max_by_key(|e| e.number())
    }
}

/// Render a timestamp the way Conan index files expect: ISO-8601 UTC with
/// millisecond precision (`YYYY-MM-DDTHH:MM:SS.sssZ`).
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let utc = at.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        utc.year(),
        utc.month() as u8,
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        utc.millisecond()
    )
}
