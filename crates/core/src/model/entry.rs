//! Stored entries and query results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One `(key, size)` pair held by a bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Unique key within its bucket; also the sort key.
    pub key: u64,
    /// Payload size; the only field `REPLACE` may change.
    pub size: u32,
}

impl Entry {
    /// Creates an entry.
    pub const fn new(key: u64, size: u32) -> Self {
        Self { key, size }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{key:{:#x},size:{:#x}}}", self.key, self.size)
    }
}

/// Result of a rank query, as produced by the model or observed on the
/// design's response port.
///
/// When `error` is set the remaining fields carry no meaning and are never
/// compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Key at the requested rank.
    pub key: u64,
    /// Size at the requested rank.
    pub size: u32,
    /// Number of entries in the bucket when the query was served.
    pub list_size: u32,
    /// The requested rank was at or beyond the bucket length.
    pub error: bool,
}

impl QueryResult {
    /// Successful result for `entry` in a bucket of `list_size` entries.
    pub const fn hit(entry: Entry, list_size: u32) -> Self {
        Self {
            key: entry.key,
            size: entry.size,
            list_size,
            error: false,
        }
    }

    /// Error result; payload fields are left at their idle values.
    pub const fn miss() -> Self {
        Self {
            key: 0,
            size: 0,
            list_size: 0,
            error: true,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{key:{:#x},size:{:#x},list_size:{},error:{}}}",
            self.key, self.size, self.list_size, self.error
        )
    }
}
