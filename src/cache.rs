use crate::core::{Row, Value};
use std::collections::HashMap;

/// Snapshot of one populated record, captured before normalization ran, so
/// cached entries hold the raw stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRecord {
    pub fields: Row,
    pub loaded: bool,
    pub id: Value,
}

/// Per-table record cache keyed by primary-key value.
///
/// First write wins and nothing is ever evicted or removed; entries live as
/// long as the owning [`Session`](crate::session::Session). Entries are
/// never handed out by reference: reads and writes both deep-copy, so a
/// cached snapshot and a live record can never share mutable state.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: HashMap<(String, i64), CachedRecord>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure lookup; the caller gets an independent deep copy
    pub fn get(&self, table: &str, id: i64) -> Option<CachedRecord> {
        self.entries.get(&(table.to_string(), id)).cloned()
    }

    /// First write wins; a later put for the same key is ignored
    pub fn put(&mut self, table: &str, id: i64, entry: CachedRecord) {
        self.entries.entry((table.to_string(), id)).or_insert(entry);
    }

    pub fn contains(&self, table: &str, id: i64) -> bool {
        self.entries.contains_key(&(table.to_string(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
