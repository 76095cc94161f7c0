use crate::core::{Predicate, RecordError, Result, Row, Value};
use crate::storage::engine::QueryExecutor;
use std::collections::HashMap;

/// In-memory reference store.
///
/// Rows live in per-table vectors and generated identifiers count up from 1.
/// Tables must be registered with their primary-key column before use so
/// that `insert` knows which column receives the generated id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<String, MemTable>,
}

#[derive(Debug)]
struct MemTable {
    primary_key: String,
    next_id: i64,
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table and the column its generated ids are written to
    pub fn create_table(&mut self, name: &str, primary_key: &str) -> Result<()> {
        if self.tables.contains_key(name) {
            return Err(RecordError::TableExists(name.to_string()));
        }
        self.tables.insert(
            name.to_string(),
            MemTable {
                primary_key: primary_key.to_string(),
                next_id: 1,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn row_count(&self, table: &str) -> Result<usize> {
        Ok(self.table(table)?.rows.len())
    }

    fn table(&self, name: &str) -> Result<&MemTable> {
        self.tables
            .get(name)
            .ok_or_else(|| RecordError::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| RecordError::TableNotFound(name.to_string()))
    }
}

fn matches(row: &Row, predicate: &Predicate) -> bool {
    predicate
        .iter()
        .all(|(column, expected)| row.get(column) == Some(expected))
}

impl QueryExecutor for MemoryStore {
    fn insert(&mut self, table: &str, fields: &Row) -> Result<i64> {
        let table = self.table_mut(table)?;
        let id = table.next_id;
        table.next_id += 1;

        let mut row = fields.clone();
        row.insert(table.primary_key.clone(), Value::Integer(id));
        table.rows.push(row);
        Ok(id)
    }

    fn update(&mut self, table: &str, fields: &Row, predicate: &Predicate) -> Result<usize> {
        let table = self.table_mut(table)?;
        let mut changed = 0;
        for row in &mut table.rows {
            if matches(row, predicate) {
                for (column, value) in fields {
                    row.insert(column.clone(), value.clone());
                }
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn delete(&mut self, table: &str, predicate: &Predicate) -> Result<usize> {
        let table = self.table_mut(table)?;
        let before = table.rows.len();
        table.rows.retain(|row| !matches(row, predicate));
        Ok(before - table.rows.len())
    }

    fn query(&self, table: &str, predicate: &Predicate, limit: usize) -> Result<Vec<Row>> {
        let table = self.table(table)?;
        Ok(table
            .rows
            .iter()
            .filter(|row| matches(row, predicate))
            .take(limit)
            .cloned()
            .collect())
    }
}
