use crate::core::{Predicate, Result, Row};

/// Backing-store contract - allows pluggable storage backends.
///
/// The record lifecycle only ever needs these four operations: insert with
/// a generated identifier, update/delete by equality predicate, and a
/// limited equality query. Anything richer (joins, ordering, transactions)
/// is out of scope for the record layer.
pub trait QueryExecutor {
    /// Insert a row into a table and return the generated identifier
    fn insert(&mut self, table: &str, fields: &Row) -> Result<i64>;

    /// Update every row matching the equality predicate, returning the count
    fn update(&mut self, table: &str, fields: &Row, predicate: &Predicate) -> Result<usize>;

    /// Delete every row matching the equality predicate, returning the count
    fn delete(&mut self, table: &str, predicate: &Predicate) -> Result<usize>;

    /// Fetch up to `limit` rows matching the equality predicate
    fn query(&self, table: &str, predicate: &Predicate, limit: usize) -> Result<Vec<Row>>;
}
