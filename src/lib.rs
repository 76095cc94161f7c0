// ============================================================================
// recbase - table-backed record base
// ============================================================================
//
// One generic type, `Record<E>`, that every concrete entity specializes by
// declaring its table name, primary-key column, and field list. The base
// supplies the CRUD lifecycle, a per-table cache keyed by primary key,
// lazily-activated capabilities, and populate-time field normalization.

//! # recbase
//!
//! Declare an entity once, get the full record lifecycle for free:
//!
//! ```
//! use recbase::{Entity, MemoryStore, Record, Session, Value};
//!
//! struct Customer;
//!
//! impl Entity for Customer {
//!     const TABLE: &'static str = "customers";
//!     const PRIMARY_KEY: &'static str = "customer_id";
//!     const FIELDS: &'static [&'static str] =
//!         &["customer_id", "phone", "email", "first", "last"];
//! }
//!
//! # fn main() -> recbase::Result<()> {
//! let mut store = MemoryStore::new();
//! store.create_table("customers", "customer_id")?;
//! let mut session = Session::new(store);
//!
//! let mut customer = Record::<Customer>::new();
//! customer.set("email", "A@B.COM")?;
//! customer.save(&mut session)?; // inserts, adopts the generated id
//!
//! let id = customer.get("customer_id").unwrap().as_i64().unwrap();
//! let found = Record::<Customer>::fetch(&mut session, id)?;
//! assert!(found.loaded());
//! assert_eq!(found.get("email"), Some(&Value::Text("a@b.com".into())));
//! # Ok(())
//! # }
//! ```
//!
//! The backing store is pluggable: anything implementing
//! [`QueryExecutor`] works, and [`MemoryStore`] is provided for tests and
//! small tools. [`Session`] owns the store and the record cache for one
//! logical execution context.

pub mod cache;
pub mod core;
pub mod record;
pub mod session;
pub mod storage;

// Re-export main types for convenience
pub use cache::{CachedRecord, RecordCache};
pub use core::{Predicate, RecordError, Result, Row, Value};
pub use record::{Capability, Entity, EntityDescriptor, LoadCriteria, Record};
pub use session::Session;
pub use storage::{MemoryStore, QueryExecutor};
