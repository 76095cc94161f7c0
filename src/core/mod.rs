pub mod error;
pub mod value;

pub use error::{RecordError, Result};
pub use value::{Predicate, Row, Value};
