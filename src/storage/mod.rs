pub mod engine;
pub mod memory;

pub use engine::QueryExecutor;
pub use memory::MemoryStore;
