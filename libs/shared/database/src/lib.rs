pub mod memory;

pub use memory::{MemTable, StorageError};
