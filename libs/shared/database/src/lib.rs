pub mod error;
pub mod memory;
pub mod storage;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use storage::Storage;
