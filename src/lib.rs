pub mod bootstrap;
pub mod error;
pub mod store;

mod memory;
pub use memory::MemoryBackend;

mod file_store;
pub use file_store::FileBackend;

pub use error::{BackendError, StoreError};
pub use store::{Fields, StorageBackend, Store};
