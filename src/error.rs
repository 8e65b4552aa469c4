//! Error taxonomy for the store.
//!
//! Read-path problems (missing key, corrupt JSON, a backend that cannot be
//! read) are handled inside [`Store::open`](crate::Store::open) by falling
//! back to an empty object, so they never appear here. Write-path problems
//! do: losing a persisted write silently would leave the owning application
//! believing state was saved when it was not.

use thiserror::Error;

/// Errors raised by a [`StorageBackend`](crate::StorageBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Filesystem read or write failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the operation (quota exceeded, storage
    /// disabled, permissions).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`Store`](crate::Store) write operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the write. The in-memory object was already
    /// mutated; the persisted copy is now stale.
    #[error("backend write failed: {0}")]
    Backend(#[from] BackendError),

    /// The in-memory object could not be serialized to JSON.
    #[error("could not serialize stored fields: {0}")]
    Serialize(#[from] serde_json::Error),
}
