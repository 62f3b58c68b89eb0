//! # Store Error Types
//!
//! Error types for storage backends and the cart store.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / quota / bad key                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module)                                            │
//! │       │                                                                 │
//! │       ├── during open ─────────► StoreError::Storage (returned)        │
//! │       │                                                                 │
//! │       └── during persist ──────► logged + last_persist_error()         │
//! │                                  (the mutation still succeeds)         │
//! │                                                                         │
//! │  CoreError (kaylie-core) ──────► returned from mutations unchanged     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kaylie_core::{CoreError, SnapshotError, ValidationError};
use thiserror::Error;

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    ///
    /// ## When This Occurs
    /// - Data directory not writable
    /// - Disk full
    /// - Snapshot file replaced by a directory
    #[error("Storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused a write that would exceed its size limit.
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// The key is not usable as a storage slot name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(#[from] ValidationError),

    /// The snapshot could not be serialized.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(#[from] SnapshotError),

    /// No platform data directory and none configured.
    #[error("Could not determine a data directory")]
    NoDataDir,
}

impl StorageError {
    /// Creates an Io error for the given key.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            key: key.into(),
            source,
        }
    }
}

/// Errors surfaced to callers that both open storage and mutate the cart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Cart(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for store-level operations.
pub type StoreResult<T> = Result<T, StoreError>;
