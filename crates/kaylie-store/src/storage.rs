//! # Storage Backends
//!
//! The durable key-value slot the cart snapshot lives in.
//!
//! Backends store raw strings; encoding is the store's job. Two backends
//! ship with the crate:
//!
//! - [`MemoryStorage`] - `HashMap` with an optional byte quota, for tests and
//!   for sessions that should not outlive the process
//! - [`FileStorage`](crate::file::FileStorage) - one file per key under the
//!   data directory

use std::collections::HashMap;

use kaylie_core::validation::validate_storage_key;

use crate::error::{StorageError, StorageResult};

/// A string key-value store holding persisted cart snapshots.
///
/// All calls are synchronous and blocking.
pub trait CartStorage {
    /// Reads the value stored under `key`. `Ok(None)` when absent.
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `data` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, data: &str) -> StorageResult<()>;
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, data: &str) -> StorageResult<()> {
        (**self).save(key, data)
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage.
///
/// With a quota set, a `save` that would push the total stored bytes past
/// it fails with [`StorageError::QuotaExceeded`], the same way a browser's
/// localStorage rejects writes once its budget is used up.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Creates storage that holds at most `quota_bytes` bytes of values.
    pub fn with_quota(quota_bytes: usize) -> Self {
        MemoryStorage {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Builder-style insert, for seeding a test fixture.
    pub fn with_entry(mut self, key: impl Into<String>, data: impl Into<String>) -> Self {
        self.entries.insert(key.into(), data.into());
        self
    }

    /// Changes or lifts the quota. Existing entries are kept.
    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }

    /// Total bytes stored, excluding `skip_key`.
    fn used_bytes(&self, skip_key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != skip_key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        validate_storage_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &str) -> StorageResult<()> {
        validate_storage_key(key)?;

        if let Some(quota) = self.quota_bytes {
            let available = quota.saturating_sub(self.used_bytes(key));
            if data.len() > available {
                return Err(StorageError::QuotaExceeded {
                    needed: data.len(),
                    available,
                });
            }
        }

        self.entries.insert(key.to_string(), data.to_string());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load("cart").unwrap(), None);

        storage.save("cart", "[]").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("[]"));

        storage.save("cart", "[1]").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_quota_counts_other_keys_but_not_the_replaced_value() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.save("a", "12345").unwrap();

        // Replacing "a" frees its 5 bytes first
        storage.save("a", "1234567890").unwrap();

        let err = storage.save("b", "x").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 1,
                available: 0
            }
        ));
        assert_eq!(storage.load("b").unwrap(), None);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(
            storage.save("../cart", "[]"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let mut storage: Box<dyn CartStorage> = Box::new(MemoryStorage::new());
        storage.save("cart", "{}").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("{}"));
    }
}
