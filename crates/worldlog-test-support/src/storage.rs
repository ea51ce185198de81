//! Test storages — mock `KeyValueStorage` implementations for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use worldlog_core::error::DomainError;
use worldlog_core::storage::KeyValueStorage;

/// An in-memory storage that records every `set_item` call.
///
/// Clones share the same slots, so a test can hand one clone to a store and
/// keep another to inspect what was written or to reopen a second store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with `value` already present under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .slots
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Returns the current value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn item(&self, key: &str) -> Option<String> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    /// Returns a snapshot of every `(key, value)` written, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.item(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// A storage that reads as empty but rejects every write with an
/// infrastructure error. Useful for testing write-failure paths.
#[derive(Debug)]
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("quota exceeded".into()))
    }
}
