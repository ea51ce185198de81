//! Durable key-value storage abstraction.

use crate::error::DomainError;

/// A local persistent key-value capability.
///
/// Each key names one slot holding a single serialized value. Implementations
/// replace the whole value on every write.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
