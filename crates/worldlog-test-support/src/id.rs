//! Test id generator — deterministic `IdGenerator` implementation for tests.

use uuid::Uuid;
use worldlog_core::id::IdGenerator;

/// An id generator that counts upwards from a starting value, so the n-th
/// generated id is `Uuid::from_u128(start + n)`.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next: u128,
}

impl SequenceIdGenerator {
    /// Create a generator whose first id is `Uuid::from_u128(start)`.
    #[must_use]
    pub fn starting_at(start: u128) -> Self {
        Self { next: start }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next);
        self.next += 1;
        id
    }
}
