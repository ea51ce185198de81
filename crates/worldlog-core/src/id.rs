//! Identifier generation abstraction.
//!
//! In production, identifiers are random 128-bit UUIDs. In tests, a
//! sequential implementation is injected so assertions can name ids up front.

use uuid::Uuid;

/// Abstraction over unique identifier generation.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier, distinct from every previously returned one.
    fn next_id(&mut self) -> Uuid;
}

/// Production generator backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}
