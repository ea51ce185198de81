//! Shared test mocks and utilities for the Worldlog progress tracker.

mod clock;
mod id;
mod storage;
mod tracing;

pub use clock::FixedClock;
pub use id::SequenceIdGenerator;
pub use storage::{FailingStorage, MemoryStorage};
pub use tracing::init_tracing;
