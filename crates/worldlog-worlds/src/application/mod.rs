//! Application layer: the world collection store and progress queries.

pub mod progress;
pub mod store;
