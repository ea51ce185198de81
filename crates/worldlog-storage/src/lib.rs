//! Worldlog Storage — durable `KeyValueStorage` backends.

pub mod file_storage;

pub use file_storage::{FileStorage, FileStorageConfig};
