//! Worldlog Core — shared abstractions.
//!
//! This crate defines the traits and error type that the world store and
//! its storage backends depend on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod id;
pub mod storage;
