//! Domain model for tracked worlds.

pub mod bosses;
pub mod world;
