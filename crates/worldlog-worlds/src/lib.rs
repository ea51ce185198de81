//! Worldlog — world collection store and progress calculator.
//!
//! Responsible for the saved worlds a player is tracking: which bosses are
//! defeated, which NPCs have moved in, which upgrades have been used, and
//! the completion percentages derived from them.

pub mod application;
pub mod domain;
