//! The `World` record and its progress flags.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use worldlog_core::clock::Clock;

use super::bosses::Boss;

/// Opaque world identifier.
///
/// Freshly created worlds get a UUID, but persisted collections may carry any
/// string, so the id is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(String);

impl WorldId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for WorldId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Game difficulty the world was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Classic,
    Expert,
    Master,
    Journey,
}

/// World size chosen at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldSize {
    Small,
    Medium,
    Large,
}

/// The world's evil biome. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evil {
    Corruption,
    Crimson,
}

impl Evil {
    /// The boss that only spawns in worlds with this evil.
    #[must_use]
    pub fn boss(self) -> Boss {
        match self {
            Self::Corruption => Boss::EaterOfWorlds,
            Self::Crimson => Boss::BrainOfCthulhu,
        }
    }
}

/// Progress flags recorded for a world.
///
/// Keys missing from a mapping mean "not defeated", "not available", or a
/// count of zero. Missing or `null` mappings load as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Boss key to defeated flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub defeated_bosses: BTreeMap<String, bool>,
    /// NPC key to availability flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub npcs: BTreeMap<String, bool>,
    /// Upgrade key to number consumed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub upgrades: BTreeMap<String, u32>,
}

impl Progress {
    /// Whether `boss_key` is recorded as defeated.
    #[must_use]
    pub fn is_defeated(&self, boss_key: &str) -> bool {
        self.defeated_bosses.get(boss_key).copied().unwrap_or(false)
    }

    /// Whether `npc_key` is recorded as available.
    #[must_use]
    pub fn is_available(&self, npc_key: &str) -> bool {
        self.npcs.get(npc_key).copied().unwrap_or(false)
    }

    /// How many of `upgrade_key` have been consumed.
    #[must_use]
    pub fn upgrade_count(&self, upgrade_key: &str) -> u32 {
        self.upgrades.get(upgrade_key).copied().unwrap_or(0)
    }
}

/// Deserializes an absent-or-`null` value as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One tracked save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    /// Unique identifier, assigned when the world is added to a store.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// When the world was created.
    pub created_at: DateTime<Utc>,
    /// Difficulty chosen at creation.
    pub difficulty: Difficulty,
    /// Size chosen at creation.
    pub world_size: WorldSize,
    /// Evil biome; selects which evil boss counts toward progress.
    pub evil: Evil,
    /// Recorded progress flags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: Progress,
}

/// A world that has not been added to a store yet, and so has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorld {
    /// Display name.
    pub name: String,
    /// When the world was created.
    pub created_at: DateTime<Utc>,
    /// Difficulty chosen at creation.
    pub difficulty: Difficulty,
    /// Size chosen at creation.
    pub world_size: WorldSize,
    /// Evil biome.
    pub evil: Evil,
    /// Initial progress flags.
    pub progress: Progress,
}

impl NewWorld {
    /// Describes a fresh world with no progress, stamped with `clock.now()`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        difficulty: Difficulty,
        world_size: WorldSize,
        evil: Evil,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            name: name.into(),
            created_at: clock.now(),
            difficulty,
            world_size,
            evil,
            progress: Progress::default(),
        }
    }

    /// Attaches `id`, producing a storable world.
    #[must_use]
    pub fn with_id(self, id: WorldId) -> World {
        World {
            id,
            name: self.name,
            created_at: self.created_at,
            difficulty: self.difficulty,
            world_size: self.world_size,
            evil: self.evil,
            progress: self.progress,
        }
    }
}
