//! Progress queries for the world store.
//!
//! Pure functions that turn a world's recorded flags into completion
//! percentages. Nothing here touches storage.

use serde::Serialize;

use crate::domain::bosses::{Boss, COMMON_PRE_HARDMODE, HARDMODE, LATE_PRE_HARDMODE};
use crate::domain::world::{Evil, World, WorldId};

/// Number of NPCs that can move into a world.
///
/// Not derived from any NPC catalogue; keep in step with the set of NPC keys
/// the UI offers.
pub const TOTAL_NPCS: usize = 25;

/// Number of bosses counted toward boss progress in any single world.
pub const TOTAL_BOSSES: usize =
    COMMON_PRE_HARDMODE.len() + 1 + LATE_PRE_HARDMODE.len() + HARDMODE.len();

/// The bosses that count toward progress in a world with the given evil.
pub fn scoring_bosses(evil: Evil) -> impl Iterator<Item = Boss> {
    COMMON_PRE_HARDMODE
        .into_iter()
        .chain(std::iter::once(evil.boss()))
        .chain(LATE_PRE_HARDMODE)
        .chain(HARDMODE)
}

/// Number of scoring bosses the world has defeated.
#[must_use]
pub fn defeated_boss_count(world: &World) -> usize {
    scoring_bosses(world.evil)
        .filter(|boss| world.progress.is_defeated(boss.key()))
        .count()
}

/// Percentage of the world's scoring bosses that are defeated, `0..=100`.
///
/// The other evil's boss is ignored, so the denominator is always
/// [`TOTAL_BOSSES`].
#[must_use]
pub fn calculate_boss_progress(world: &World) -> u32 {
    percentage(defeated_boss_count(world), TOTAL_BOSSES)
}

/// Percentage of [`TOTAL_NPCS`] that are marked available.
///
/// Counts every `true` entry in the NPC mapping without checking its key, so
/// a mapping with more than `TOTAL_NPCS` true entries scores above 100.
#[must_use]
pub fn calculate_npc_progress(world: &World) -> u32 {
    let available = world.progress.npcs.values().filter(|&&flag| flag).count();
    percentage(available, TOTAL_NPCS)
}

/// `numerator / denominator * 100`, rounded half up.
fn percentage(numerator: usize, denominator: usize) -> u32 {
    let scaled = numerator
        .saturating_mul(200)
        .saturating_add(denominator)
        / (2 * denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Read-only progress view of a single world, for rendering progress bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    /// The world identifier.
    pub world_id: WorldId,
    /// Boss progress percentage.
    pub bosses: u32,
    /// NPC progress percentage.
    pub npcs: u32,
    /// Scoring bosses defeated.
    pub defeated_bosses: usize,
    /// Scoring bosses in total.
    pub total_bosses: usize,
    /// Whether the Wall of Flesh has been defeated.
    pub hardmode_unlocked: bool,
}

impl ProgressSummary {
    /// Builds the summary for `world`.
    #[must_use]
    pub fn of(world: &World) -> Self {
        Self {
            world_id: world.id.clone(),
            bosses: calculate_boss_progress(world),
            npcs: calculate_npc_progress(world),
            defeated_bosses: defeated_boss_count(world),
            total_bosses: TOTAL_BOSSES,
            hardmode_unlocked: world.progress.is_defeated(Boss::WallOfFlesh.key()),
        }
    }
}
