//! Boss catalogue and the groups used for progress scoring.

use std::fmt;

/// Every boss whose defeat is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boss {
    KingSlime,
    EyeOfCthulhu,
    EaterOfWorlds,
    BrainOfCthulhu,
    QueenBee,
    Skeletron,
    Deerclops,
    WallOfFlesh,
    QueenSlime,
    TheTwins,
    TheDestroyer,
    SkeletronPrime,
    Plantera,
    Golem,
    EmpressOfLight,
    DukeFishron,
    LunaticCultist,
    MoonLord,
}

/// Pre-hardmode bosses every world can fight first.
pub const COMMON_PRE_HARDMODE: [Boss; 2] = [Boss::KingSlime, Boss::EyeOfCthulhu];

/// Pre-hardmode bosses after the evil boss, ending with the hardmode gate.
pub const LATE_PRE_HARDMODE: [Boss; 4] = [
    Boss::QueenBee,
    Boss::Skeletron,
    Boss::Deerclops,
    Boss::WallOfFlesh,
];

/// Bosses available once the Wall of Flesh falls.
pub const HARDMODE: [Boss; 10] = [
    Boss::QueenSlime,
    Boss::TheDestroyer,
    Boss::TheTwins,
    Boss::SkeletronPrime,
    Boss::Plantera,
    Boss::Golem,
    Boss::DukeFishron,
    Boss::EmpressOfLight,
    Boss::LunaticCultist,
    Boss::MoonLord,
];

impl Boss {
    /// All bosses in catalogue order.
    pub const ALL: [Boss; 18] = [
        Boss::KingSlime,
        Boss::EyeOfCthulhu,
        Boss::EaterOfWorlds,
        Boss::BrainOfCthulhu,
        Boss::QueenBee,
        Boss::Skeletron,
        Boss::Deerclops,
        Boss::WallOfFlesh,
        Boss::QueenSlime,
        Boss::TheTwins,
        Boss::TheDestroyer,
        Boss::SkeletronPrime,
        Boss::Plantera,
        Boss::Golem,
        Boss::EmpressOfLight,
        Boss::DukeFishron,
        Boss::LunaticCultist,
        Boss::MoonLord,
    ];

    /// Key used in `Progress::defeated_bosses`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::KingSlime => "kingSlime",
            Self::EyeOfCthulhu => "eyeOfCthulhu",
            Self::EaterOfWorlds => "eaterOfWorlds",
            Self::BrainOfCthulhu => "brainOfCthulhu",
            Self::QueenBee => "queenBee",
            Self::Skeletron => "skeletron",
            Self::Deerclops => "deerclops",
            Self::WallOfFlesh => "wallOfFlesh",
            Self::QueenSlime => "queenSlime",
            Self::TheTwins => "theTwins",
            Self::TheDestroyer => "theDestroyer",
            Self::SkeletronPrime => "skeletronPrime",
            Self::Plantera => "plantera",
            Self::Golem => "golem",
            Self::EmpressOfLight => "empressOfLight",
            Self::DukeFishron => "dukeFishron",
            Self::LunaticCultist => "lunaticCultist",
            Self::MoonLord => "moonLord",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::KingSlime => "King Slime",
            Self::EyeOfCthulhu => "Eye of Cthulhu",
            Self::EaterOfWorlds => "Eater of Worlds",
            Self::BrainOfCthulhu => "Brain of Cthulhu",
            Self::QueenBee => "Queen Bee",
            Self::Skeletron => "Skeletron",
            Self::Deerclops => "Deerclops",
            Self::WallOfFlesh => "Wall of Flesh",
            Self::QueenSlime => "Queen Slime",
            Self::TheTwins => "The Twins",
            Self::TheDestroyer => "The Destroyer",
            Self::SkeletronPrime => "Skeletron Prime",
            Self::Plantera => "Plantera",
            Self::Golem => "Golem",
            Self::EmpressOfLight => "Empress of Light",
            Self::DukeFishron => "Duke Fishron",
            Self::LunaticCultist => "Lunatic Cultist",
            Self::MoonLord => "Moon Lord",
        }
    }

    /// Parses a progress key back into a boss.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|boss| boss.key() == key)
    }

    /// Whether the boss only appears after the Wall of Flesh.
    #[must_use]
    pub fn is_hardmode(self) -> bool {
        HARDMODE.contains(&self)
    }
}

impl fmt::Display for Boss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
