//! Feed categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named collection of the world state feed.
///
/// Each category is decoded and enriched independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Time-boxed alert missions.
    Alerts,
    /// Void fissure missions.
    Fissures,
    /// Recurring void trader visits.
    VoidTraders,
    /// Daily discounted store item.
    DailyDeals,
    /// Seasonal challenge season.
    Nightwave,
    /// Weekly archon hunt.
    ArchonHunts,
    /// Daily sortie.
    Sorties,
    /// Faction invasions.
    Invasions,
    /// News and community events.
    Events,
    /// Community goals.
    Goals,
    /// Railjack void storms.
    VoidStorms,
    /// Archimedea conquest rotations.
    Conquests,
    /// Prime resurgence traders.
    PrimeVaultTraders,
    /// Weekly circuit choices.
    Circuit,
}

impl Category {
    /// Every category, in snapshot order.
    pub const ALL: [Self; 14] = [
        Self::Alerts,
        Self::Fissures,
        Self::VoidTraders,
        Self::DailyDeals,
        Self::Nightwave,
        Self::ArchonHunts,
        Self::Sorties,
        Self::Invasions,
        Self::Events,
        Self::Goals,
        Self::VoidStorms,
        Self::Conquests,
        Self::PrimeVaultTraders,
        Self::Circuit,
    ];

    /// Top-level key of this collection in the feed document.
    #[must_use]
    pub const fn feed_key(self) -> &'static str {
        match self {
            Self::Alerts => "Alerts",
            Self::Fissures => "ActiveMissions",
            Self::VoidTraders => "VoidTraders",
            Self::DailyDeals => "DailyDeals",
            Self::Nightwave => "SeasonInfo",
            Self::ArchonHunts => "LiteSorties",
            Self::Sorties => "Sorties",
            Self::Invasions => "Invasions",
            Self::Events => "Events",
            Self::Goals => "Goals",
            Self::VoidStorms => "VoidStorms",
            Self::Conquests => "Conquests",
            Self::PrimeVaultTraders => "PrimeVaultTraders",
            Self::Circuit => "EndlessXpChoices",
        }
    }

    /// Stable snake-case name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alerts => "alerts",
            Self::Fissures => "fissures",
            Self::VoidTraders => "void_traders",
            Self::DailyDeals => "daily_deals",
            Self::Nightwave => "nightwave",
            Self::ArchonHunts => "archon_hunts",
            Self::Sorties => "sorties",
            Self::Invasions => "invasions",
            Self::Events => "events",
            Self::Goals => "goals",
            Self::VoidStorms => "void_storms",
            Self::Conquests => "conquests",
            Self::PrimeVaultTraders => "prime_vault_traders",
            Self::Circuit => "circuit",
        }
    }

    /// Whether the feed carries this collection as a single object
    /// rather than an array.
    #[must_use]
    pub const fn is_singular(self) -> bool {
        matches!(self, Self::Nightwave)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
