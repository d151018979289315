//! Snapshot aggregates.
//!
//! [`DecodedWorldState`] is the output of the schema decoder and still holds
//! raw records; [`WorldStateSnapshot`] is the enriched aggregate served to
//! consumers. Both are built once and never mutated.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::category::Category;
use super::enriched::{
    Alert, ArchonHunt, Circuit, Conquest, DailyDeal, Event, Fissure, Goal, Invasion, Nightwave,
    PrimeVaultTrader, Sortie, VoidStorm, VoidTrader,
};
use super::raw::{
    RawAlert, RawArchonHunt, RawCircuitChoice, RawConquest, RawDailyDeal, RawEvent, RawFissure,
    RawGoal, RawInvasion, RawNightwave, RawPrimeVaultTrader, RawSortie, RawVoidStorm,
    RawVoidTrader,
};

/// Document-level fields shared by decoded and enriched snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotHeader {
    /// Feed version, nondecreasing across fetches.
    pub version: u64,
    /// Build label of the game client that produced the feed.
    pub build_label: String,
    /// Mobile app version, when published.
    pub mobile_version: Option<String>,
    /// Server clock at generation time.
    pub server_time: Option<DateTime<Utc>>,
}

/// Typed but not yet localized world state.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWorldState {
    /// Document header.
    pub header: SnapshotHeader,
    /// Alerts.
    pub alerts: Vec<RawAlert>,
    /// Fissures.
    pub fissures: Vec<RawFissure>,
    /// Void traders.
    pub void_traders: Vec<RawVoidTrader>,
    /// Daily deals.
    pub daily_deals: Vec<RawDailyDeal>,
    /// Seasonal challenge season, at most one.
    pub nightwave: Vec<RawNightwave>,
    /// Archon hunts.
    pub archon_hunts: Vec<RawArchonHunt>,
    /// Sorties.
    pub sorties: Vec<RawSortie>,
    /// Invasions.
    pub invasions: Vec<RawInvasion>,
    /// Events.
    pub events: Vec<RawEvent>,
    /// Goals.
    pub goals: Vec<RawGoal>,
    /// Void storms.
    pub void_storms: Vec<RawVoidStorm>,
    /// Conquests.
    pub conquests: Vec<RawConquest>,
    /// Prime vault traders.
    pub prime_vault_traders: Vec<RawPrimeVaultTrader>,
    /// Circuit choices.
    pub circuit: Vec<RawCircuitChoice>,
}

impl DecodedWorldState {
    /// A state with the given header and every category empty.
    #[must_use]
    pub const fn empty(header: SnapshotHeader) -> Self {
        Self {
            header,
            alerts: Vec::new(),
            fissures: Vec::new(),
            void_traders: Vec::new(),
            daily_deals: Vec::new(),
            nightwave: Vec::new(),
            archon_hunts: Vec::new(),
            sorties: Vec::new(),
            invasions: Vec::new(),
            events: Vec::new(),
            goals: Vec::new(),
            void_storms: Vec::new(),
            conquests: Vec::new(),
            prime_vault_traders: Vec::new(),
            circuit: Vec::new(),
        }
    }

    /// Number of records held for a category.
    #[must_use]
    pub const fn len_of(&self, category: Category) -> usize {
        match category {
            Category::Alerts => self.alerts.len(),
            Category::Fissures => self.fissures.len(),
            Category::VoidTraders => self.void_traders.len(),
            Category::DailyDeals => self.daily_deals.len(),
            Category::Nightwave => self.nightwave.len(),
            Category::ArchonHunts => self.archon_hunts.len(),
            Category::Sorties => self.sorties.len(),
            Category::Invasions => self.invasions.len(),
            Category::Events => self.events.len(),
            Category::Goals => self.goals.len(),
            Category::VoidStorms => self.void_storms.len(),
            Category::Conquests => self.conquests.len(),
            Category::PrimeVaultTraders => self.prime_vault_traders.len(),
            Category::Circuit => self.circuit.len(),
        }
    }

    /// Total records across every category.
    #[must_use]
    pub fn total_records(&self) -> usize {
        Category::ALL.iter().map(|&c| self.len_of(c)).sum()
    }
}

/// Fully decoded and localized world state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldStateSnapshot {
    /// Document header.
    #[serde(flatten)]
    pub header: SnapshotHeader,
    /// Alerts.
    pub alerts: Vec<Alert>,
    /// Fissures.
    pub fissures: Vec<Fissure>,
    /// Void traders.
    pub void_traders: Vec<VoidTrader>,
    /// Daily deals.
    pub daily_deals: Vec<DailyDeal>,
    /// Seasonal challenge season, at most one.
    pub nightwave: Vec<Nightwave>,
    /// Archon hunts.
    pub archon_hunts: Vec<ArchonHunt>,
    /// Sorties.
    pub sorties: Vec<Sortie>,
    /// Invasions.
    pub invasions: Vec<Invasion>,
    /// Events.
    pub events: Vec<Event>,
    /// Goals.
    pub goals: Vec<Goal>,
    /// Void storms.
    pub void_storms: Vec<VoidStorm>,
    /// Conquests.
    pub conquests: Vec<Conquest>,
    /// Prime vault traders.
    pub prime_vault_traders: Vec<PrimeVaultTrader>,
    /// Circuit choices.
    pub circuit: Vec<Circuit>,
}

impl WorldStateSnapshot {
    /// Feed version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.header.version
    }

    /// Number of records held for a category.
    #[must_use]
    pub const fn len_of(&self, category: Category) -> usize {
        match category {
            Category::Alerts => self.alerts.len(),
            Category::Fissures => self.fissures.len(),
            Category::VoidTraders => self.void_traders.len(),
            Category::DailyDeals => self.daily_deals.len(),
            Category::Nightwave => self.nightwave.len(),
            Category::ArchonHunts => self.archon_hunts.len(),
            Category::Sorties => self.sorties.len(),
            Category::Invasions => self.invasions.len(),
            Category::Events => self.events.len(),
            Category::Goals => self.goals.len(),
            Category::VoidStorms => self.void_storms.len(),
            Category::Conquests => self.conquests.len(),
            Category::PrimeVaultTraders => self.prime_vault_traders.len(),
            Category::Circuit => self.circuit.len(),
        }
    }

    /// Total records across every category.
    #[must_use]
    pub fn total_records(&self) -> usize {
        Category::ALL.iter().map(|&c| self.len_of(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> SnapshotHeader {
        SnapshotHeader {
            version: 12,
            build_label: "2025.10.14.12.01/abc".into(),
            mobile_version: None,
            server_time: None,
        }
    }

    #[test]
    fn empty_state_has_no_records() {
        let state = DecodedWorldState::empty(header());
        for category in Category::ALL {
            assert_eq!(state.len_of(category), 0);
        }
        assert_eq!(state.total_records(), 0);
    }

    #[test]
    fn header_is_flattened_into_snapshot_json() {
        let snapshot = WorldStateSnapshot {
            header: header(),
            alerts: vec![],
            fissures: vec![],
            void_traders: vec![],
            daily_deals: vec![],
            nightwave: vec![],
            archon_hunts: vec![],
            sorties: vec![],
            invasions: vec![],
            events: vec![],
            goals: vec![],
            void_storms: vec![],
            conquests: vec![],
            prime_vault_traders: vec![],
            circuit: vec![],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["version"], 12);
        assert_eq!(json["build_label"], "2025.10.14.12.01/abc");
        assert!(json["alerts"].as_array().unwrap().is_empty());
        assert_eq!(snapshot.total_records(), 0);
    }
}
