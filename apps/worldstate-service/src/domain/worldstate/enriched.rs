//! Enriched records.
//!
//! Fully resolved counterparts of the [`super::raw`] records. Every internal
//! identifier is paired with its display string and every derived
//! classification is computed. Records are immutable once built and are
//! what consumers of a snapshot see.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::tiers::{ChallengeCadence, CircuitTier, ConquestKind, RelicTier};

/// An internal identifier together with its resolved display string.
///
/// When resolution misses, `display` equals `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Localized {
    /// Identifier exactly as the feed carried it.
    pub id: String,
    /// Human-readable value.
    pub display: String,
}

impl Localized {
    /// Pair an identifier with its display string.
    #[must_use]
    pub fn new(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
        }
    }

    /// An identifier that resolved to itself.
    #[must_use]
    pub fn unresolved(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display: id.clone(),
            id,
        }
    }

    /// Whether a display string other than the identifier was found.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.id != self.display
    }
}

/// Item with a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedItem {
    /// Item.
    pub item: Localized,
    /// Quantity.
    pub quantity: NonZeroU32,
}

/// Reward breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reward {
    /// Credits.
    pub credits: u64,
    /// Affinity.
    pub xp: u64,
    /// Single items.
    pub items: Vec<Localized>,
    /// Items with quantities.
    pub counted_items: Vec<CountedItem>,
}

impl Reward {
    /// True when the reward grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credits == 0 && self.xp == 0 && self.items.is_empty() && self.counted_items.is_empty()
    }
}

/// Mission details of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mission {
    /// Node.
    pub location: Localized,
    /// Mission type.
    pub mission_type: Localized,
    /// Enemy faction.
    pub faction: Localized,
    /// Reward.
    pub reward: Reward,
    /// Difficulty rating.
    pub difficulty: u32,
    /// Minimum enemy level.
    pub min_enemy_level: u32,
    /// Maximum enemy level.
    pub max_enemy_level: u32,
    /// Wave count.
    pub max_waves: u32,
    /// Level override path.
    pub level_override: Option<String>,
    /// Enemy spec path.
    pub enemy_spec: Option<String>,
    /// Description text.
    pub description: Option<Localized>,
}

/// Alert mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Alert tag.
    pub tag: String,
    /// Mission.
    pub mission: Mission,
    /// Ignores mastery locks.
    pub force_unlock: bool,
}

/// Void fissure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fissure {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Node.
    pub node: Localized,
    /// Mission type.
    pub mission_type: Localized,
    /// Relic tier.
    pub tier: RelicTier,
    /// Numeric relic tier level.
    pub tier_level: Option<u8>,
    /// Steel Path variant.
    pub steel_path: bool,
    /// Region index.
    pub region: u32,
    /// Seed.
    pub seed: u64,
}

/// Item offered by a void trader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraderOffer {
    /// Item.
    pub item: Localized,
    /// Ducat price.
    pub ducats: u32,
    /// Credit price.
    pub credits: u64,
    /// Purchase limit, zero meaning unlimited.
    pub limit: u32,
}

/// Void trader visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoidTrader {
    /// Arrival.
    pub activation: DateTime<Utc>,
    /// Departure.
    pub expiry: DateTime<Utc>,
    /// Trader name.
    pub character: String,
    /// Relay.
    pub node: Localized,
    /// Items on offer.
    pub manifest: Vec<TraderOffer>,
}

/// Daily deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDeal {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Item on sale.
    pub item: Localized,
    /// Discount percentage.
    pub discount: u32,
    /// Original price.
    pub original_price: u32,
    /// Sale price.
    pub sale_price: u32,
    /// Stock.
    pub total: u32,
    /// Sold so far.
    pub sold: u32,
}

/// Seasonal challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Challenge title.
    pub title: Localized,
    /// Rotation cadence.
    pub cadence: ChallengeCadence,
    /// Standing awarded.
    pub standing: u32,
}

/// Seasonal challenge season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nightwave {
    /// Season start.
    pub activation: DateTime<Utc>,
    /// Season end.
    pub expiry: DateTime<Utc>,
    /// Syndicate tag.
    pub tag: String,
    /// Season number.
    pub season: u32,
    /// Phase number.
    pub phase: u32,
    /// Opaque parameters.
    pub params: String,
    /// Active challenges, in feed order.
    pub challenges: Vec<Challenge>,
}

/// One node and mission type pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HuntMission {
    /// Node.
    pub node: Localized,
    /// Mission type.
    pub mission_type: Localized,
}

/// Weekly archon hunt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchonHunt {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Boss.
    pub boss: Localized,
    /// Reward table path.
    pub reward_pool: String,
    /// Missions in order.
    pub missions: Vec<HuntMission>,
}

/// One stage of a sortie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortieVariant {
    /// Node.
    pub node: Localized,
    /// Mission type.
    pub mission_type: Localized,
    /// Condition modifier.
    pub modifier: Localized,
    /// Tileset.
    pub tileset: String,
}

/// Daily sortie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sortie {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Boss.
    pub boss: Localized,
    /// Reward table path.
    pub reward_pool: String,
    /// Stages in order.
    pub variants: Vec<SortieVariant>,
}

/// Faction invasion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invasion {
    /// Start, when known.
    pub activation: Option<DateTime<Utc>>,
    /// Node.
    pub node: Localized,
    /// Attacking faction.
    pub attacker: Localized,
    /// Defending faction.
    pub defender: Localized,
    /// Description.
    pub description: Localized,
    /// Signed progress.
    pub count: i64,
    /// Progress goal.
    pub goal: i64,
    /// Over.
    pub completed: bool,
    /// Reward for siding with the attacker.
    pub attacker_reward: Reward,
    /// Reward for siding with the defender.
    pub defender_reward: Reward,
}

/// Event message in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMessage {
    /// Language code.
    pub language_code: String,
    /// Message.
    pub message: Localized,
}

/// Event link in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLink {
    /// Language code.
    pub language_code: String,
    /// URL.
    pub link: String,
}

/// News or community event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Messages.
    pub messages: Vec<EventMessage>,
    /// Links.
    pub links: Vec<EventLink>,
    /// Primary link.
    pub prop: String,
    /// Icon path.
    pub icon: String,
    /// Banner image.
    pub image_url: Option<String>,
    /// Pinned.
    pub priority: bool,
    /// Mobile only.
    pub mobile_only: bool,
    /// Community-sourced.
    pub community: bool,
    /// Publication date.
    pub date: Option<DateTime<Utc>>,
    /// Event start.
    pub start: Option<DateTime<Utc>>,
    /// Event end.
    pub end: Option<DateTime<Utc>>,
}

/// Intermediate goal threshold and its reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterimGoal {
    /// Score threshold.
    pub threshold: i64,
    /// Reward, empty when the feed lists fewer rewards than thresholds.
    pub reward: Reward,
}

/// Community goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Node, if the goal is tied to one.
    pub node: Option<Localized>,
    /// Name.
    pub name: Localized,
    /// Tooltip.
    pub tooltip: Localized,
    /// Score label.
    pub score_label: Localized,
    /// Score variable.
    pub score_var: String,
    /// Tag.
    pub tag: String,
    /// Progress count.
    pub count: i64,
    /// Target.
    pub goal: i64,
    /// Remaining health fraction.
    pub health_pct: f64,
    /// Regions.
    pub regions: Vec<u32>,
    /// Personal goal.
    pub personal: bool,
    /// Community goal.
    pub community: bool,
    /// Final reward.
    pub reward: Reward,
    /// Interim thresholds with rewards.
    pub interim: Vec<InterimGoal>,
}

/// Railjack void storm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoidStorm {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Node.
    pub node: Localized,
    /// Relic tier.
    pub tier: RelicTier,
    /// Numeric relic tier level.
    pub tier_level: Option<u8>,
}

/// Difficulty tier of a conquest mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConquestDifficulty {
    /// Difficulty code.
    pub kind: String,
    /// Deviation, camel case split.
    pub deviation: String,
    /// Risks, camel case split.
    pub risks: Vec<String>,
}

/// One conquest mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConquestMission {
    /// Faction.
    pub faction: Localized,
    /// Mission type.
    pub mission_type: Localized,
    /// Difficulty tiers.
    pub difficulties: Vec<ConquestDifficulty>,
}

/// Archimedea conquest rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conquest {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Variant.
    pub kind: ConquestKind,
    /// Missions.
    pub missions: Vec<ConquestMission>,
    /// Personal modifiers, camel case split.
    pub variables: Vec<String>,
}

/// Prime resurgence offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimeVaultTrader {
    /// Start.
    pub activation: DateTime<Utc>,
    /// End.
    pub expiry: DateTime<Utc>,
    /// Relay.
    pub node: Localized,
    /// Item.
    pub item: Localized,
    /// Rarity code.
    pub rarity: String,
    /// Vaulted.
    pub vaulted: bool,
}

/// Weekly circuit choice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    /// Which circuit.
    pub tier: CircuitTier,
    /// Choices, camel case split.
    pub choices: Vec<String>,
    /// Monday 00:00 UTC of the feed's current week.
    pub week_start: Option<DateTime<Utc>>,
    /// Start of the following week.
    pub week_end: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_display_equals_id() {
        let l = Localized::unresolved("SolNode309");
        assert_eq!(l.display, "SolNode309");
        assert!(!l.is_resolved());
        assert!(Localized::new("SolNode309", "Sedna").is_resolved());
    }

    #[test]
    fn empty_reward() {
        assert!(Reward::default().is_empty());
        let reward = Reward {
            credits: 5000,
            ..Reward::default()
        };
        assert!(!reward.is_empty());
    }
}
