//! Raw decoded records.
//!
//! One struct per feed category, shaped after the upstream JSON. Identifier
//! fields still hold the opaque internal names the feed uses; the enrichment
//! pass turns these into [`super::enriched`] records. Unknown JSON keys are
//! ignored so upstream additions never break decoding.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::feed_date::FeedInstant;

/// Activation/expiry pair of a time-boxed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    /// When the record becomes active, if the feed says.
    pub activation: Option<DateTime<Utc>>,
    /// When the record expires, if the feed says.
    pub expiry: Option<DateTime<Utc>>,
}

impl ActiveWindow {
    fn new(activation: Option<FeedInstant>, expiry: Option<FeedInstant>) -> Self {
        Self {
            activation: activation.map(Into::into),
            expiry: expiry.map(Into::into),
        }
    }

    fn bounded(activation: FeedInstant, expiry: FeedInstant) -> Self {
        Self::new(Some(activation), Some(expiry))
    }

    /// `activation <= expiry` whenever both are present.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        match (self.activation, self.expiry) {
            (Some(a), Some(e)) => a <= e,
            _ => true,
        }
    }
}

/// A record type the schema decoder can produce.
pub trait RawRecord: DeserializeOwned {
    /// Every activation/expiry window carried by the record, nested ones
    /// included.
    fn windows(&self) -> Vec<ActiveWindow>;
}

// =============================================================================
// Shared shapes
// =============================================================================

/// Item identifier with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCountedItem {
    /// Internal item path.
    #[serde(rename = "ItemType")]
    pub item: String,
    /// Quantity, always positive.
    #[serde(rename = "ItemCount")]
    pub quantity: NonZeroU32,
}

/// Mission reward as the feed encodes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawReward {
    /// Credit reward.
    pub credits: u64,
    /// Affinity reward.
    pub xp: u64,
    /// Single items.
    pub items: Vec<String>,
    /// Items with quantities.
    #[serde(rename = "countedItems")]
    pub counted_items: Vec<RawCountedItem>,
}

// =============================================================================
// Alerts
// =============================================================================

/// Mission description embedded in an alert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawMissionInfo {
    /// Node identifier, e.g. `SolNode30`.
    pub location: String,
    /// Mission type code, e.g. `MT_SURVIVAL`.
    #[serde(rename = "missionType")]
    pub mission_type: String,
    /// Faction code, e.g. `FC_GRINEER`.
    pub faction: String,
    /// Reward breakdown.
    #[serde(rename = "missionReward", default)]
    pub reward: RawReward,
    /// Difficulty rating.
    #[serde(default)]
    pub difficulty: u32,
    /// Minimum enemy level.
    #[serde(rename = "minEnemyLevel", default)]
    pub min_enemy_level: u32,
    /// Maximum enemy level.
    #[serde(rename = "maxEnemyLevel", default)]
    pub max_enemy_level: u32,
    /// Wave count for wave-based missions.
    #[serde(rename = "maxWaveNum", default)]
    pub max_waves: u32,
    /// Level override path.
    #[serde(rename = "levelOverride", default)]
    pub level_override: Option<String>,
    /// Enemy spec path.
    #[serde(rename = "enemySpec", default)]
    pub enemy_spec: Option<String>,
    /// Description language tag.
    #[serde(rename = "descText", default)]
    pub desc_text: Option<String>,
}

/// Alert mission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawAlert {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Alert tag.
    #[serde(rename = "Tag", default)]
    pub tag: String,
    /// Mission details.
    #[serde(rename = "MissionInfo")]
    pub mission: RawMissionInfo,
    /// Whether the alert ignores mastery locks.
    #[serde(rename = "ForceUnlock", default)]
    pub force_unlock: bool,
}

impl RawRecord for RawAlert {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

// =============================================================================
// Fissures
// =============================================================================

/// Void fissure mission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFissure {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Region index.
    #[serde(rename = "Region", default)]
    pub region: u32,
    /// Seed.
    #[serde(rename = "Seed", default)]
    pub seed: u64,
    /// Node identifier.
    #[serde(rename = "Node")]
    pub node: String,
    /// Mission type code.
    #[serde(rename = "MissionType")]
    pub mission_type: String,
    /// Relic tier code, e.g. `VoidT6`.
    #[serde(rename = "Modifier")]
    pub modifier: String,
    /// Steel Path variant.
    #[serde(rename = "Hard", default)]
    pub hard: bool,
}

impl RawRecord for RawFissure {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

// =============================================================================
// Void traders
// =============================================================================

/// One item in a void trader manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTraderOffer {
    /// Internal store item path.
    #[serde(rename = "ItemType")]
    pub item: String,
    /// Ducat price.
    #[serde(rename = "PrimePrice", default)]
    pub ducats: u32,
    /// Credit price.
    #[serde(rename = "RegularPrice", default)]
    pub credits: u64,
    /// Purchase limit, zero meaning unlimited.
    #[serde(rename = "Limit", default)]
    pub limit: u32,
}

/// Void trader visit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawVoidTrader {
    /// Arrival.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// Departure.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Trader character name.
    #[serde(rename = "Character")]
    pub character: String,
    /// Relay node identifier.
    #[serde(rename = "Node")]
    pub node: String,
    /// Items on offer; empty until the trader arrives.
    #[serde(rename = "Manifest", default)]
    pub manifest: Vec<RawTraderOffer>,
}

impl RawRecord for RawVoidTrader {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

// =============================================================================
// Daily deals
// =============================================================================

/// Daily discounted store item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDailyDeal {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Internal store item path.
    #[serde(rename = "StoreItem")]
    pub store_item: String,
    /// Discount percentage.
    #[serde(rename = "Discount", default)]
    pub discount: u32,
    /// Undiscounted platinum price.
    #[serde(rename = "OriginalPrice", default)]
    pub original_price: u32,
    /// Discounted platinum price.
    #[serde(rename = "SalePrice", default)]
    pub sale_price: u32,
    /// Stock.
    #[serde(rename = "AmountTotal", default)]
    pub amount_total: u32,
    /// Units sold so far.
    #[serde(rename = "AmountSold", default)]
    pub amount_sold: u32,
}

impl RawRecord for RawDailyDeal {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

// =============================================================================
// Nightwave
// =============================================================================

/// Active seasonal challenge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawChallenge {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Challenge path.
    #[serde(rename = "Challenge")]
    pub challenge: String,
    /// Daily flag set by the feed on daily challenges.
    #[serde(rename = "Daily", default)]
    pub daily: bool,
}

/// Seasonal challenge season.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawNightwave {
    /// Season start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// Season end.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Syndicate tag.
    #[serde(rename = "AffiliationTag")]
    pub affiliation_tag: String,
    /// Season number.
    #[serde(rename = "Season", default)]
    pub season: u32,
    /// Phase number.
    #[serde(rename = "Phase", default)]
    pub phase: u32,
    /// Opaque parameters.
    #[serde(rename = "Params", default)]
    pub params: String,
    /// Challenges currently rotating.
    #[serde(rename = "ActiveChallenges", default)]
    pub challenges: Vec<RawChallenge>,
}

impl RawRecord for RawNightwave {
    fn windows(&self) -> Vec<ActiveWindow> {
        std::iter::once(ActiveWindow::bounded(self.activation, self.expiry))
            .chain(
                self.challenges
                    .iter()
                    .map(|c| ActiveWindow::bounded(c.activation, c.expiry)),
            )
            .collect()
    }
}

// =============================================================================
// Archon hunts and sorties
// =============================================================================

/// One stage of an archon hunt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawHuntMission {
    /// Mission type code.
    #[serde(rename = "missionType")]
    pub mission_type: String,
    /// Node identifier.
    pub node: String,
}

/// Weekly archon hunt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawArchonHunt {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Reward table path.
    #[serde(rename = "Reward", default)]
    pub reward: String,
    /// Seed.
    #[serde(rename = "Seed", default)]
    pub seed: u64,
    /// Boss code, e.g. `SORTIE_BOSS_NIRA`.
    #[serde(rename = "Boss")]
    pub boss: String,
    /// Missions in order.
    #[serde(rename = "Missions", default)]
    pub missions: Vec<RawHuntMission>,
}

impl RawRecord for RawArchonHunt {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

/// One stage of a sortie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSortieVariant {
    /// Mission type code.
    #[serde(rename = "missionType")]
    pub mission_type: String,
    /// Modifier code, e.g. `SORTIE_MODIFIER_FREEZE`.
    #[serde(rename = "modifierType")]
    pub modifier: String,
    /// Node identifier.
    pub node: String,
    /// Tileset name.
    #[serde(default)]
    pub tileset: String,
}

/// Daily sortie.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSortie {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Reward table path.
    #[serde(rename = "Reward", default)]
    pub reward: String,
    /// Seed.
    #[serde(rename = "Seed", default)]
    pub seed: u64,
    /// Boss code.
    #[serde(rename = "Boss")]
    pub boss: String,
    /// Missions in order.
    #[serde(rename = "Variants", default)]
    pub variants: Vec<RawSortieVariant>,
    /// Announced on social media.
    #[serde(rename = "Twitter", default)]
    pub twitter: bool,
}

impl RawRecord for RawSortie {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

// =============================================================================
// Invasions
// =============================================================================

/// Faction invasion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawInvasion {
    /// Start, absent on older payloads.
    #[serde(rename = "Activation", default)]
    pub activation: Option<FeedInstant>,
    /// Attacking faction code.
    #[serde(rename = "Faction")]
    pub faction: String,
    /// Defending faction code.
    #[serde(rename = "DefenderFaction")]
    pub defender_faction: String,
    /// Node identifier.
    #[serde(rename = "Node")]
    pub node: String,
    /// Signed progress count.
    #[serde(rename = "Count", default)]
    pub count: i64,
    /// Progress goal.
    #[serde(rename = "Goal", default)]
    pub goal: i64,
    /// Description language tag.
    #[serde(rename = "LocTag", default)]
    pub loc_tag: String,
    /// Whether the invasion is over.
    #[serde(rename = "Completed", default)]
    pub completed: bool,
    /// Reward for siding with the attacker.
    #[serde(rename = "AttackerReward", default, deserialize_with = "reward_or_empty")]
    pub attacker_reward: RawReward,
    /// Reward for siding with the defender.
    #[serde(rename = "DefenderReward", default, deserialize_with = "reward_or_empty")]
    pub defender_reward: RawReward,
}

impl RawRecord for RawInvasion {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::new(self.activation, None)]
    }
}

/// Infested invasions carry an empty array instead of a reward object.
fn reward_or_empty<'de, D>(deserializer: D) -> Result<RawReward, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RewardShape {
        Reward(RawReward),
        Empty(Vec<serde::de::IgnoredAny>),
    }

    match RewardShape::deserialize(deserializer)? {
        RewardShape::Reward(reward) => Ok(reward),
        RewardShape::Empty(_) => Ok(RawReward::default()),
    }
}

// =============================================================================
// Events and goals
// =============================================================================

/// Localized message attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEventMessage {
    /// Language code.
    #[serde(rename = "LanguageCode", default)]
    pub language_code: String,
    /// Message text or language tag.
    #[serde(rename = "Message")]
    pub message: String,
}

/// Localized link attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEventLink {
    /// Language code.
    #[serde(rename = "LanguageCode", default)]
    pub language_code: String,
    /// Target URL.
    #[serde(rename = "Link")]
    pub link: String,
}

/// News or community event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEvent {
    /// Messages, one per language.
    #[serde(rename = "Messages", default)]
    pub messages: Vec<RawEventMessage>,
    /// Primary link.
    #[serde(rename = "Prop", default)]
    pub prop: String,
    /// Icon path.
    #[serde(rename = "Icon", default)]
    pub icon: String,
    /// Pinned to the top.
    #[serde(rename = "Priority", default)]
    pub priority: bool,
    /// Shown on mobile only.
    #[serde(rename = "MobileOnly", default)]
    pub mobile_only: bool,
    /// Community-sourced.
    #[serde(rename = "Community", default)]
    pub community: bool,
    /// Banner image.
    #[serde(rename = "ImageUrl", default)]
    pub image_url: Option<String>,
    /// Publication date.
    #[serde(rename = "Date", default)]
    pub date: Option<FeedInstant>,
    /// Event start.
    #[serde(rename = "EventStartDate", default)]
    pub start: Option<FeedInstant>,
    /// Event end.
    #[serde(rename = "EventEndDate", default)]
    pub end: Option<FeedInstant>,
    /// Localized links.
    #[serde(rename = "Links", default)]
    pub links: Vec<RawEventLink>,
}

impl RawRecord for RawEvent {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::new(self.start, self.end)]
    }
}

/// Community goal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawGoal {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Node identifier, absent for node-less goals.
    #[serde(rename = "Node", default)]
    pub node: Option<String>,
    /// Score variable name.
    #[serde(rename = "ScoreVar", default)]
    pub score_var: String,
    /// Score label language tag.
    #[serde(rename = "ScoreLocTag", default)]
    pub score_loc_tag: String,
    /// Current progress count.
    #[serde(rename = "Count", default)]
    pub count: i64,
    /// Remaining health fraction.
    #[serde(rename = "HealthPct", default)]
    pub health_pct: f64,
    /// Regions involved.
    #[serde(rename = "Regions", default)]
    pub regions: Vec<u32>,
    /// Name language tag.
    #[serde(rename = "Desc")]
    pub desc: String,
    /// Tooltip language tag.
    #[serde(rename = "ToolTip", default)]
    pub tool_tip: String,
    /// Goal tag.
    #[serde(rename = "Tag", default)]
    pub tag: String,
    /// Personal progress goal.
    #[serde(rename = "Personal", default)]
    pub personal: bool,
    /// Community progress goal.
    #[serde(rename = "Community", default)]
    pub community: bool,
    /// Target score.
    #[serde(rename = "Goal", default)]
    pub goal: i64,
    /// Final reward.
    #[serde(rename = "Reward", default)]
    pub reward: RawReward,
    /// Interim thresholds.
    #[serde(rename = "InterimGoals", default)]
    pub interim_goals: Vec<i64>,
    /// Interim rewards, parallel to `interim_goals`.
    #[serde(rename = "InterimRewards", default)]
    pub interim_rewards: Vec<RawReward>,
}

impl RawRecord for RawGoal {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

// =============================================================================
// Void storms, conquests, vault traders, circuit
// =============================================================================

/// Railjack void storm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawVoidStorm {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Node identifier.
    #[serde(rename = "Node")]
    pub node: String,
    /// Seed.
    #[serde(rename = "Seed", default)]
    pub seed: u64,
    /// Relic tier code, e.g. `VoidT2`.
    #[serde(rename = "ActiveMissionTier", alias = "Modifier")]
    pub tier: String,
}

impl RawRecord for RawVoidStorm {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

/// Difficulty tier of a conquest mission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawConquestDifficulty {
    /// Difficulty code, e.g. `CD_HARD`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Deviation name.
    #[serde(default)]
    pub deviation: String,
    /// Risk names.
    #[serde(default)]
    pub risks: Vec<String>,
}

/// One mission of a conquest rotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawConquestMission {
    /// Faction code.
    pub faction: String,
    /// Mission type code.
    #[serde(rename = "missionType")]
    pub mission_type: String,
    /// Difficulty tiers.
    #[serde(default)]
    pub difficulties: Vec<RawConquestDifficulty>,
}

/// Archimedea conquest rotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawConquest {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Conquest code, e.g. `CT_LAB`.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Missions in order.
    #[serde(rename = "Missions", default)]
    pub missions: Vec<RawConquestMission>,
    /// Personal modifier names.
    #[serde(rename = "Variables", default)]
    pub variables: Vec<String>,
}

impl RawRecord for RawConquest {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

/// Prime resurgence trader offering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPrimeVaultTrader {
    /// Start.
    #[serde(rename = "Activation")]
    pub activation: FeedInstant,
    /// End.
    #[serde(rename = "Expiry")]
    pub expiry: FeedInstant,
    /// Relay node identifier.
    #[serde(rename = "Node", default)]
    pub node: String,
    /// Internal item path.
    #[serde(rename = "Item")]
    pub item: String,
    /// Rarity code.
    #[serde(rename = "ItemRarity", default)]
    pub rarity: String,
    /// Whether the item is vaulted.
    #[serde(rename = "Vaulted", default)]
    pub vaulted: bool,
}

impl RawRecord for RawPrimeVaultTrader {
    fn windows(&self) -> Vec<ActiveWindow> {
        vec![ActiveWindow::bounded(self.activation, self.expiry)]
    }
}

/// Weekly circuit choice set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCircuitChoice {
    /// Circuit code, e.g. `EXC_HARD`.
    #[serde(rename = "Category")]
    pub category: String,
    /// Offered choices.
    #[serde(rename = "Choices", default)]
    pub choices: Vec<String>,
}

impl RawRecord for RawCircuitChoice {
    fn windows(&self) -> Vec<ActiveWindow> {
        Vec::new()
    }
}
