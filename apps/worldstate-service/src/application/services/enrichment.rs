//! Enrichment pass.
//!
//! Turns a [`DecodedWorldState`] into a [`WorldStateSnapshot`]: every
//! internal identifier is resolved through the localization store and every
//! derived classification is computed. The decoded input is only borrowed,
//! so the pass can be re-run against an updated store without re-fetching.
//!
//! Resolution for one identifier:
//!
//! 1. the identifier verbatim,
//! 2. the kind's fallback key, if it has one,
//! 3. the identifier itself as display value.
//!
//! Store failures are logged and count as misses. Resolution never fails.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

use crate::application::ports::LocalizationPort;
use crate::domain::worldstate::enriched::{
    Alert, ArchonHunt, Challenge, Circuit, Conquest, ConquestDifficulty, ConquestMission,
    CountedItem, DailyDeal, Event, EventLink, EventMessage, Fissure, Goal, HuntMission,
    InterimGoal, Invasion, Localized, Mission, Nightwave, PrimeVaultTrader, Reward, Sortie,
    SortieVariant, TraderOffer, VoidStorm, VoidTrader,
};
use crate::domain::worldstate::raw::{
    RawAlert, RawArchonHunt, RawCircuitChoice, RawConquest, RawDailyDeal, RawEvent, RawFissure,
    RawGoal, RawInvasion, RawNightwave, RawPrimeVaultTrader, RawReward, RawSortie, RawVoidStorm,
    RawVoidTrader,
};
use crate::domain::worldstate::tiers::{
    ChallengeCadence, CircuitTier, ConquestKind, RelicTier, split_camel_case,
};
use crate::domain::worldstate::{DecodedWorldState, IdentifierKind, WorldStateSnapshot};
use crate::application::metrics;

/// Produces enriched snapshots from decoded state.
#[derive(Clone)]
pub struct EnrichmentService {
    store: Arc<dyn LocalizationPort>,
    version: String,
}

impl std::fmt::Debug for EnrichmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentService")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl EnrichmentService {
    /// Create a pass reading `store` at reference-data `version`.
    #[must_use]
    pub fn new(store: Arc<dyn LocalizationPort>, version: impl Into<String>) -> Self {
        Self {
            store,
            version: version.into(),
        }
    }

    /// Reference-data version used for lookups.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build a fully resolved snapshot.
    pub async fn enrich(&self, decoded: &DecodedWorldState) -> WorldStateSnapshot {
        let mut r = Resolver::new(self.store.as_ref(), &self.version);

        let mut alerts = Vec::with_capacity(decoded.alerts.len());
        for raw in &decoded.alerts {
            alerts.push(alert(&mut r, raw).await);
        }
        let mut fissures = Vec::with_capacity(decoded.fissures.len());
        for raw in &decoded.fissures {
            fissures.push(fissure(&mut r, raw).await);
        }
        let mut void_traders = Vec::with_capacity(decoded.void_traders.len());
        for raw in &decoded.void_traders {
            void_traders.push(void_trader(&mut r, raw).await);
        }
        let mut daily_deals = Vec::with_capacity(decoded.daily_deals.len());
        for raw in &decoded.daily_deals {
            daily_deals.push(daily_deal(&mut r, raw).await);
        }
        let mut nightwave = Vec::with_capacity(decoded.nightwave.len());
        for raw in &decoded.nightwave {
            nightwave.push(season(&mut r, raw).await);
        }
        let mut archon_hunts = Vec::with_capacity(decoded.archon_hunts.len());
        for raw in &decoded.archon_hunts {
            archon_hunts.push(archon_hunt(&mut r, raw).await);
        }
        let mut sorties = Vec::with_capacity(decoded.sorties.len());
        for raw in &decoded.sorties {
            sorties.push(sortie(&mut r, raw).await);
        }
        let mut invasions = Vec::with_capacity(decoded.invasions.len());
        for raw in &decoded.invasions {
            invasions.push(invasion(&mut r, raw).await);
        }
        let mut events = Vec::with_capacity(decoded.events.len());
        for raw in &decoded.events {
            events.push(event(&mut r, raw).await);
        }
        let mut goals = Vec::with_capacity(decoded.goals.len());
        for raw in &decoded.goals {
            goals.push(goal(&mut r, raw).await);
        }
        let mut void_storms = Vec::with_capacity(decoded.void_storms.len());
        for raw in &decoded.void_storms {
            void_storms.push(void_storm(&mut r, raw).await);
        }
        let mut conquests = Vec::with_capacity(decoded.conquests.len());
        for raw in &decoded.conquests {
            conquests.push(conquest(&mut r, raw).await);
        }
        let mut prime_vault_traders = Vec::with_capacity(decoded.prime_vault_traders.len());
        for raw in &decoded.prime_vault_traders {
            prime_vault_traders.push(prime_vault_trader(&mut r, raw).await);
        }

        let week = decoded.header.server_time.map(week_window);
        let circuit = decoded
            .circuit
            .iter()
            .map(|raw| circuit(raw, week))
            .collect();

        tracing::debug!(
            lookups = r.lookups,
            memoized = r.memo.len(),
            "Enrichment pass complete"
        );

        WorldStateSnapshot {
            header: decoded.header.clone(),
            alerts,
            fissures,
            void_traders,
            daily_deals,
            nightwave,
            archon_hunts,
            sorties,
            invasions,
            events,
            goals,
            void_storms,
            conquests,
            prime_vault_traders,
            circuit,
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

struct Resolver<'a> {
    store: &'a dyn LocalizationPort,
    version: &'a str,
    memo: HashMap<(IdentifierKind, String), String>,
    lookups: usize,
}

impl<'a> Resolver<'a> {
    fn new(store: &'a dyn LocalizationPort, version: &'a str) -> Self {
        Self {
            store,
            version,
            memo: HashMap::new(),
            lookups: 0,
        }
    }

    async fn resolve(&mut self, kind: IdentifierKind, id: &str) -> Localized {
        if id.is_empty() {
            return Localized::unresolved(id);
        }

        let memo_key = (kind, id.to_string());
        if let Some(display) = self.memo.get(&memo_key) {
            return Localized::new(id, display.clone());
        }

        let mut display = self.lookup(kind, id).await;
        if display.is_none()
            && let Some(fallback) = kind.fallback_key(id)
        {
            display = self.lookup(kind, &fallback).await;
        }

        let display = display.unwrap_or_else(|| {
            metrics::record_localization_miss(kind);
            id.to_string()
        });

        self.memo.insert(memo_key, display.clone());
        Localized::new(id, display)
    }

    async fn lookup(&mut self, kind: IdentifierKind, key: &str) -> Option<String> {
        self.lookups += 1;
        match self.store.get(key, kind.store_category(), self.version).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key,
                    category = kind.store_category(),
                    version = self.version,
                    "Localization store error, treating as miss"
                );
                None
            }
        }
    }

    async fn reward(&mut self, raw: &RawReward) -> Reward {
        let mut items = Vec::with_capacity(raw.items.len());
        for item in &raw.items {
            items.push(self.resolve(IdentifierKind::Item, item).await);
        }
        let mut counted_items = Vec::with_capacity(raw.counted_items.len());
        for counted in &raw.counted_items {
            counted_items.push(CountedItem {
                item: self.resolve(IdentifierKind::Item, &counted.item).await,
                quantity: counted.quantity,
            });
        }
        Reward {
            credits: raw.credits,
            xp: raw.xp,
            items,
            counted_items,
        }
    }
}

// =============================================================================
// Per-category enrichment
// =============================================================================

async fn alert(r: &mut Resolver<'_>, raw: &RawAlert) -> Alert {
    let m = &raw.mission;
    let description = match &m.desc_text {
        Some(tag) => Some(r.resolve(IdentifierKind::Language, tag).await),
        None => None,
    };

    Alert {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        tag: raw.tag.clone(),
        mission: Mission {
            location: r.resolve(IdentifierKind::Node, &m.location).await,
            mission_type: r.resolve(IdentifierKind::MissionType, &m.mission_type).await,
            faction: r.resolve(IdentifierKind::Faction, &m.faction).await,
            reward: r.reward(&m.reward).await,
            difficulty: m.difficulty,
            min_enemy_level: m.min_enemy_level,
            max_enemy_level: m.max_enemy_level,
            max_waves: m.max_waves,
            level_override: m.level_override.clone(),
            enemy_spec: m.enemy_spec.clone(),
            description,
        },
        force_unlock: raw.force_unlock,
    }
}

async fn fissure(r: &mut Resolver<'_>, raw: &RawFissure) -> Fissure {
    let tier = RelicTier::from_code(&raw.modifier);
    Fissure {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        node: r.resolve(IdentifierKind::Node, &raw.node).await,
        mission_type: r.resolve(IdentifierKind::MissionType, &raw.mission_type).await,
        tier_level: tier.level(),
        tier,
        steel_path: raw.hard,
        region: raw.region,
        seed: raw.seed,
    }
}

async fn void_trader(r: &mut Resolver<'_>, raw: &RawVoidTrader) -> VoidTrader {
    let mut manifest = Vec::with_capacity(raw.manifest.len());
    for offer in &raw.manifest {
        manifest.push(TraderOffer {
            item: r.resolve(IdentifierKind::Item, &offer.item).await,
            ducats: offer.ducats,
            credits: offer.credits,
            limit: offer.limit,
        });
    }

    VoidTrader {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        character: raw.character.clone(),
        node: r.resolve(IdentifierKind::Node, &raw.node).await,
        manifest,
    }
}

async fn daily_deal(r: &mut Resolver<'_>, raw: &RawDailyDeal) -> DailyDeal {
    DailyDeal {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        item: r.resolve(IdentifierKind::Item, &raw.store_item).await,
        discount: raw.discount,
        original_price: raw.original_price,
        sale_price: raw.sale_price,
        total: raw.amount_total,
        sold: raw.amount_sold,
    }
}

async fn season(r: &mut Resolver<'_>, raw: &RawNightwave) -> Nightwave {
    let mut challenges = Vec::with_capacity(raw.challenges.len());
    for c in &raw.challenges {
        let cadence = ChallengeCadence::classify(&c.challenge, c.daily);
        challenges.push(Challenge {
            activation: c.activation.into(),
            expiry: c.expiry.into(),
            title: r.resolve(IdentifierKind::Challenge, &c.challenge).await,
            standing: cadence.standing(),
            cadence,
        });
    }

    Nightwave {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        tag: raw.affiliation_tag.clone(),
        season: raw.season,
        phase: raw.phase,
        params: raw.params.clone(),
        challenges,
    }
}

async fn archon_hunt(r: &mut Resolver<'_>, raw: &RawArchonHunt) -> ArchonHunt {
    let mut missions = Vec::with_capacity(raw.missions.len());
    for m in &raw.missions {
        missions.push(HuntMission {
            node: r.resolve(IdentifierKind::Node, &m.node).await,
            mission_type: r.resolve(IdentifierKind::MissionType, &m.mission_type).await,
        });
    }

    ArchonHunt {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        boss: r.resolve(IdentifierKind::SortieBoss, &raw.boss).await,
        reward_pool: raw.reward.clone(),
        missions,
    }
}

async fn sortie(r: &mut Resolver<'_>, raw: &RawSortie) -> Sortie {
    let mut variants = Vec::with_capacity(raw.variants.len());
    for v in &raw.variants {
        variants.push(SortieVariant {
            node: r.resolve(IdentifierKind::Node, &v.node).await,
            mission_type: r.resolve(IdentifierKind::MissionType, &v.mission_type).await,
            modifier: r.resolve(IdentifierKind::SortieModifier, &v.modifier).await,
            tileset: v.tileset.clone(),
        });
    }

    Sortie {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        boss: r.resolve(IdentifierKind::SortieBoss, &raw.boss).await,
        reward_pool: raw.reward.clone(),
        variants,
    }
}

async fn invasion(r: &mut Resolver<'_>, raw: &RawInvasion) -> Invasion {
    Invasion {
        activation: raw.activation.map(Into::into),
        node: r.resolve(IdentifierKind::Node, &raw.node).await,
        attacker: r.resolve(IdentifierKind::Faction, &raw.faction).await,
        defender: r.resolve(IdentifierKind::Faction, &raw.defender_faction).await,
        description: r.resolve(IdentifierKind::Language, &raw.loc_tag).await,
        count: raw.count,
        goal: raw.goal,
        completed: raw.completed,
        attacker_reward: r.reward(&raw.attacker_reward).await,
        defender_reward: r.reward(&raw.defender_reward).await,
    }
}

async fn event(r: &mut Resolver<'_>, raw: &RawEvent) -> Event {
    let mut messages = Vec::with_capacity(raw.messages.len());
    for m in &raw.messages {
        messages.push(EventMessage {
            language_code: m.language_code.clone(),
            message: r.resolve(IdentifierKind::Language, &m.message).await,
        });
    }

    Event {
        messages,
        links: raw
            .links
            .iter()
            .map(|l| EventLink {
                language_code: l.language_code.clone(),
                link: l.link.clone(),
            })
            .collect(),
        prop: raw.prop.clone(),
        icon: raw.icon.clone(),
        image_url: raw.image_url.clone(),
        priority: raw.priority,
        mobile_only: raw.mobile_only,
        community: raw.community,
        date: raw.date.map(Into::into),
        start: raw.start.map(Into::into),
        end: raw.end.map(Into::into),
    }
}

async fn goal(r: &mut Resolver<'_>, raw: &RawGoal) -> Goal {
    let node = match &raw.node {
        Some(node) => Some(r.resolve(IdentifierKind::Node, node).await),
        None => None,
    };

    let mut interim = Vec::with_capacity(raw.interim_goals.len());
    for (i, &threshold) in raw.interim_goals.iter().enumerate() {
        let reward = match raw.interim_rewards.get(i) {
            Some(reward) => r.reward(reward).await,
            None => Reward::default(),
        };
        interim.push(InterimGoal { threshold, reward });
    }

    Goal {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        node,
        name: r.resolve(IdentifierKind::Language, &raw.desc).await,
        tooltip: r.resolve(IdentifierKind::Language, &raw.tool_tip).await,
        score_label: r.resolve(IdentifierKind::Language, &raw.score_loc_tag).await,
        score_var: raw.score_var.clone(),
        tag: raw.tag.clone(),
        count: raw.count,
        goal: raw.goal,
        health_pct: raw.health_pct,
        regions: raw.regions.clone(),
        personal: raw.personal,
        community: raw.community,
        reward: r.reward(&raw.reward).await,
        interim,
    }
}

async fn void_storm(r: &mut Resolver<'_>, raw: &RawVoidStorm) -> VoidStorm {
    let tier = RelicTier::from_code(&raw.tier);
    VoidStorm {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        node: r.resolve(IdentifierKind::Node, &raw.node).await,
        tier_level: tier.level(),
        tier,
    }
}

async fn conquest(r: &mut Resolver<'_>, raw: &RawConquest) -> Conquest {
    let mut missions = Vec::with_capacity(raw.missions.len());
    for m in &raw.missions {
        missions.push(ConquestMission {
            faction: r.resolve(IdentifierKind::Faction, &m.faction).await,
            mission_type: r.resolve(IdentifierKind::MissionType, &m.mission_type).await,
            difficulties: m
                .difficulties
                .iter()
                .map(|d| ConquestDifficulty {
                    kind: d.kind.clone(),
                    deviation: split_camel_case(&d.deviation),
                    risks: d.risks.iter().map(|s| split_camel_case(s)).collect(),
                })
                .collect(),
        });
    }

    Conquest {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        kind: ConquestKind::from_code(&raw.kind),
        missions,
        variables: raw.variables.iter().map(|s| split_camel_case(s)).collect(),
    }
}

async fn prime_vault_trader(r: &mut Resolver<'_>, raw: &RawPrimeVaultTrader) -> PrimeVaultTrader {
    PrimeVaultTrader {
        activation: raw.activation.into(),
        expiry: raw.expiry.into(),
        node: r.resolve(IdentifierKind::Node, &raw.node).await,
        item: r.resolve(IdentifierKind::Item, &raw.item).await,
        rarity: raw.rarity.clone(),
        vaulted: raw.vaulted,
    }
}

fn circuit(raw: &RawCircuitChoice, week: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Circuit {
    Circuit {
        tier: CircuitTier::from_code(&raw.category),
        choices: raw.choices.iter().map(|s| split_camel_case(s)).collect(),
        week_start: week.map(|(start, _)| start),
        week_end: week.map(|(_, end)| end),
    }
}

/// Monday 00:00 UTC of the week containing `at`, and the Monday after.
fn week_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = at.date_naive();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let start = monday.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::weeks(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{LocalizationError, MockLocalizationPort};
    use crate::application::services::decoder;
    use crate::infrastructure::localization::InMemoryLocalizationStore;
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    const VERSION: &str = "2025-10-14";

    fn date(ms: &str) -> Value {
        json!({ "$date": { "$numberLong": ms } })
    }

    fn decoded(extra: Value) -> DecodedWorldState {
        let mut doc = json!({
            "Version": 14,
            "BuildLabel": "2025.10.14.12.01/rWqfDgsaVP5jvb7D1KxHXw",
            "Time": 1_760_880_000
        });
        if let (Some(obj), Value::Object(extra)) = (doc.as_object_mut(), extra) {
            obj.extend(extra);
        }
        decoder::decode(&doc).unwrap().state
    }

    fn scenario() -> DecodedWorldState {
        decoded(json!({
            "Alerts": [{
                "Activation": date("1760879282779"),
                "Expiry": date("1760886424219"),
                "MissionInfo": {
                    "location": "SolNode309",
                    "missionType": "MT_SURVIVAL",
                    "faction": "FC_CORPUS",
                    "missionReward": {
                        "credits": 0,
                        "countedItems": [{
                            "ItemType": "/Lotus/StoreItems/Types/Items/MiscItems/Forma",
                            "ItemCount": 2
                        }]
                    }
                }
            }],
            "ActiveMissions": [{
                "Activation": date("1760879282779"),
                "Expiry": date("1760886424219"),
                "Node": "SolNode309",
                "MissionType": "MT_SURVIVAL",
                "Modifier": "VoidT5",
                "Hard": true
            }],
            "EndlessXpChoices": [
                { "Category": "EXC_HARD", "Choices": ["Xaku", "ArcaPlasmor"] }
            ]
        }))
    }

    fn store() -> Arc<InMemoryLocalizationStore> {
        let store = InMemoryLocalizationStore::new();
        store.insert("nodes", VERSION, "SolNode309", "Tyl Regor (Uranus)");
        store.insert("missionTypes", VERSION, "MT_SURVIVAL", "Survival");
        store.insert(
            "items",
            VERSION,
            "/Lotus/Types/Items/MiscItems/Forma",
            "Forma Blueprint",
        );
        Arc::new(store)
    }

    #[tokio::test]
    async fn resolves_through_store() {
        let service = EnrichmentService::new(store(), VERSION);
        let snapshot = service.enrich(&scenario()).await;

        let alert = &snapshot.alerts[0];
        assert_eq!(alert.mission.location.id, "SolNode309");
        assert_eq!(alert.mission.location.display, "Tyl Regor (Uranus)");
        assert_eq!(alert.mission.mission_type.display, "Survival");
        assert_eq!(alert.activation.timestamp_millis(), 1_760_879_282_779);
    }

    #[tokio::test]
    async fn item_fallback_strips_store_items_segment() {
        let service = EnrichmentService::new(store(), VERSION);
        let snapshot = service.enrich(&scenario()).await;

        let counted = &snapshot.alerts[0].mission.reward.counted_items[0];
        assert_eq!(counted.item.id, "/Lotus/StoreItems/Types/Items/MiscItems/Forma");
        assert_eq!(counted.item.display, "Forma Blueprint");
        assert_eq!(counted.quantity.get(), 2);
    }

    #[tokio::test]
    async fn miss_falls_back_to_raw_identifier() {
        let service = EnrichmentService::new(Arc::new(InMemoryLocalizationStore::new()), VERSION);
        let snapshot = service.enrich(&scenario()).await;

        let location = &snapshot.alerts[0].mission.location;
        assert_eq!(location.display, "SolNode309");
        assert!(!location.is_resolved());
    }

    #[tokio::test]
    async fn other_version_is_not_visible() {
        let service = EnrichmentService::new(store(), "2024-01-01");
        let snapshot = service.enrich(&scenario()).await;
        assert_eq!(snapshot.alerts[0].mission.location.display, "SolNode309");
    }

    #[tokio::test]
    async fn store_errors_degrade_to_miss() {
        let mut mock = MockLocalizationPort::new();
        mock.expect_get().returning(|_, _, _| {
            Err(LocalizationError::Unavailable {
                message: "connection refused".into(),
            })
        });

        let service = EnrichmentService::new(Arc::new(mock), VERSION);
        let snapshot = service.enrich(&scenario()).await;
        assert_eq!(snapshot.alerts[0].mission.location.display, "SolNode309");
        assert_eq!(snapshot.fissures[0].node.display, "SolNode309");
    }

    #[tokio::test]
    async fn lookups_are_memoized_within_a_pass() {
        let mut mock = MockLocalizationPort::new();
        mock.expect_get()
            .with(eq("SolNode309"), eq("nodes"), eq(VERSION))
            .times(1)
            .returning(|_, _, _| Ok(Some("Tyl Regor (Uranus)".into())));
        mock.expect_get().returning(|_, _, _| Ok(None));

        let service = EnrichmentService::new(Arc::new(mock), VERSION);
        let snapshot = service.enrich(&scenario()).await;
        assert_eq!(snapshot.alerts[0].mission.location.display, "Tyl Regor (Uranus)");
        assert_eq!(snapshot.fissures[0].node.display, "Tyl Regor (Uranus)");
    }

    #[tokio::test]
    async fn derives_classifications() {
        let service = EnrichmentService::new(store(), VERSION);
        let snapshot = service.enrich(&scenario()).await;

        let fissure = &snapshot.fissures[0];
        assert_eq!(fissure.tier, RelicTier::Requiem);
        assert_eq!(fissure.tier_level, Some(5));
        assert!(fissure.steel_path);

        let circuit = &snapshot.circuit[0];
        assert_eq!(circuit.tier, CircuitTier::SteelPath);
        assert_eq!(circuit.choices, ["Xaku", "Arca Plasmor"]);
        assert_eq!(
            circuit.week_start.unwrap().to_rfc3339(),
            "2025-10-13T00:00:00+00:00"
        );
        assert_eq!(
            circuit.week_end.unwrap().to_rfc3339(),
            "2025-10-20T00:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn re_enrichment_is_byte_identical() {
        let service = EnrichmentService::new(store(), VERSION);
        let decoded = scenario();

        let first = serde_json::to_vec(&service.enrich(&decoded).await).unwrap();
        let second = serde_json::to_vec(&service.enrich(&decoded).await).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn re_enrichment_sees_store_updates() {
        let store = Arc::new(InMemoryLocalizationStore::new());
        let service = EnrichmentService::new(Arc::clone(&store) as Arc<dyn LocalizationPort>, VERSION);
        let decoded = scenario();

        let before = service.enrich(&decoded).await;
        store.insert("nodes", VERSION, "SolNode309", "Tyl Regor (Uranus)");
        let after = service.enrich(&decoded).await;

        assert_eq!(before.alerts[0].mission.location.display, "SolNode309");
        assert_eq!(after.alerts[0].mission.location.display, "Tyl Regor (Uranus)");
    }

    #[tokio::test]
    async fn nightwave_challenges_get_cadence_and_standing() {
        let state = decoded(json!({
            "SeasonInfo": {
                "Activation": date("1747851300000"),
                "Expiry": date("1761588000000"),
                "AffiliationTag": "RadioLegionIntermission13Syndicate",
                "Season": 13,
                "ActiveChallenges": [
                    {
                        "Activation": date("1760659200000"),
                        "Expiry": date("1761264000000"),
                        "Challenge": "/Lotus/Types/Challenges/Seasons/WeeklyHard/SeasonWeeklyHardKillEximus"
                    },
                    {
                        "Activation": date("1760659200000"),
                        "Expiry": date("1760918400000"),
                        "Challenge": "/Lotus/Types/Challenges/Seasons/Daily/SeasonDailyAimGlide",
                        "Daily": true
                    }
                ]
            }
        }));

        let store = InMemoryLocalizationStore::new();
        store.insert("challenges", VERSION, "SeasonDailyAimGlide", "Glider");
        let service = EnrichmentService::new(Arc::new(store), VERSION);
        let snapshot = service.enrich(&state).await;

        let challenges = &snapshot.nightwave[0].challenges;
        assert_eq!(challenges[0].cadence, ChallengeCadence::EliteWeekly);
        assert_eq!(challenges[0].standing, 7000);
        assert_eq!(challenges[1].cadence, ChallengeCadence::Daily);
        assert_eq!(challenges[1].title.display, "Glider");
    }

    #[test]
    fn week_window_starts_on_monday() {
        let monday = "2025-10-13T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let (start, end) = week_window(monday);
        assert_eq!(start, monday);
        assert_eq!(end - start, Duration::weeks(1));

        let sunday = "2025-10-19T23:59:59Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(week_window(sunday).0, monday);
    }
}
