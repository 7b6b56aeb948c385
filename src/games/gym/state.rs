//! Gym Gains ledger: currencies, per-item progression, statistics and timers.
//!
//! Item instances keep a `&'static` reference to their catalog definition and
//! only the fields that change during play.

use serde::{Deserialize, Serialize};

use super::catalog::{
    AchievementDef, AllyDef, ConsumableDef, EquipmentDef, LocationDef, OneTimeDef, Stat, Tier,
    TierUpgradeDef, UpgradeDef, UpgradeKind, ACHIEVEMENTS, ALLIES, CONSUMABLES, EQUIPMENT, LOCATIONS,
    ONE_TIME_UPGRADES, STARTING_LOCATION, UPGRADES,
};
use super::challenge::DailyChallenge;
use super::economy::BuyAmount;
use super::format::Notation;

/// Max entries kept in the message log.
const MAX_LOG: usize = 50;
/// Max samples kept in the calorie history chart.
pub const MAX_HISTORY: usize = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeState {
    pub def: &'static UpgradeDef,
    pub level: u32,
}

impl UpgradeState {
    pub fn is_maxed(&self) -> bool {
        self.level >= self.def.max_level_or_inf()
    }

    /// Visible/buyable: reached the unlock gate this run, or already owned.
    pub fn is_unlocked(&self, total_calories: f64) -> bool {
        total_calories >= self.def.unlock_at || self.level > 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OneTimeState {
    pub def: &'static OneTimeDef,
    pub purchased: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EquipmentState {
    pub def: &'static EquipmentDef,
    pub purchased: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationState {
    pub def: &'static LocationDef,
    pub unlocked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TierUpgradeState {
    pub def: &'static TierUpgradeDef,
    pub level: u32,
}

impl TierUpgradeState {
    /// Tier upgrades are never discounted.
    pub fn cost(&self) -> f64 {
        (self.def.base_cost * self.def.cost_multiplier.powi(self.level as i32)).floor()
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.def.max_level
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AllyState {
    pub def: &'static AllyDef,
    pub level: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AchievementState {
    pub def: &'static AchievementDef,
    pub unlocked: bool,
}

/// Runtime state of one consumable type.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsumableState {
    pub def: &'static ConsumableDef,
    /// Uses this run; drives the price curve.
    pub uses: u32,
    /// Expiry of the running effect (epoch ms).
    pub active_until_ms: Option<f64>,
    pub cooldown_until_ms: Option<f64>,
}

impl ConsumableState {
    pub fn is_active(&self, now_ms: f64) -> bool {
        self.active_until_ms.is_some_and(|end| end > now_ms)
    }
}

/// Click-originated income waiting for the next main tick.
///
/// Producers only add; `logic::tick` is the only reader and clears it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingGains {
    pub calories: f64,
    /// Fractional because ally auto-lifts are batched in fractions.
    pub lifts: f64,
    pub crits: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub play_time_secs: f64,
    pub calories: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoBuy {
    #[default]
    Off,
    One,
    NextMilestone,
}

impl AutoBuy {
    pub fn next(self) -> AutoBuy {
        match self {
            AutoBuy::Off => AutoBuy::One,
            AutoBuy::One => AutoBuy::NextMilestone,
            AutoBuy::NextMilestone => AutoBuy::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AutoBuy::Off => "OFF",
            AutoBuy::One => "x1",
            AutoBuy::NextMilestone => "NEXT",
        }
    }
}

/// Player preferences, persisted with the save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub buy_amount: BuyAmount,
    pub auto_buy: AutoBuy,
    pub click_limiter: bool,
    pub low_activity: bool,
    pub sound_enabled: bool,
    pub notation: Notation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            buy_amount: BuyAmount::default(),
            auto_buy: AutoBuy::Off,
            click_limiter: true,
            low_activity: false,
            sound_enabled: true,
            notation: Notation::Standard,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GymLogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Snapshot of cumulative statistics read by achievement conditions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    pub lifetime_calories: f64,
    pub total_lifts: u64,
    pub prestige_count: u32,
    pub ascension_count: u32,
    pub play_time_secs: f64,
    pub max_combo: u32,
    pub critical_hits: u64,
    pub upgrades_purchased: u64,
    pub divinity_points: f64,
    pub titan_tokens: f64,
    pub achievements_unlocked: usize,
    pub locations_unlocked: usize,
    pub allies_hired: usize,
}

impl Statistics {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::LifetimeCalories => self.lifetime_calories,
            Stat::TotalLifts => self.total_lifts as f64,
            Stat::PrestigeCount => self.prestige_count as f64,
            Stat::AscensionCount => self.ascension_count as f64,
            Stat::PlayTimeSecs => self.play_time_secs,
            Stat::MaxCombo => self.max_combo as f64,
            Stat::CriticalHits => self.critical_hits as f64,
            Stat::UpgradesPurchased => self.upgrades_purchased as f64,
            Stat::DivinityPoints => self.divinity_points,
            Stat::TitanTokens => self.titan_tokens,
            Stat::AchievementsUnlocked => self.achievements_unlocked as f64,
            Stat::LocationsUnlocked => self.locations_unlocked as f64,
            Stat::AlliesHired => self.allies_hired as f64,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GymState {
    // Currencies
    pub calories: f64,
    /// Earned this run; drives unlocks and rank.
    pub total_calories: f64,
    /// Never reset.
    pub lifetime_calories: f64,
    pub protein_points: f64,
    pub titan_tokens: f64,
    pub divinity_points: f64,

    // Per-run progression
    pub upgrades: Vec<UpgradeState>,
    pub one_time_upgrades: Vec<OneTimeState>,
    pub equipment: Vec<EquipmentState>,
    pub locations: Vec<LocationState>,
    /// Index into `locations`; always an unlocked entry.
    pub current_location: usize,
    pub consumables: Vec<ConsumableState>,

    // Tier trees
    pub prestige_upgrades: Vec<TierUpgradeState>,
    pub ascension_upgrades: Vec<TierUpgradeState>,
    pub transcendence_upgrades: Vec<TierUpgradeState>,

    pub allies: Vec<AllyState>,
    pub achievements: Vec<AchievementState>,

    // Statistics
    pub total_lifts: u64,
    pub critical_hits: u64,
    pub max_combo: u32,
    pub upgrades_purchased: u64,
    pub play_time_secs: f64,
    pub prestige_count: u32,
    pub ascension_count: u32,
    pub transcendence_count: u32,

    // Combo & click handling
    pub combo: u32,
    pub last_lift_ms: Option<f64>,
    /// Accepted click timestamps inside the rate-limit window.
    pub recent_clicks: Vec<f64>,
    pub pending: PendingGains,

    pub daily_challenge: Option<DailyChallenge>,
    pub calorie_history: Vec<HistoryPoint>,
    /// Epoch ms of the last successful save.
    pub last_save_ms: f64,

    pub settings: Settings,
    pub rng_seed: u64,
    pub log: Vec<GymLogEntry>,
}

pub fn fresh_upgrades() -> Vec<UpgradeState> {
    UPGRADES.iter().map(|def| UpgradeState { def, level: 0 }).collect()
}

pub fn fresh_one_time_upgrades() -> Vec<OneTimeState> {
    ONE_TIME_UPGRADES.iter().map(|def| OneTimeState { def, purchased: false }).collect()
}

pub fn fresh_equipment() -> Vec<EquipmentState> {
    EQUIPMENT.iter().map(|def| EquipmentState { def, purchased: false }).collect()
}

pub fn fresh_locations() -> Vec<LocationState> {
    LOCATIONS
        .iter()
        .map(|def| LocationState { def, unlocked: def.id == STARTING_LOCATION })
        .collect()
}

pub fn starting_location_index() -> usize {
    LOCATIONS.iter().position(|l| l.id == STARTING_LOCATION).unwrap_or(0)
}

pub fn fresh_consumables() -> Vec<ConsumableState> {
    CONSUMABLES
        .iter()
        .map(|def| ConsumableState { def, uses: 0, active_until_ms: None, cooldown_until_ms: None })
        .collect()
}

pub fn fresh_tier_upgrades(tier: Tier) -> Vec<TierUpgradeState> {
    tier.defs().iter().map(|def| TierUpgradeState { def, level: 0 }).collect()
}

pub fn fresh_allies() -> Vec<AllyState> {
    ALLIES.iter().map(|def| AllyState { def, level: 0 }).collect()
}

pub fn fresh_achievements() -> Vec<AchievementState> {
    ACHIEVEMENTS.iter().map(|def| AchievementState { def, unlocked: false }).collect()
}

impl GymState {
    pub fn new() -> Self {
        Self {
            calories: 0.0,
            total_calories: 0.0,
            lifetime_calories: 0.0,
            protein_points: 0.0,
            titan_tokens: 0.0,
            divinity_points: 0.0,
            upgrades: fresh_upgrades(),
            one_time_upgrades: fresh_one_time_upgrades(),
            equipment: fresh_equipment(),
            locations: fresh_locations(),
            current_location: starting_location_index(),
            consumables: fresh_consumables(),
            prestige_upgrades: fresh_tier_upgrades(Tier::Prestige),
            ascension_upgrades: fresh_tier_upgrades(Tier::Ascension),
            transcendence_upgrades: fresh_tier_upgrades(Tier::Transcendence),
            allies: fresh_allies(),
            achievements: fresh_achievements(),
            total_lifts: 0,
            critical_hits: 0,
            max_combo: 0,
            upgrades_purchased: 0,
            play_time_secs: 0.0,
            prestige_count: 0,
            ascension_count: 0,
            transcendence_count: 0,
            combo: 0,
            last_lift_ms: None,
            recent_clicks: Vec::new(),
            pending: PendingGains::default(),
            daily_challenge: None,
            calorie_history: Vec::new(),
            last_save_ms: 0.0,
            settings: Settings::default(),
            rng_seed: 42,
            log: Vec::new(),
        }
    }

    pub fn upgrade_index(&self, id: &str) -> Option<usize> {
        self.upgrades.iter().position(|u| u.def.id == id)
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrades.iter().find(|u| u.def.id == id).map_or(0, |u| u.level)
    }

    /// Indices of standard upgrades of one kind, in catalog order.
    pub fn upgrade_indices(&self, kind: UpgradeKind) -> Vec<usize> {
        self.upgrades
            .iter()
            .enumerate()
            .filter(|(_, u)| u.def.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn tier_upgrades(&self, tier: Tier) -> &[TierUpgradeState] {
        match tier {
            Tier::Prestige => &self.prestige_upgrades,
            Tier::Ascension => &self.ascension_upgrades,
            Tier::Transcendence => &self.transcendence_upgrades,
        }
    }

    pub fn tier_upgrades_mut(&mut self, tier: Tier) -> &mut Vec<TierUpgradeState> {
        match tier {
            Tier::Prestige => &mut self.prestige_upgrades,
            Tier::Ascension => &mut self.ascension_upgrades,
            Tier::Transcendence => &mut self.transcendence_upgrades,
        }
    }

    /// Balance of the currency a tier's upgrade tree is paid in.
    pub fn tier_currency(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Prestige => self.protein_points,
            Tier::Ascension => self.titan_tokens,
            Tier::Transcendence => self.divinity_points,
        }
    }

    pub fn tier_currency_mut(&mut self, tier: Tier) -> &mut f64 {
        match tier {
            Tier::Prestige => &mut self.protein_points,
            Tier::Ascension => &mut self.titan_tokens,
            Tier::Transcendence => &mut self.divinity_points,
        }
    }

    pub fn current_location_def(&self) -> &'static LocationDef {
        self.locations
            .get(self.current_location)
            .map(|l| l.def)
            .unwrap_or(&LOCATIONS[0])
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            lifetime_calories: self.lifetime_calories,
            total_lifts: self.total_lifts,
            prestige_count: self.prestige_count,
            ascension_count: self.ascension_count,
            play_time_secs: self.play_time_secs,
            max_combo: self.max_combo,
            critical_hits: self.critical_hits,
            upgrades_purchased: self.upgrades_purchased,
            divinity_points: self.divinity_points,
            titan_tokens: self.titan_tokens,
            achievements_unlocked: self.achievements.iter().filter(|a| a.unlocked).count(),
            locations_unlocked: self.locations.iter().filter(|l| l.unlocked).count(),
            allies_hired: self.allies.iter().filter(|a| a.level > 0).count(),
        }
    }

    /// LCG step; returns a value in `[0, 1)`.
    pub fn next_random(&mut self) -> f64 {
        self.rng_seed = self
            .rng_seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.rng_seed >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(GymLogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }
}

impl Default for GymState {
    fn default() -> Self {
        Self::new()
    }
}
