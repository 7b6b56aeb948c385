//! Static definition tables for every purchasable or earnable entity.
//!
//! Pure data. Runtime instances in `state.rs` hold a `&'static` reference to
//! their definition plus the few mutable fields (level / purchased / unlocked),
//! so a catalog change is picked up by old saves automatically.

/// Which derived scalar a standard upgrade feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    /// Adds `effect * level` to base lift power.
    Lift,
    /// Adds `effect * level` calories per second.
    Passive,
    /// Multiplies both lift power and passive income by `effect^level`.
    Multiplier,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [UpgradeKind::Lift, UpgradeKind::Passive, UpgradeKind::Multiplier];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::Lift => "Lift",
            UpgradeKind::Passive => "Passive",
            UpgradeKind::Multiplier => "Multiplier",
        }
    }
}

/// Target bucket of a bonus inside the `Multipliers` snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BonusKind {
    LiftMult,
    PassiveMult,
    AllMult,
    CostReduction,
    CritChance,
    CritMult,
    ComboMult,
    ComboMax,
    PrestigeMult,
    PpMult,
    AscensionMult,
    TtMult,
    TranscendenceMult,
}

impl BonusKind {
    /// Additive buckets sum their contributions; all others multiply.
    pub fn is_additive(self) -> bool {
        matches!(self, BonusKind::CritChance | BonusKind::CritMult | BonusKind::ComboMax)
    }

    pub fn describe(self, value: f64) -> String {
        match self {
            BonusKind::LiftMult => format!("x{value} lift"),
            BonusKind::PassiveMult => format!("x{value} passive"),
            BonusKind::AllMult => format!("x{value} all income"),
            BonusKind::CostReduction => format!("x{value} costs"),
            BonusKind::CritChance => format!("+{:.0}% crit chance", value * 100.0),
            BonusKind::CritMult => format!("+{value}x crit damage"),
            BonusKind::ComboMult => format!("x{value} combo bonus"),
            BonusKind::ComboMax => format!("+{value} max combo"),
            BonusKind::PrestigeMult => format!("x{value} prestige gain"),
            BonusKind::PpMult => format!("x{value} PP gain"),
            BonusKind::AscensionMult => format!("x{value} ascension gain"),
            BonusKind::TtMult => format!("x{value} TT gain"),
            BonusKind::TranscendenceMult => format!("x{value} transcendence gain"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bonus {
    pub kind: BonusKind,
    pub value: f64,
}

const fn bonus(kind: BonusKind, value: f64) -> Bonus {
    Bonus { kind, value }
}

// ── Standard upgrades ──────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub effect: f64,
    pub kind: UpgradeKind,
    /// `None` means unbounded.
    pub max_level: Option<u32>,
    pub unlock_at: f64,
    pub has_milestones: bool,
    pub synergy_group: Option<&'static str>,
}

impl UpgradeDef {
    pub fn max_level_or_inf(&self) -> u32 {
        self.max_level.unwrap_or(u32::MAX)
    }
}

const fn producer(
    id: &'static str,
    name: &'static str,
    base_cost: f64,
    cost_multiplier: f64,
    effect: f64,
    kind: UpgradeKind,
    unlock_at: f64,
    group: &'static str,
) -> UpgradeDef {
    UpgradeDef {
        id,
        name,
        base_cost,
        cost_multiplier,
        effect,
        kind,
        max_level: None,
        unlock_at,
        has_milestones: true,
        synergy_group: Some(group),
    }
}

const fn multiplier(
    id: &'static str,
    name: &'static str,
    base_cost: f64,
    cost_multiplier: f64,
    effect: f64,
    max_level: u32,
    unlock_at: f64,
) -> UpgradeDef {
    UpgradeDef {
        id,
        name,
        base_cost,
        cost_multiplier,
        effect,
        kind: UpgradeKind::Multiplier,
        max_level: Some(max_level),
        unlock_at,
        has_milestones: false,
        synergy_group: None,
    }
}

use UpgradeKind::{Lift, Passive};

pub static UPGRADES: &[UpgradeDef] = &[
    producer("lift1", "Better Form", 15.0, 1.2, 1.0, Lift, 0.0, "form"),
    producer("food1", "Protein Shake", 50.0, 1.22, 0.5, Passive, 0.0, "protein"),
    producer("lift2", "Heavier Dumbbells", 400.0, 1.24, 5.0, Lift, 100.0, "weights"),
    producer("food2", "Chicken & Rice", 2000.0, 1.25, 3.0, Passive, 500.0, "protein"),
    multiplier("mult1", "Pre-Workout", 8000.0, 1.8, 1.05, 50, 2000.0),
    producer("lift3", "Barbell Training", 35_000.0, 1.22, 25.0, Lift, 1e4, "weights"),
    producer("food3", "Meal Prep Service", 150_000.0, 1.25, 20.0, Passive, 5e4, "meals"),
    producer("lift4", "Olympic Lifts", 8e5, 1.28, 150.0, Lift, 2.5e5, "olympic"),
    producer("food4", "Personal Chef", 5e6, 1.3, 150.0, Passive, 1e6, "meals"),
    multiplier("mult2", "Anabolic Kitchen", 5e7, 2.2, 1.1, 30, 1e7),
    producer("lift5", "Strongman Training", 5e8, 1.32, 1000.0, Lift, 1e8, "strongman"),
    producer("food5", "Nutrition Empire", 2e9, 1.35, 1000.0, Passive, 5e8, "empire"),
    producer("lift6", "Titan Lifts", 5e10, 1.38, 1e4, Lift, 1e10, "titan"),
    producer("food6", "Divine Feast", 2e11, 1.4, 1e4, Passive, 5e10, "divine"),
    multiplier("mult3", "Peak Performance", 1e12, 2.5, 1.15, 25, 1e11),
    producer("lift7", "Cosmic Strength", 1e13, 1.42, 1e5, Lift, 1e12, "cosmic"),
    producer("food7", "Celestial Nutrients", 5e13, 1.45, 1e5, Passive, 5e12, "cosmic"),
    producer("lift8", "Universal Power", 1e15, 1.48, 1e6, Lift, 1e14, "universal"),
    producer("food8", "Infinite Sustenance", 5e15, 1.5, 1e6, Passive, 5e14, "universal"),
];

// ── One-time upgrades & equipment ──────────────────────────────

#[derive(Debug, PartialEq)]
pub struct OneTimeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: f64,
    pub bonus: Bonus,
    pub unlock_at: f64,
}

const fn one_time(id: &'static str, name: &'static str, cost: f64, bonus: Bonus, unlock_at: f64) -> OneTimeDef {
    OneTimeDef { id, name, cost, bonus, unlock_at }
}

use BonusKind::*;

pub static ONE_TIME_UPGRADES: &[OneTimeDef] = &[
    one_time("ot1", "Gym Membership", 500.0, bonus(LiftMult, 2.0), 200.0),
    one_time("ot2", "Weightlifting Belt", 5000.0, bonus(LiftMult, 1.5), 2000.0),
    one_time("ot3", "Protein Sponsorship", 25_000.0, bonus(PassiveMult, 2.0), 1e4),
    one_time("ot4", "Home Gym Setup", 1e5, bonus(CostReduction, 0.8), 5e4),
    one_time("combo1", "Focus Training", 5000.0, bonus(ComboMax, 10.0), 1000.0),
    one_time("combo2", "Rhythm Control", 5e4, bonus(ComboMax, 15.0), 2.5e4),
    one_time("combo3", "Flow State", 5e5, bonus(ComboMax, 25.0), 2.5e5),
    one_time("combo4", "Zen Mind", 5e6, bonus(ComboMax, 40.0), 1e6),
    one_time("ot5", "Personal Trainer", 5e5, bonus(AllMult, 2.0), 2e5),
    one_time("ot6", "Fitness Influencer", 2.5e6, bonus(PassiveMult, 3.0), 1e6),
    one_time("ot7", "Competition Prep Coach", 1.5e7, bonus(LiftMult, 2.5), 5e6),
    one_time("ot8", "Elite Gym Access", 7.5e7, bonus(CostReduction, 0.7), 2.5e7),
    one_time("ot9", "Supplement Empire", 5e8, bonus(PrestigeMult, 1.25), 1e8),
    one_time("ot10", "Legendary Genetics", 5e9, bonus(AllMult, 5.0), 1e9),
];

#[derive(Debug, PartialEq)]
pub struct EquipmentDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: f64,
    pub unlock_at: f64,
    pub bonuses: &'static [Bonus],
}

pub static EQUIPMENT: &[EquipmentDef] = &[
    EquipmentDef { id: "eq1", name: "Basic Dumbbells", cost: 5000.0, unlock_at: 500.0, bonuses: &[bonus(LiftMult, 1.1)] },
    EquipmentDef { id: "eq2", name: "Workout Gloves", cost: 25_000.0, unlock_at: 2000.0, bonuses: &[bonus(CritChance, 0.05)] },
    EquipmentDef { id: "eq3", name: "Adjustable Bench", cost: 1e5, unlock_at: 1e4, bonuses: &[bonus(PassiveMult, 1.15)] },
    EquipmentDef {
        id: "eq4",
        name: "Olympic Barbell",
        cost: 5e5,
        unlock_at: 5e4,
        bonuses: &[bonus(LiftMult, 1.25), bonus(CritMult, 0.5)],
    },
    EquipmentDef {
        id: "eq5",
        name: "Power Rack",
        cost: 2.5e6,
        unlock_at: 2e5,
        bonuses: &[bonus(LiftMult, 1.2), bonus(PassiveMult, 1.2)],
    },
    EquipmentDef {
        id: "eq6",
        name: "Cable Machine",
        cost: 1e7,
        unlock_at: 1e6,
        bonuses: &[bonus(CritChance, 0.1), bonus(ComboMult, 1.2)],
    },
    EquipmentDef { id: "eq7", name: "Leg Press Machine", cost: 5e7, unlock_at: 5e6, bonuses: &[bonus(PassiveMult, 1.5)] },
    EquipmentDef { id: "eq8", name: "Competition Plates", cost: 2.5e8, unlock_at: 2.5e7, bonuses: &[bonus(CritMult, 1.0)] },
];

// ── Gym locations ──────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct LocationDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: f64,
    pub unlock_at: f64,
    pub lift_mult: f64,
    pub passive_mult: f64,
    pub pp_mult: f64,
}

pub static LOCATIONS: &[LocationDef] = &[
    LocationDef { id: "loc1", name: "Home Gym", cost: 0.0, unlock_at: 0.0, lift_mult: 1.0, passive_mult: 1.0, pp_mult: 1.0 },
    LocationDef { id: "loc2", name: "Local Gym", cost: 2.5e5, unlock_at: 2.5e4, lift_mult: 1.15, passive_mult: 1.15, pp_mult: 1.05 },
    LocationDef { id: "loc3", name: "Elite Fitness", cost: 2.5e7, unlock_at: 1e6, lift_mult: 1.3, passive_mult: 1.3, pp_mult: 1.1 },
    LocationDef { id: "loc4", name: "Pro Athletes Gym", cost: 2.5e9, unlock_at: 1e8, lift_mult: 1.5, passive_mult: 1.5, pp_mult: 1.2 },
    LocationDef { id: "loc5", name: "Olympus Gym", cost: 5e11, unlock_at: 1e10, lift_mult: 2.0, passive_mult: 2.0, pp_mult: 1.5 },
];

/// The location every new run starts in.
pub const STARTING_LOCATION: &str = "loc1";

// ── Consumables ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConsumableEffect {
    /// Active for `duration_secs`.
    Timed(Bonus),
    /// Credited immediately to all calorie accumulators.
    InstantCalories(f64),
}

#[derive(Debug, PartialEq)]
pub struct ConsumableDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: f64,
    pub duration_secs: f64,
    pub cooldown_secs: f64,
    pub effect: ConsumableEffect,
    pub unlock_at: f64,
    /// Can be used once per run.
    pub one_time: bool,
}

/// Price growth per previous use.
pub const CONSUMABLE_COST_GROWTH: f64 = 1.15;

pub static CONSUMABLES: &[ConsumableDef] = &[
    ConsumableDef {
        id: "con1",
        name: "Energy Drink",
        cost: 5000.0,
        duration_secs: 30.0,
        cooldown_secs: 120.0,
        effect: ConsumableEffect::Timed(bonus(LiftMult, 2.0)),
        unlock_at: 100.0,
        one_time: false,
    },
    ConsumableDef {
        id: "con2",
        name: "Protein Bar",
        cost: 750.0,
        duration_secs: 0.0,
        cooldown_secs: 60.0,
        effect: ConsumableEffect::InstantCalories(5000.0),
        unlock_at: 500.0,
        one_time: true,
    },
    ConsumableDef {
        id: "con3",
        name: "Pre-Workout Shot",
        cost: 1e5,
        duration_secs: 45.0,
        cooldown_secs: 180.0,
        effect: ConsumableEffect::Timed(bonus(CritChance, 0.2)),
        unlock_at: 5000.0,
        one_time: false,
    },
    ConsumableDef {
        id: "con4",
        name: "Mass Gainer",
        cost: 5e5,
        duration_secs: 60.0,
        cooldown_secs: 240.0,
        effect: ConsumableEffect::Timed(bonus(PassiveMult, 3.0)),
        unlock_at: 2.5e4,
        one_time: false,
    },
    ConsumableDef {
        id: "con5",
        name: "Creatine Surge",
        cost: 5e6,
        duration_secs: 30.0,
        cooldown_secs: 300.0,
        effect: ConsumableEffect::Timed(bonus(AllMult, 5.0)),
        unlock_at: 1e5,
        one_time: false,
    },
    ConsumableDef {
        id: "con6",
        name: "Divine Nectar",
        cost: 1e8,
        duration_secs: 0.0,
        cooldown_secs: 600.0,
        effect: ConsumableEffect::InstantCalories(1e9),
        unlock_at: 5e7,
        one_time: true,
    },
];

// ── Prestige-tier upgrade trees ────────────────────────────────

/// Prestige tier owning an upgrade tree and its currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Competition → protein points.
    Prestige,
    /// Pro Card → titan tokens.
    Ascension,
    /// Mr. Olympia → divinity points.
    Transcendence,
}

impl Tier {
    pub fn currency_name(self) -> &'static str {
        match self {
            Tier::Prestige => "PP",
            Tier::Ascension => "TT",
            Tier::Transcendence => "DP",
        }
    }

    pub fn defs(self) -> &'static [TierUpgradeDef] {
        match self {
            Tier::Prestige => PRESTIGE_UPGRADES,
            Tier::Ascension => ASCENSION_UPGRADES,
            Tier::Transcendence => TRANSCENDENCE_UPGRADES,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct TierUpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub effect: f64,
    pub bonus: BonusKind,
    pub max_level: u32,
}

const fn tier(
    id: &'static str,
    name: &'static str,
    base_cost: f64,
    cost_multiplier: f64,
    effect: f64,
    bonus: BonusKind,
    max_level: u32,
) -> TierUpgradeDef {
    TierUpgradeDef { id, name, base_cost, cost_multiplier, effect, bonus, max_level }
}

pub static PRESTIGE_UPGRADES: &[TierUpgradeDef] = &[
    tier("p1", "Muscle Memory", 1.0, 1.5, 1.2, LiftMult, 100),
    tier("p2", "Fast Metabolism", 1.0, 1.5, 1.2, PassiveMult, 100),
    tier("p3", "Bulk Discount", 2.0, 1.8, 0.95, CostReduction, 50),
    tier("p4", "Power Surge", 5.0, 2.0, 1.5, LiftMult, 50),
    tier("p5", "Macro Master", 5.0, 2.0, 1.5, PassiveMult, 50),
    tier("p6", "Gym Rat Fame", 10.0, 2.5, 1.1, PrestigeMult, 100),
    tier("p7", "Wholesale Gains", 15.0, 2.2, 0.9, CostReduction, 30),
    tier("p8", "Strongman Secrets", 25.0, 2.5, 2.0, LiftMult, 25),
    tier("p9", "Infinite Appetite", 25.0, 2.5, 2.0, PassiveMult, 25),
    tier("p10", "Champion Mindset", 50.0, 3.0, 1.25, PrestigeMult, 20),
    tier("p11", "Total Body Gains", 100.0, 3.0, 1.3, AllMult, 20),
    tier("p12", "Legendary Lifter", 200.0, 4.0, 3.0, LiftMult, 10),
    tier("p13", "Nutrition Mastery", 200.0, 4.0, 3.0, PassiveMult, 10),
    tier("p14", "Prestige Master", 500.0, 5.0, 1.5, PrestigeMult, 10),
];

pub static ASCENSION_UPGRADES: &[TierUpgradeDef] = &[
    tier("a1", "Eternal Strength", 1.0, 2.0, 2.0, LiftMult, 50),
    tier("a2", "Perpetual Growth", 1.0, 2.0, 2.0, PassiveMult, 50),
    tier("a3", "Titan Economy", 2.0, 2.5, 0.8, CostReduction, 20),
    tier("a4", "Protein Synthesis", 3.0, 3.0, 2.0, PpMult, 25),
    tier("a5", "Transcendent Power", 5.0, 4.0, 5.0, AllMult, 15),
    tier("a6", "Ascension Mastery", 10.0, 5.0, 1.5, AscensionMult, 10),
    tier("a7", "Infinite Potential", 25.0, 5.0, 10.0, LiftMult, 10),
    tier("a8", "Cosmic Metabolism", 25.0, 5.0, 10.0, PassiveMult, 10),
];

pub static TRANSCENDENCE_UPGRADES: &[TierUpgradeDef] = &[
    tier("tr1", "Eternal Muscle", 1.0, 2.0, 3.0, LiftMult, 100),
    tier("tr2", "Immortal Metabolism", 1.0, 2.0, 3.0, PassiveMult, 100),
    tier("tr3", "Divine Critical", 2.0, 2.5, 0.02, CritChance, 25),
    tier("tr4", "Devastating Blow", 3.0, 2.5, 1.0, CritMult, 50),
    tier("tr5", "Protein Overflow", 5.0, 3.0, 2.0, PpMult, 30),
    tier("tr6", "Titan Forge", 10.0, 3.5, 2.0, TtMult, 20),
    tier("tr7", "Omnipotent Gains", 25.0, 4.0, 5.0, AllMult, 15),
    tier("tr8", "Transcendent Echo", 50.0, 5.0, 1.5, TranscendenceMult, 10),
];

// ── Achievements ───────────────────────────────────────────────

/// Cumulative statistic an achievement condition reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    LifetimeCalories,
    TotalLifts,
    PrestigeCount,
    AscensionCount,
    PlayTimeSecs,
    MaxCombo,
    CriticalHits,
    UpgradesPurchased,
    DivinityPoints,
    TitanTokens,
    AchievementsUnlocked,
    LocationsUnlocked,
    AlliesHired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    GreaterThan,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Condition {
    pub stat: Stat,
    pub cmp: Comparison,
    pub threshold: f64,
}

const fn at_least(stat: Stat, threshold: f64) -> Condition {
    Condition { stat, cmp: Comparison::AtLeast, threshold }
}

#[derive(Debug, PartialEq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: Condition,
    pub reward: Bonus,
}

use Stat::*;

pub static ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef { id: "ach1", name: "First Rep", description: "Perform your first lift", condition: at_least(TotalLifts, 1.0), reward: bonus(LiftMult, 1.05) },
    AchievementDef { id: "ach2", name: "Warm Up", description: "Burn 1,000 calories", condition: at_least(LifetimeCalories, 1000.0), reward: bonus(PassiveMult, 1.05) },
    AchievementDef { id: "ach3", name: "Getting Serious", description: "Burn 1M calories", condition: at_least(LifetimeCalories, 1e6), reward: bonus(AllMult, 1.1) },
    AchievementDef { id: "ach4", name: "Click Machine", description: "Perform 10,000 lifts", condition: at_least(TotalLifts, 1e4), reward: bonus(LiftMult, 1.15) },
    AchievementDef { id: "ach5", name: "First Prestige", description: "Compete for the first time", condition: at_least(PrestigeCount, 1.0), reward: bonus(PpMult, 1.1) },
    AchievementDef { id: "ach6", name: "Combo Master", description: "Reach a 50x combo", condition: at_least(MaxCombo, 50.0), reward: bonus(CritChance, 0.05) },
    AchievementDef { id: "ach7", name: "Critical Hitter", description: "Land 100 critical lifts", condition: at_least(CriticalHits, 100.0), reward: bonus(CritMult, 0.25) },
    AchievementDef { id: "ach8", name: "Billionaire Gains", description: "Burn 1B calories", condition: at_least(LifetimeCalories, 1e9), reward: bonus(AllMult, 1.25) },
    AchievementDef { id: "ach9", name: "Ascended One", description: "Earn your Pro Card", condition: at_least(AscensionCount, 1.0), reward: bonus(AllMult, 1.5) },
    AchievementDef { id: "ach10", name: "Marathon Lifter", description: "Play for one hour", condition: at_least(PlayTimeSecs, 3600.0), reward: bonus(PassiveMult, 1.2) },
    AchievementDef { id: "ach11", name: "Trillionaire", description: "Burn 1T calories", condition: at_least(LifetimeCalories, 1e12), reward: bonus(AllMult, 2.0) },
    AchievementDef { id: "ach12", name: "Upgrade Addict", description: "Buy 1,000 upgrade levels", condition: at_least(UpgradesPurchased, 1000.0), reward: bonus(AllMult, 1.5) },
    AchievementDef { id: "ach13", name: "Gym Tycoon", description: "Unlock 5 gym locations", condition: at_least(LocationsUnlocked, 5.0), reward: bonus(PassiveMult, 1.3) },
    AchievementDef { id: "ach14", name: "Bro Army", description: "Hire 3 gym bros", condition: at_least(AlliesHired, 3.0), reward: bonus(PassiveMult, 1.2) },
    AchievementDef { id: "ach15", name: "Olympian", description: "Earn 1,000 divinity points", condition: at_least(DivinityPoints, 1000.0), reward: bonus(AllMult, 5.0) },
    AchievementDef {
        id: "ach16",
        name: "Strongest Man Alive",
        description: "Unlock 15 other achievements",
        condition: at_least(AchievementsUnlocked, 15.0),
        reward: bonus(AllMult, 10.0),
    },
];

// ── Synergies ──────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct SynergyRequirement {
    pub upgrade_id: &'static str,
    pub min_level: u32,
}

const fn req(upgrade_id: &'static str, min_level: u32) -> SynergyRequirement {
    SynergyRequirement { upgrade_id, min_level }
}

#[derive(Debug, PartialEq)]
pub struct SynergyDef {
    pub id: &'static str,
    pub name: &'static str,
    pub requirements: &'static [SynergyRequirement],
    pub bonus: Bonus,
}

pub static SYNERGIES: &[SynergyDef] = &[
    SynergyDef { id: "syn1", name: "Protein Power", requirements: &[req("food1", 25), req("food2", 25)], bonus: bonus(PassiveMult, 1.5) },
    SynergyDef { id: "syn2", name: "Iron Will", requirements: &[req("lift2", 25), req("lift3", 25)], bonus: bonus(LiftMult, 1.5) },
    SynergyDef { id: "syn3", name: "Perfect Form", requirements: &[req("lift1", 100)], bonus: bonus(CritMult, 0.5) },
    SynergyDef { id: "syn4", name: "Feast Mode", requirements: &[req("food3", 50), req("food4", 50)], bonus: bonus(PassiveMult, 2.0) },
    SynergyDef { id: "syn5", name: "Olympic Champion", requirements: &[req("lift4", 75)], bonus: bonus(LiftMult, 1.75) },
    SynergyDef { id: "syn6", name: "Cosmic Harmony", requirements: &[req("lift7", 25), req("food7", 25)], bonus: bonus(AllMult, 3.0) },
    SynergyDef { id: "syn7", name: "Universal Balance", requirements: &[req("lift8", 50), req("food8", 50)], bonus: bonus(AllMult, 5.0) },
];

// ── Allies ("gym bros") ────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllyEffect {
    /// `effect * level` automatic lifts every 5 seconds.
    AutoLift,
    /// Adds `effect * level` to crit chance.
    CritChance,
    /// Multiplies passive income by `1 + (effect - 1) * level`.
    PassiveMult,
}

#[derive(Debug, PartialEq)]
pub struct AllyDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub effect: f64,
    pub kind: AllyEffect,
    pub unlock_at: f64,
    pub quote: &'static str,
}

pub static ALLIES: &[AllyDef] = &[
    AllyDef {
        id: "spotter_steve",
        name: "Spotter Steve",
        base_cost: 1000.0,
        cost_multiplier: 1.5,
        effect: 1.0,
        kind: AllyEffect::AutoLift,
        unlock_at: 500.0,
        quote: "It's all you bro!",
    },
    AllyDef {
        id: "screamer_sam",
        name: "Screamer Sam",
        base_cost: 5000.0,
        cost_multiplier: 1.8,
        effect: 0.02,
        kind: AllyEffect::CritChance,
        unlock_at: 2000.0,
        quote: "LIGHT WEIGHT BABY!",
    },
    AllyDef {
        id: "protein_pete",
        name: "Protein Pete",
        base_cost: 15_000.0,
        cost_multiplier: 1.6,
        effect: 1.1,
        kind: AllyEffect::PassiveMult,
        unlock_at: 1e4,
        quote: "Gotta hit those macros.",
    },
];

// ── Ranks ──────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub struct RankDef {
    pub name: &'static str,
    pub min_calories: f64,
    pub bonus: f64,
}

/// Ascending by `min_calories`.
pub static RANKS: &[RankDef] = &[
    RankDef { name: "Couch Potato", min_calories: 0.0, bonus: 1.0 },
    RankDef { name: "Gym Newbie", min_calories: 100.0, bonus: 1.1 },
    RankDef { name: "Regular Lifter", min_calories: 1e4, bonus: 1.2 },
    RankDef { name: "Fitness Enthusiast", min_calories: 1e5, bonus: 1.35 },
    RankDef { name: "Iron Addict", min_calories: 1e6, bonus: 1.5 },
    RankDef { name: "Beast Mode", min_calories: 1e7, bonus: 1.7 },
    RankDef { name: "Titan", min_calories: 1e8, bonus: 2.0 },
    RankDef { name: "Olympian", min_calories: 1e9, bonus: 2.5 },
    RankDef { name: "Ascended", min_calories: 1e10, bonus: 3.0 },
    RankDef { name: "Legend", min_calories: 1e11, bonus: 4.0 },
    RankDef { name: "Immortal", min_calories: 1e12, bonus: 5.0 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_unique<'a>(ids: impl Iterator<Item = &'a str>) {
        let mut seen = HashSet::new();
        for id in ids {
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }

    #[test]
    fn ids_are_unique_per_table() {
        assert_unique(UPGRADES.iter().map(|d| d.id));
        assert_unique(ONE_TIME_UPGRADES.iter().map(|d| d.id));
        assert_unique(EQUIPMENT.iter().map(|d| d.id));
        assert_unique(LOCATIONS.iter().map(|d| d.id));
        assert_unique(CONSUMABLES.iter().map(|d| d.id));
        assert_unique(PRESTIGE_UPGRADES.iter().map(|d| d.id));
        assert_unique(ASCENSION_UPGRADES.iter().map(|d| d.id));
        assert_unique(TRANSCENDENCE_UPGRADES.iter().map(|d| d.id));
        assert_unique(ACHIEVEMENTS.iter().map(|d| d.id));
        assert_unique(SYNERGIES.iter().map(|d| d.id));
        assert_unique(ALLIES.iter().map(|d| d.id));
    }

    #[test]
    fn synergy_requirements_reference_real_upgrades() {
        for syn in SYNERGIES {
            for r in syn.requirements {
                assert!(
                    UPGRADES.iter().any(|u| u.id == r.upgrade_id),
                    "{} references unknown upgrade {}",
                    syn.id,
                    r.upgrade_id
                );
            }
        }
    }

    #[test]
    fn ranks_are_ascending() {
        for pair in RANKS.windows(2) {
            assert!(pair[0].min_calories < pair[1].min_calories);
            assert!(pair[0].bonus < pair[1].bonus);
        }
        assert_eq!(RANKS[0].min_calories, 0.0);
    }

    #[test]
    fn starting_location_is_free() {
        let start = LOCATIONS.iter().find(|l| l.id == STARTING_LOCATION).unwrap();
        assert_eq!(start.cost, 0.0);
        assert_eq!(start.lift_mult, 1.0);
    }

    #[test]
    fn cost_curves_grow() {
        assert!(UPGRADES.iter().all(|u| u.cost_multiplier > 1.0));
        for t in [Tier::Prestige, Tier::Ascension, Tier::Transcendence] {
            assert!(t.defs().iter().all(|u| u.cost_multiplier > 1.0 && u.max_level > 0));
        }
    }

    #[test]
    fn only_multiplier_upgrades_are_capped() {
        for u in UPGRADES {
            assert_eq!(u.max_level.is_some(), u.kind == UpgradeKind::Multiplier, "{}", u.id);
            assert_eq!(u.has_milestones, u.kind != UpgradeKind::Multiplier, "{}", u.id);
        }
    }
}
