//! Multiplier aggregation: folds every bonus source in the ledger into one
//! immutable snapshot, plus the derived lift power / passive income scalars.
//!
//! Pure: depends only on the ledger and the caller-supplied wall clock
//! (for consumable expiry). Recompute freely.

use super::catalog::{AllyEffect, Bonus, BonusKind, ConsumableEffect, Tier, UpgradeKind, SYNERGIES};
use super::economy::{milestone_multiplier, rank_bonus};
use super::state::{GymState, UpgradeState};

pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const BASE_CRIT_MULT: f64 = 2.0;
pub const BASE_MAX_COMBO: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Multipliers {
    pub lift_mult: f64,
    pub passive_mult: f64,
    pub all_mult: f64,
    /// Product of `effect^level` over "multiplier"-type standard upgrades.
    pub upgrade_mult: f64,
    pub cost_reduction: f64,
    pub crit_chance: f64,
    pub crit_mult: f64,
    pub combo_mult: f64,
    pub max_combo: u32,
    pub prestige_mult: f64,
    pub pp_mult: f64,
    pub ascension_mult: f64,
    pub tt_mult: f64,
    pub transcendence_mult: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            lift_mult: 1.0,
            passive_mult: 1.0,
            all_mult: 1.0,
            upgrade_mult: 1.0,
            cost_reduction: 1.0,
            crit_chance: BASE_CRIT_CHANCE,
            crit_mult: BASE_CRIT_MULT,
            combo_mult: 1.0,
            max_combo: BASE_MAX_COMBO,
            prestige_mult: 1.0,
            pp_mult: 1.0,
            ascension_mult: 1.0,
            tt_mult: 1.0,
            transcendence_mult: 1.0,
        }
    }
}

impl Multipliers {
    /// Route one contribution into its bucket (additive buckets add, the rest multiply).
    pub fn apply(&mut self, kind: BonusKind, value: f64) {
        match kind {
            BonusKind::LiftMult => self.lift_mult *= value,
            BonusKind::PassiveMult => self.passive_mult *= value,
            BonusKind::AllMult => self.all_mult *= value,
            BonusKind::CostReduction => self.cost_reduction *= value,
            BonusKind::CritChance => self.crit_chance += value,
            BonusKind::CritMult => self.crit_mult += value,
            BonusKind::ComboMult => self.combo_mult *= value,
            BonusKind::ComboMax => self.max_combo = self.max_combo.saturating_add(value.max(0.0) as u32),
            BonusKind::PrestigeMult => self.prestige_mult *= value,
            BonusKind::PpMult => self.pp_mult *= value,
            BonusKind::AscensionMult => self.ascension_mult *= value,
            BonusKind::TtMult => self.tt_mult *= value,
            BonusKind::TranscendenceMult => self.transcendence_mult *= value,
        }
    }

    fn apply_bonus(&mut self, bonus: &Bonus) {
        self.apply(bonus.kind, bonus.value);
    }
}

/// Whether every requirement of synergy `idx` is met.
pub fn synergy_active(state: &GymState, idx: usize) -> bool {
    SYNERGIES
        .get(idx)
        .is_some_and(|syn| syn.requirements.iter().all(|r| state.upgrade_level(r.upgrade_id) >= r.min_level))
}

pub fn compute(state: &GymState, now_ms: f64) -> Multipliers {
    let mut m = Multipliers::default();

    for u in state.upgrades.iter().filter(|u| u.def.kind == UpgradeKind::Multiplier && u.level > 0) {
        m.upgrade_mult *= u.def.effect.powi(u.level as i32);
    }

    // Allies: crit chance adds, passive compounds linearly.
    for ally in state.allies.iter().filter(|a| a.level > 0) {
        let level = ally.level as f64;
        match ally.def.kind {
            AllyEffect::CritChance => m.crit_chance += ally.def.effect * level,
            AllyEffect::PassiveMult => m.passive_mult *= 1.0 + (ally.def.effect - 1.0) * level,
            AllyEffect::AutoLift => {}
        }
    }

    for tier in [Tier::Prestige, Tier::Ascension, Tier::Transcendence] {
        for u in state.tier_upgrades(tier).iter().filter(|u| u.level > 0) {
            let total = if tier == Tier::Transcendence && u.def.bonus.is_additive() {
                u.def.effect * u.level as f64
            } else {
                u.def.effect.powi(u.level as i32)
            };
            m.apply(u.def.bonus, total);
        }
    }

    for u in state.one_time_upgrades.iter().filter(|u| u.purchased) {
        m.apply_bonus(&u.def.bonus);
    }

    for eq in state.equipment.iter().filter(|e| e.purchased) {
        for b in eq.def.bonuses {
            m.apply_bonus(b);
        }
    }

    if let Some(loc) = state.locations.get(state.current_location).filter(|l| l.unlocked) {
        m.lift_mult *= loc.def.lift_mult;
        m.passive_mult *= loc.def.passive_mult;
        m.pp_mult *= loc.def.pp_mult;
    }

    for ach in state.achievements.iter().filter(|a| a.unlocked) {
        m.apply_bonus(&ach.def.reward);
    }

    for c in state.consumables.iter().filter(|c| c.is_active(now_ms)) {
        if let ConsumableEffect::Timed(b) = &c.def.effect {
            m.apply_bonus(b);
        }
    }

    for (idx, syn) in SYNERGIES.iter().enumerate() {
        if synergy_active(state, idx) {
            m.apply_bonus(&syn.bonus);
        }
    }

    m.crit_chance = m.crit_chance.min(1.0);
    m
}

fn base_sum(upgrades: &[UpgradeState], kind: UpgradeKind) -> f64 {
    upgrades
        .iter()
        .filter(|u| u.def.kind == kind)
        .map(|u| {
            let milestone = if u.def.has_milestones { milestone_multiplier(u.level) } else { 1.0 };
            u.def.effect * u.level as f64 * milestone
        })
        .sum()
}

/// Calories per lift before combo and crit.
pub fn lift_power(state: &GymState, m: &Multipliers) -> f64 {
    let base = 1.0 + base_sum(&state.upgrades, UpgradeKind::Lift);
    base * m.upgrade_mult * m.lift_mult * m.all_mult * rank_bonus(state.total_calories)
}

/// Calories per second.
pub fn passive_income(state: &GymState, m: &Multipliers) -> f64 {
    let base = base_sum(&state.upgrades, UpgradeKind::Passive);
    base * m.upgrade_mult * m.passive_mult * m.all_mult * rank_bonus(state.total_calories)
}

/// Ally auto-lifts per second (`effect * level` per 5 s).
pub fn auto_lifts_per_sec(state: &GymState) -> f64 {
    state
        .allies
        .iter()
        .filter(|a| a.def.kind == AllyEffect::AutoLift && a.level > 0)
        .map(|a| a.def.effect * a.level as f64)
        .sum::<f64>()
        / 5.0
}
