//! Tiered resets: compete (protein points), ascend (titan tokens) and
//! transcend (divinity points).
//!
//! Each tier converts the currency of the tier below into its own via
//! `floor((source / threshold)^exponent * mult)`. Higher tiers wipe
//! everything a lower tier would, plus the lower tier's own progress.

use super::catalog::Tier;
use super::multipliers::{self, Multipliers};
use super::state::{
    fresh_allies, fresh_consumables, fresh_equipment, fresh_locations, fresh_one_time_upgrades,
    fresh_tier_upgrades, fresh_upgrades, starting_location_index, GymState, PendingGains,
};

/// Source amount needed before a tier's reset pays anything.
pub fn threshold(tier: Tier) -> f64 {
    match tier {
        Tier::Prestige => 1e7,
        Tier::Ascension => 1000.0,
        Tier::Transcendence => 1000.0,
    }
}

pub fn exponent(tier: Tier) -> f64 {
    match tier {
        Tier::Prestige => 0.45,
        Tier::Ascension => 0.6,
        Tier::Transcendence => 0.5,
    }
}

/// Currency consumed by a tier's reset: run calories, then protein points, then titan tokens.
pub fn source_amount(state: &GymState, tier: Tier) -> f64 {
    match tier {
        Tier::Prestige => state.total_calories,
        Tier::Ascension => state.protein_points,
        Tier::Transcendence => state.titan_tokens,
    }
}

pub fn payout_mult(m: &Multipliers, tier: Tier) -> f64 {
    match tier {
        Tier::Prestige => m.prestige_mult * m.pp_mult,
        Tier::Ascension => m.ascension_mult * m.tt_mult,
        Tier::Transcendence => m.transcendence_mult,
    }
}

/// Payout for `source`; zero below the threshold.
pub fn payout_for(tier: Tier, source: f64, mult: f64) -> f64 {
    let t = threshold(tier);
    if source < t {
        return 0.0;
    }
    ((source / t).powf(exponent(tier)) * mult).floor().max(0.0)
}

/// Inverse of `payout_for`: source needed for `target` points.
/// Returns 0 when `mult` is zero.
pub fn source_for(tier: Tier, target: f64, mult: f64) -> f64 {
    if mult == 0.0 {
        return 0.0;
    }
    threshold(tier) * (target / mult).powf(1.0 / exponent(tier))
}

pub fn potential_payout(state: &GymState, tier: Tier, now_ms: f64) -> f64 {
    let m = multipliers::compute(state, now_ms);
    payout_for(tier, source_amount(state, tier), payout_mult(&m, tier))
}

/// Source amount at which the potential payout reaches one more point.
pub fn next_point_at(state: &GymState, tier: Tier, now_ms: f64) -> f64 {
    let m = multipliers::compute(state, now_ms);
    let mult = payout_mult(&m, tier);
    let current = payout_for(tier, source_amount(state, tier), mult);
    source_for(tier, current + 1.0, mult).max(threshold(tier))
}

pub fn can_reset(state: &GymState, tier: Tier, now_ms: f64) -> bool {
    potential_payout(state, tier, now_ms) >= 1.0
}

fn reset_run(state: &mut GymState) {
    state.calories = 0.0;
    state.total_calories = 0.0;
    state.upgrades = fresh_upgrades();
    state.one_time_upgrades = fresh_one_time_upgrades();
    state.equipment = fresh_equipment();
    state.locations = fresh_locations();
    state.current_location = starting_location_index();
    state.consumables = fresh_consumables();
    state.combo = 0;
    state.last_lift_ms = None;
    state.recent_clicks.clear();
    state.pending = PendingGains::default();
}

fn reset_prestige_tier(state: &mut GymState) {
    reset_run(state);
    state.protein_points = 0.0;
    state.prestige_upgrades = fresh_tier_upgrades(Tier::Prestige);
    state.allies = fresh_allies();
    state.prestige_count = 0;
}

fn reset_ascension_tier(state: &mut GymState) {
    reset_prestige_tier(state);
    state.titan_tokens = 0.0;
    state.ascension_upgrades = fresh_tier_upgrades(Tier::Ascension);
    state.ascension_count = 0;
}

/// Tier 1 reset. Returns protein points earned (0 when not eligible).
pub fn compete(state: &mut GymState, now_ms: f64) -> f64 {
    let payout = potential_payout(state, Tier::Prestige, now_ms);
    if payout < 1.0 {
        return 0.0;
    }
    reset_run(state);
    state.protein_points += payout;
    state.prestige_count += 1;
    state.add_log(&format!("Competed! +{payout} Protein Points"), true);
    payout
}

/// Tier 2 reset. Returns titan tokens earned.
pub fn ascend(state: &mut GymState, now_ms: f64) -> f64 {
    let payout = potential_payout(state, Tier::Ascension, now_ms);
    if payout < 1.0 {
        return 0.0;
    }
    reset_prestige_tier(state);
    state.titan_tokens += payout;
    state.ascension_count += 1;
    state.add_log(&format!("Pro Card earned! +{payout} Titan Tokens"), true);
    payout
}

/// Tier 3 reset. Returns divinity points earned.
pub fn transcend(state: &mut GymState, now_ms: f64) -> f64 {
    let payout = potential_payout(state, Tier::Transcendence, now_ms);
    if payout < 1.0 {
        return 0.0;
    }
    reset_ascension_tier(state);
    state.divinity_points += payout;
    state.transcendence_count += 1;
    state.add_log(&format!("Transcended to Olympia! +{payout} Divinity Points"), true);
    payout
}

pub fn reset_tier(state: &mut GymState, tier: Tier, now_ms: f64) -> f64 {
    match tier {
        Tier::Prestige => compete(state, now_ms),
        Tier::Ascension => ascend(state, now_ms),
        Tier::Transcendence => transcend(state, now_ms),
    }
}

/// Buy one level of a tier upgrade with that tier's currency.
pub fn buy_tier_upgrade(state: &mut GymState, tier: Tier, idx: usize) -> bool {
    let Some(upgrade) = state.tier_upgrades(tier).get(idx) else {
        return false;
    };
    if upgrade.is_maxed() {
        return false;
    }
    let cost = upgrade.cost();
    if state.tier_currency(tier) < cost {
        return false;
    }
    *state.tier_currency_mut(tier) -= cost;
    state.tier_upgrades_mut(tier)[idx].level += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::gym::catalog::STARTING_LOCATION;

    fn ready_to_compete() -> GymState {
        let mut s = GymState::new();
        s.total_calories = 1e7;
        s.calories = 5e6;
        s.lifetime_calories = 3e7;
        s.upgrades[0].level = 40;
        s.one_time_upgrades[0].purchased = true;
        s.equipment[0].purchased = true;
        s.locations[1].unlocked = true;
        s.current_location = 1;
        s.consumables[0].uses = 3;
        s.consumables[0].active_until_ms = Some(1e12);
        s.combo = 7;
        s.prestige_upgrades[0].level = 2;
        s.allies[0].level = 4;
        s
    }

    #[test]
    fn payout_at_threshold_is_one() {
        assert_eq!(payout_for(Tier::Prestige, 1e7, 1.0), 1.0);
        assert_eq!(payout_for(Tier::Prestige, 9.99e6, 1.0), 0.0);
        // (1e9 / 1e7)^0.45 = 100^0.45 ≈ 7.94
        assert_eq!(payout_for(Tier::Prestige, 1e9, 1.0), 7.0);
        assert_eq!(payout_for(Tier::Ascension, 1000.0, 1.0), 1.0);
        assert_eq!(payout_for(Tier::Transcendence, 4000.0, 1.0), 2.0);
    }

    #[test]
    fn inverse_matches_payout() {
        for tier in [Tier::Prestige, Tier::Ascension, Tier::Transcendence] {
            let needed = source_for(tier, 5.0, 1.5);
            assert_eq!(payout_for(tier, needed * 1.000_001, 1.5), 5.0);
            assert_eq!(payout_for(tier, needed * 0.999, 1.5), 4.0);
        }
        assert_eq!(source_for(Tier::Prestige, 3.0, 0.0), 0.0);
    }

    #[test]
    fn next_point_never_below_threshold() {
        let s = GymState::new();
        assert_eq!(next_point_at(&s, Tier::Prestige, 0.0), 1e7);
    }

    #[test]
    fn compete_requires_payout() {
        let mut s = GymState::new();
        s.total_calories = 5e6;
        s.calories = 5e6;
        assert_eq!(compete(&mut s, 0.0), 0.0);
        assert_eq!(s.calories, 5e6);
        assert_eq!(s.prestige_count, 0);
    }

    #[test]
    fn compete_resets_run_and_keeps_tier() {
        let mut s = ready_to_compete();
        let expected = potential_payout(&s, Tier::Prestige, 0.0);
        assert!(expected >= 1.0);
        let pp = compete(&mut s, 0.0);
        assert_eq!(pp, expected);
        assert_eq!(s.protein_points, pp);
        assert_eq!(s.calories, 0.0);
        assert_eq!(s.total_calories, 0.0);
        assert_eq!(s.lifetime_calories, 3e7);
        assert!(s.upgrades.iter().all(|u| u.level == 0));
        assert!(s.one_time_upgrades.iter().all(|u| !u.purchased));
        assert!(s.equipment.iter().all(|e| !e.purchased));
        assert_eq!(s.locations.iter().filter(|l| l.unlocked).count(), 1);
        assert_eq!(s.current_location_def().id, STARTING_LOCATION);
        assert_eq!(s.consumables[0].uses, 0);
        assert!(s.consumables[0].active_until_ms.is_none());
        assert_eq!(s.combo, 0);
        assert_eq!(s.prestige_count, 1);
        // tier-1 tree and allies survive
        assert_eq!(s.prestige_upgrades[0].level, 2);
        assert_eq!(s.allies[0].level, 4);
    }

    #[test]
    fn ascend_wipes_tier_one() {
        let mut s = ready_to_compete();
        s.protein_points = 1000.0;
        s.prestige_count = 5;
        s.titan_tokens = 2.0;
        let tt = ascend(&mut s, 0.0);
        assert_eq!(tt, 1.0);
        assert_eq!(s.titan_tokens, 3.0);
        assert_eq!(s.protein_points, 0.0);
        assert_eq!(s.prestige_count, 0);
        assert_eq!(s.ascension_count, 1);
        assert!(s.prestige_upgrades.iter().all(|u| u.level == 0));
        assert!(s.allies.iter().all(|a| a.level == 0));
        assert!(s.upgrades.iter().all(|u| u.level == 0));
    }

    #[test]
    fn transcend_wipes_tier_two() {
        let mut s = GymState::new();
        s.titan_tokens = 1000.0;
        s.ascension_count = 3;
        s.prestige_count = 2;
        s.ascension_upgrades[0].level = 4;
        s.transcendence_upgrades[0].level = 1;
        s.divinity_points = 1.0;
        let dp = transcend(&mut s, 0.0);
        assert_eq!(dp, 1.0);
        assert_eq!(s.divinity_points, 2.0);
        assert_eq!(s.titan_tokens, 0.0);
        assert_eq!(s.ascension_count, 0);
        assert_eq!(s.prestige_count, 0);
        assert_eq!(s.transcendence_count, 1);
        assert_eq!(s.ascension_upgrades[0].level, 0);
        assert_eq!(s.transcendence_upgrades[0].level, 1);
    }

    #[test]
    fn tier_multipliers_scale_payout() {
        let mut s = GymState::new();
        s.total_calories = 1e7;
        s.prestige_upgrades[5].level = 10; // p6 1.1^10 ≈ 2.59
        assert_eq!(potential_payout(&s, Tier::Prestige, 0.0), 2.0);
    }

    #[test]
    fn tier_upgrade_purchase() {
        let mut s = GymState::new();
        assert!(!buy_tier_upgrade(&mut s, Tier::Prestige, 0));
        s.protein_points = 2.5;
        assert!(buy_tier_upgrade(&mut s, Tier::Prestige, 0));
        assert_eq!(s.protein_points, 1.5);
        assert_eq!(s.prestige_upgrades[0].level, 1);
        // floor(1.5) = 1
        assert!(buy_tier_upgrade(&mut s, Tier::Prestige, 0));
        assert_eq!(s.protein_points, 0.5);

        s.titan_tokens = 1.0;
        assert!(buy_tier_upgrade(&mut s, Tier::Ascension, 0));
        assert_eq!(s.ascension_upgrades[0].level, 1);
        assert!(!buy_tier_upgrade(&mut s, Tier::Ascension, 99));
    }

    #[test]
    fn maxed_tier_upgrade_rejected() {
        let mut s = GymState::new();
        s.divinity_points = 1e300;
        let last = s.transcendence_upgrades.len() - 1;
        s.transcendence_upgrades[last].level = s.transcendence_upgrades[last].def.max_level;
        assert!(!buy_tier_upgrade(&mut s, Tier::Transcendence, last));
    }
}
