//! Cost curves, milestone breakpoints, bulk-purchase arithmetic and rank lookup.
//!
//! Everything here is a pure function of its arguments.

use serde::{Deserialize, Serialize};

use super::catalog::{RankDef, UpgradeDef, RANKS};

/// Levels at which a milestone-flagged upgrade gets a one-off effect jump.
pub const MILESTONE_THRESHOLDS: [u32; 5] = [10, 25, 50, 75, 100];
const MILESTONE_FACTORS: [f64; 5] = [1.5, 1.4, 1.3, 1.2, 1.5];
/// Past level 100 every 50 levels adds another factor.
const LATE_MILESTONE_STEP: u32 = 50;
const LATE_MILESTONE_FACTOR: f64 = 1.05;

/// Upper bound on a single "max" bulk purchase.
pub const MAX_BULK_UNITS: u32 = 1000;

/// Batch size selection for upgrade purchases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyAmount {
    Exact(u32),
    NextMilestone,
    Max,
}

impl Default for BuyAmount {
    fn default() -> Self {
        BuyAmount::Exact(1)
    }
}

impl BuyAmount {
    /// The presets the UI cycles through.
    pub const PRESETS: [BuyAmount; 7] = [
        BuyAmount::Exact(1),
        BuyAmount::Exact(10),
        BuyAmount::Exact(25),
        BuyAmount::Exact(50),
        BuyAmount::Exact(100),
        BuyAmount::NextMilestone,
        BuyAmount::Max,
    ];

    pub fn next(self) -> BuyAmount {
        let idx = Self::PRESETS.iter().position(|p| *p == self).unwrap_or(0);
        Self::PRESETS[(idx + 1) % Self::PRESETS.len()]
    }

    pub fn label(self) -> String {
        match self {
            BuyAmount::Exact(n) => format!("x{n}"),
            BuyAmount::NextMilestone => "NEXT".to_string(),
            BuyAmount::Max => "MAX".to_string(),
        }
    }
}

/// Generic geometric price: `floor(base * mult^level * reduction)`.
pub fn cost_at(base_cost: f64, cost_multiplier: f64, level: u32, cost_reduction: f64) -> f64 {
    (base_cost * cost_multiplier.powi(level as i32) * cost_reduction).floor()
}

/// Price of the next level of a standard upgrade.
pub fn upgrade_cost(def: &UpgradeDef, level: u32, cost_reduction: f64) -> f64 {
    cost_at(def.base_cost, def.cost_multiplier, level, cost_reduction)
}

/// Exact sum of per-level floored costs for levels `from..to`.
pub fn cost_to_level(def: &UpgradeDef, from: u32, to: u32, cost_reduction: f64) -> f64 {
    (from..to).map(|l| upgrade_cost(def, l, cost_reduction)).sum()
}

/// Closed-form approximation of the package price used by auto-buy:
/// the first level's floored price grown geometrically.
pub fn geometric_package_cost(first_cost: f64, ratio: f64, count: u32) -> f64 {
    if (ratio - 1.0).abs() < f64::EPSILON {
        first_cost * count as f64
    } else {
        (first_cost * (ratio.powi(count as i32) - 1.0) / (ratio - 1.0)).floor()
    }
}

/// Step-function effect multiplier for milestone-flagged upgrades.
pub fn milestone_multiplier(level: u32) -> f64 {
    let mut mult = 1.0;
    for (threshold, factor) in MILESTONE_THRESHOLDS.iter().zip(MILESTONE_FACTORS) {
        if level >= *threshold {
            mult *= factor;
        }
    }
    if level >= 100 + LATE_MILESTONE_STEP {
        let extra = (level - 100) / LATE_MILESTONE_STEP;
        mult *= LATE_MILESTONE_FACTOR.powi(extra as i32);
    }
    mult
}

/// Smallest milestone strictly above `level`.
pub fn next_milestone(level: u32) -> u32 {
    if let Some(t) = MILESTONE_THRESHOLDS.iter().find(|t| level < **t) {
        return *t;
    }
    let block = (level - 100) / LATE_MILESTONE_STEP;
    100 + (block + 1) * LATE_MILESTONE_STEP
}

/// Whether reaching `level` crosses a milestone boundary.
pub fn is_milestone(level: u32) -> bool {
    MILESTONE_THRESHOLDS.contains(&level) || (level > 100 && (level - 100) % LATE_MILESTONE_STEP == 0)
}

/// Outcome of resolving a batch request against one upgrade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulkQuote {
    pub count: u32,
    pub total_cost: f64,
}

/// Resolve a batch request into a whole number of levels and their exact price.
///
/// `Exact` and `NextMilestone` quote the full batch regardless of budget (the
/// caller decides affordability); `Max` stops at the last level that fits in
/// `available`. When nothing fits, `Max` returns `count == 0` together with the
/// price of the next single level so the UI can show what is missing.
pub fn bulk_quote(def: &UpgradeDef, level: u32, available: f64, amount: BuyAmount, cost_reduction: f64) -> BulkQuote {
    let wanted = match amount {
        BuyAmount::Exact(n) => n,
        BuyAmount::NextMilestone => next_milestone(level).saturating_sub(level).max(1),
        BuyAmount::Max => MAX_BULK_UNITS,
    };
    let room = def.max_level_or_inf().saturating_sub(level);
    if room == 0 {
        return BulkQuote { count: 0, total_cost: 0.0 };
    }
    let target = wanted.min(room);

    let mut total = 0.0;
    let mut count = 0;
    for i in 0..target {
        let unit = upgrade_cost(def, level + i, cost_reduction);
        if amount == BuyAmount::Max && total + unit > available {
            break;
        }
        total += unit;
        count += 1;
    }

    if amount == BuyAmount::Max && count == 0 {
        return BulkQuote { count: 0, total_cost: upgrade_cost(def, level, cost_reduction) };
    }
    BulkQuote { count, total_cost: total }
}

/// Highest rank whose threshold does not exceed `total_calories`.
pub fn current_rank(total_calories: f64) -> (usize, &'static RankDef) {
    let idx = RANKS.iter().rposition(|r| total_calories >= r.min_calories).unwrap_or(0);
    (idx, &RANKS[idx])
}

pub fn rank_bonus(total_calories: f64) -> f64 {
    current_rank(total_calories).1.bonus
}
