//! Daily challenge generation and claiming.

use serde::{Deserialize, Serialize};

use super::state::GymState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeKind {
    BurnCalories,
    DoLifts,
    ReachCombo,
    GetCrits,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 4] = [
        ChallengeKind::BurnCalories,
        ChallengeKind::DoLifts,
        ChallengeKind::ReachCombo,
        ChallengeKind::GetCrits,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChallengeKind::BurnCalories => "Calorie Crusher",
            ChallengeKind::DoLifts => "Lift Marathon",
            ChallengeKind::ReachCombo => "Combo King",
            ChallengeKind::GetCrits => "Critical Strike",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardCurrency {
    Calories,
    ProteinPoints,
    TitanTokens,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub kind: ChallengeKind,
    pub target: f64,
    pub time_limit_secs: u32,
    pub reward_currency: RewardCurrency,
    pub reward: f64,
    pub progress: f64,
    pub completed: bool,
    /// Calendar day (`YYYY-MM-DD`) this challenge belongs to.
    pub date: String,
}

impl DailyChallenge {
    pub fn is_claimable(&self) -> bool {
        !self.completed && self.progress >= self.target
    }

    pub fn description(&self) -> String {
        match self.kind {
            ChallengeKind::BurnCalories => format!("Burn {} calories", self.target),
            ChallengeKind::DoLifts => format!("Complete {} lifts", self.target),
            ChallengeKind::ReachCombo => format!("Reach a {}x combo", self.target),
            ChallengeKind::GetCrits => format!("Land {} critical hits", self.target),
        }
    }
}

/// Build a challenge scaled to the player's progress. `roll` in `[0, 1)` picks the kind.
pub fn generate(total_calories: f64, date: &str, roll: f64) -> DailyChallenge {
    let idx = ((roll * ChallengeKind::ALL.len() as f64) as usize).min(ChallengeKind::ALL.len() - 1);
    let kind = ChallengeKind::ALL[idx];
    let base = (total_calories * 0.1).max(1000.0);

    let (target, time_limit_secs, reward) = match kind {
        ChallengeKind::BurnCalories => (base, 300, (base.sqrt() * 0.1).floor()),
        ChallengeKind::DoLifts => ((base / 100.0).floor(), 180, (base.sqrt() * 0.05).floor()),
        ChallengeKind::ReachCombo => ((20.0 + (total_calories / 1e6).floor()).min(100.0), 60, 5.0),
        ChallengeKind::GetCrits => ((5.0 + (total_calories / 1e7).floor()).min(50.0), 120, 10.0),
    };

    DailyChallenge {
        kind,
        target,
        time_limit_secs,
        reward_currency: if total_calories > 1e9 {
            RewardCurrency::TitanTokens
        } else {
            RewardCurrency::ProteinPoints
        },
        reward,
        progress: 0.0,
        completed: false,
        date: date.to_string(),
    }
}

/// First instant whose ISO string has a five-digit year (10000-01-01).
#[cfg(target_arch = "wasm32")]
const ISO_YEAR_LIMIT_MS: f64 = 253_402_300_800_000.0;

/// UTC calendar day (`YYYY-MM-DD`) of an epoch-millisecond timestamp.
#[cfg(target_arch = "wasm32")]
pub fn date_key(now_ms: f64) -> String {
    if !(0.0..ISO_YEAR_LIMIT_MS).contains(&now_ms) {
        return civil_date_key(now_ms);
    }
    let iso = String::from(js_sys::Date::new(&now_ms.into()).to_iso_string());
    iso.chars().take(10).collect()
}

/// UTC calendar day (`YYYY-MM-DD`) of an epoch-millisecond timestamp.
#[cfg(not(target_arch = "wasm32"))]
pub fn date_key(now_ms: f64) -> String {
    civil_date_key(now_ms)
}

/// Date arithmetic without a JS `Date`; used natively and outside the ISO range.
fn civil_date_key(now_ms: f64) -> String {
    let days = (now_ms / 86_400_000.0).floor() as i64;
    // Civil-from-days, epoch 0000-03-01.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}

/// Replace the challenge if none exists or it belongs to another day.
/// Returns true when a new one was generated.
pub fn refresh_daily(state: &mut GymState, today: &str) -> bool {
    let stale = state.daily_challenge.as_ref().map_or(true, |c| c.date != today);
    if !stale {
        return false;
    }
    let roll = state.next_random();
    let challenge = generate(state.total_calories, today, roll);
    state.add_log(&format!("New daily challenge: {}", challenge.kind.name()), false);
    state.daily_challenge = Some(challenge);
    true
}

/// Pay out a finished challenge once.
pub fn claim_daily_challenge(state: &mut GymState) -> bool {
    let Some(challenge) = state.daily_challenge.as_mut() else {
        return false;
    };
    if !challenge.is_claimable() {
        return false;
    }
    challenge.completed = true;
    let (currency, reward) = (challenge.reward_currency, challenge.reward);
    match currency {
        RewardCurrency::Calories => state.calories += reward,
        RewardCurrency::ProteinPoints => state.protein_points += reward,
        RewardCurrency::TitanTokens => state.titan_tokens += reward,
    }
    state.add_log("Daily challenge complete!", true);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_formats_utc_day() {
        assert_eq!(date_key(0.0), "1970-01-01");
        assert_eq!(date_key(86_399_999.0), "1970-01-01");
        assert_eq!(date_key(86_400_000.0), "1970-01-02");
        // 2024-02-29T12:00:00Z
        assert_eq!(date_key(1_709_208_000_000.0), "2024-02-29");
        // 2000-03-01T00:00:00Z
        assert_eq!(date_key(951_868_800_000.0), "2000-03-01");
    }

    #[test]
    fn civil_date_key_outside_iso_range() {
        assert_eq!(civil_date_key(-1.0), "1969-12-31");
        assert_eq!(civil_date_key(253_402_300_800_000.0), "10000-01-01");
    }

    #[test]
    fn roll_selects_kind() {
        assert_eq!(generate(0.0, "d", 0.0).kind, ChallengeKind::BurnCalories);
        assert_eq!(generate(0.0, "d", 0.3).kind, ChallengeKind::DoLifts);
        assert_eq!(generate(0.0, "d", 0.6).kind, ChallengeKind::ReachCombo);
        assert_eq!(generate(0.0, "d", 0.99).kind, ChallengeKind::GetCrits);
    }

    #[test]
    fn early_game_targets() {
        let burn = generate(0.0, "d", 0.0);
        assert_eq!(burn.target, 1000.0);
        assert_eq!(burn.reward, 3.0); // floor(sqrt(1000) * 0.1)
        assert_eq!(burn.reward_currency, RewardCurrency::ProteinPoints);

        let lifts = generate(0.0, "d", 0.3);
        assert_eq!(lifts.target, 10.0);
        assert_eq!(lifts.reward, 1.0);
    }

    #[test]
    fn caps_and_late_game_currency() {
        let combo = generate(1e12, "d", 0.6);
        assert_eq!(combo.target, 100.0);
        let crits = generate(1e12, "d", 0.99);
        assert_eq!(crits.target, 50.0);
        assert_eq!(crits.reward_currency, RewardCurrency::TitanTokens);
    }

    #[test]
    fn refresh_only_when_stale() {
        let mut state = GymState::new();
        assert!(refresh_daily(&mut state, "2024-01-01"));
        let first = state.daily_challenge.clone();
        assert!(!refresh_daily(&mut state, "2024-01-01"));
        assert_eq!(state.daily_challenge, first);
        assert!(refresh_daily(&mut state, "2024-01-02"));
        assert_eq!(state.daily_challenge.as_ref().unwrap().date, "2024-01-02");
    }

    #[test]
    fn claim_pays_once() {
        let mut state = GymState::new();
        let mut c = generate(0.0, "d", 0.0);
        state.daily_challenge = Some(c.clone());
        assert!(!claim_daily_challenge(&mut state));
        c.progress = c.target;
        state.daily_challenge = Some(c);
        assert!(claim_daily_challenge(&mut state));
        assert_eq!(state.protein_points, 3.0);
        assert!(!claim_daily_challenge(&mut state));
        assert_eq!(state.protein_points, 3.0);
    }

    #[test]
    fn claim_without_challenge_is_noop() {
        let mut state = GymState::new();
        assert!(!claim_daily_challenge(&mut state));
    }
}
