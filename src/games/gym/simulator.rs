//! Balance simulator for Gym Gains.
//! Run with: cargo test -p gym-gains simulate_ -- --nocapture

#[cfg(test)]
mod tests {
    use crate::games::gym::catalog::{Tier, UpgradeKind};
    use crate::games::gym::economy::upgrade_cost;
    use crate::games::gym::format::{format_number, format_time, Notation};
    use crate::games::gym::logic;
    use crate::games::gym::multipliers::{self, lift_power, passive_income};
    use crate::games::gym::prestige;
    use crate::games::gym::state::GymState;

    const LIFTS_PER_SECOND: u32 = 5;

    fn fmt(n: f64) -> String {
        format_number(n, Notation::Standard)
    }

    /// Cheapest affordable lift/passive upgrade level.
    fn find_cheapest(state: &GymState, now_ms: f64) -> Option<usize> {
        let reduction = multipliers::compute(state, now_ms).cost_reduction;
        state
            .upgrades
            .iter()
            .enumerate()
            .filter(|(_, u)| u.def.kind != UpgradeKind::Multiplier)
            .filter(|(_, u)| u.is_unlocked(state.total_calories) && !u.is_maxed())
            .map(|(i, u)| (i, upgrade_cost(u.def, u.level, reduction)))
            .filter(|(_, cost)| *cost <= state.calories)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn report_stats(state: &GymState, seconds: u32, now_ms: f64) {
        let m = multipliers::compute(state, now_ms);
        eprintln!("┌─── {} ─────────────────────────", format_time(seconds as f64));
        eprintln!(
            "│ Calories: {}  Total: {}  /lift: {}  /s: {}",
            fmt(state.calories),
            fmt(state.total_calories),
            fmt(lift_power(state, &m)),
            fmt(passive_income(state, &m))
        );
        let levels: Vec<String> = state
            .upgrades
            .iter()
            .filter(|u| u.level > 0)
            .map(|u| format!("{}:{}", u.def.id, u.level))
            .collect();
        eprintln!("│ レベル: {}", levels.join("  "));
        eprintln!("└────────────────────────────────────");
    }

    /// Play greedily until the first Competition is available.
    /// Returns the simulated seconds it took, or `None` past `limit_secs`.
    fn simulate_to_competition(limit_secs: u32) -> Option<u32> {
        let mut state = GymState::new();
        let mut now_ms = 0.0;
        let report_times = [60, 300, 900, 1800, 3600];
        let mut next_report = 0;

        for second in 1..=limit_secs {
            let start = now_ms;
            for i in 0..LIFTS_PER_SECOND {
                let t = start + i as f64 * (1000.0 / LIFTS_PER_SECOND as f64);
                logic::lift(&mut state, t);
            }
            now_ms = start + 1000.0;
            logic::tick(&mut state, 1.0, now_ms);

            for _ in 0..50 {
                match find_cheapest(&state, now_ms) {
                    Some(idx) if logic::purchase_upgrade(&mut state, idx, now_ms) => {}
                    _ => break,
                }
            }

            if next_report < report_times.len() && second >= report_times[next_report] {
                report_stats(&state, second, now_ms);
                next_report += 1;
            }
            if prestige::can_reset(&state, Tier::Prestige, now_ms) {
                report_stats(&state, second, now_ms);
                return Some(second);
            }
        }
        report_stats(&state, limit_secs, now_ms);
        None
    }

    #[test]
    fn simulate_first_competition_within_two_hours() {
        let reached = simulate_to_competition(2 * 3600);
        eprintln!("初回Competition: {:?}", reached.map(|s| format_time(s as f64)));
        assert!(reached.is_some());
    }
}
