//! Coordinating wall-clock scheduler.
//!
//! `draw_web()` calls at ~60fps with variable delta. Instead of one browser
//! timer per periodic job, every job is a `Task` slot with its own period and
//! `update()` reports, in a fixed order, each task whose deadline has passed.
//! Game logic stays a pure function of the reported elapsed time, so it is
//! fully testable without timers.

/// Main tick period in normal mode.
pub const MAIN_TICK_MS: f64 = 250.0;
/// Main tick period in low-activity mode.
pub const LOW_ACTIVITY_TICK_MS: f64 = 1000.0;
pub const ANALYTICS_MS: f64 = 1000.0;
pub const AUTO_BUY_MS: f64 = 1000.0;
pub const AUTO_SAVE_MS: f64 = 5000.0;
/// Longest elapsed span ever reported for one firing (tab backgrounded for hours).
pub const MAX_ELAPSED_MS: f64 = 8.0 * 3600.0 * 1000.0;

/// Periodic jobs, in the order they are reported within one wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    MainTick,
    Analytics,
    AutoBuy,
    AllyAutoLift,
    AutoSave,
}

impl Task {
    pub const ALL: [Task; 5] = [
        Task::MainTick,
        Task::Analytics,
        Task::AutoBuy,
        Task::AllyAutoLift,
        Task::AutoSave,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// One due task and the real time since it last fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fired {
    pub task: Task,
    pub elapsed_secs: f64,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    /// `None` = disabled.
    period_ms: Option<f64>,
    /// Timestamp of the last firing (or of arming), None until first update.
    last_ms: Option<f64>,
}

pub struct Scheduler {
    slots: [Slot; 5],
    /// Set by `cancel_all`; nothing fires until `end_reset`.
    cancelled: bool,
    /// Suppresses `AutoSave` during a hard reset.
    resetting: bool,
}

impl Scheduler {
    pub fn new(low_activity: bool) -> Self {
        let slot = |period_ms| Slot { period_ms, last_ms: None };
        Self {
            slots: [
                slot(Some(main_tick_period(low_activity))),
                slot(Some(ANALYTICS_MS)),
                slot(Some(AUTO_BUY_MS)),
                slot(None),
                slot(Some(AUTO_SAVE_MS)),
            ],
            cancelled: false,
            resetting: false,
        }
    }

    pub fn period(&self, task: Task) -> Option<f64> {
        self.slots[task.slot()].period_ms
    }

    /// Change (or disable with `None`) a task's period. The next deadline is
    /// measured from its previous firing.
    pub fn set_period(&mut self, task: Task, period_ms: Option<f64>) {
        let slot = &mut self.slots[task.slot()];
        if slot.period_ms.is_none() && period_ms.is_some() {
            slot.last_ms = None;
        }
        slot.period_ms = period_ms.filter(|p| *p > 0.0);
    }

    pub fn set_low_activity(&mut self, low_activity: bool) {
        self.set_period(Task::MainTick, Some(main_tick_period(low_activity)));
    }

    /// Feed the wall-clock timestamp once per frame.
    ///
    /// Each due task is reported once with the whole elapsed span, however many
    /// periods were missed.
    pub fn update(&mut self, now_ms: f64) -> Vec<Fired> {
        let mut fired = Vec::new();
        if self.cancelled {
            return fired;
        }
        for task in Task::ALL {
            let resetting = self.resetting;
            let slot = &mut self.slots[task.slot()];
            let Some(period) = slot.period_ms else {
                continue;
            };
            let Some(last) = slot.last_ms else {
                slot.last_ms = Some(now_ms);
                continue;
            };
            let elapsed = now_ms - last;
            if elapsed < 0.0 {
                // Clock went backwards: re-arm.
                slot.last_ms = Some(now_ms);
                continue;
            }
            if elapsed < period || (task == Task::AutoSave && resetting) {
                continue;
            }
            slot.last_ms = Some(now_ms);
            fired.push(Fired {
                task,
                elapsed_secs: elapsed.min(MAX_ELAPSED_MS) / 1000.0,
            });
        }
        fired
    }

    /// Drop every pending deadline; nothing fires until `end_reset`.
    pub fn cancel_all(&mut self) {
        self.cancelled = true;
        for slot in &mut self.slots {
            slot.last_ms = None;
        }
    }

    pub fn begin_reset(&mut self) {
        self.resetting = true;
    }

    /// Leave reset mode and re-arm every enabled task from the next update.
    pub fn end_reset(&mut self) {
        self.resetting = false;
        self.cancelled = false;
    }

    pub fn is_resetting(&self) -> bool {
        self.resetting
    }
}

fn main_tick_period(low_activity: bool) -> f64 {
    if low_activity {
        LOW_ACTIVITY_TICK_MS
    } else {
        MAIN_TICK_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(fired: &[Fired]) -> Vec<Task> {
        fired.iter().map(|f| f.task).collect()
    }

    #[test]
    fn first_frame_fires_nothing() {
        let mut s = Scheduler::new(false);
        assert!(s.update(0.0).is_empty());
    }

    #[test]
    fn main_tick_at_250ms() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        assert!(s.update(200.0).is_empty());
        let fired = s.update(250.0);
        assert_eq!(tasks(&fired), vec![Task::MainTick]);
        assert!((fired[0].elapsed_secs - 0.25).abs() < 1e-9);
    }

    #[test]
    fn elapsed_is_measured_from_previous_firing() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        s.update(300.0);
        let fired = s.update(560.0);
        assert_eq!(tasks(&fired), vec![Task::MainTick]);
        assert!((fired[0].elapsed_secs - 0.26).abs() < 1e-9);
    }

    #[test]
    fn fixed_order_within_one_wake_up() {
        let mut s = Scheduler::new(false);
        s.set_period(Task::AllyAutoLift, Some(500.0));
        s.update(0.0);
        let fired = s.update(5000.0);
        assert_eq!(
            tasks(&fired),
            vec![Task::MainTick, Task::Analytics, Task::AutoBuy, Task::AllyAutoLift, Task::AutoSave]
        );
    }

    #[test]
    fn large_gap_reports_single_main_tick() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        let fired = s.update(60_000.0);
        let mains: Vec<_> = fired.iter().filter(|f| f.task == Task::MainTick).collect();
        assert_eq!(mains.len(), 1);
        assert!((mains[0].elapsed_secs - 60.0).abs() < 1e-9);
    }

    #[test]
    fn elapsed_capped() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        let fired = s.update(MAX_ELAPSED_MS * 3.0);
        assert!((fired[0].elapsed_secs - MAX_ELAPSED_MS / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn low_activity_slows_main_tick() {
        let mut s = Scheduler::new(true);
        s.update(0.0);
        assert!(s.update(500.0).is_empty());
        assert_eq!(tasks(&s.update(1000.0))[0], Task::MainTick);

        s.set_low_activity(false);
        assert_eq!(s.period(Task::MainTick), Some(MAIN_TICK_MS));
    }

    #[test]
    fn ally_task_disabled_by_default() {
        let mut s = Scheduler::new(false);
        assert_eq!(s.period(Task::AllyAutoLift), None);
        s.update(0.0);
        assert!(!tasks(&s.update(10_000.0)).contains(&Task::AllyAutoLift));
    }

    #[test]
    fn enabling_task_arms_on_next_update() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        s.set_period(Task::AllyAutoLift, Some(100.0));
        assert!(!tasks(&s.update(5000.0)).contains(&Task::AllyAutoLift));
        assert!(tasks(&s.update(5100.0)).contains(&Task::AllyAutoLift));
    }

    #[test]
    fn non_positive_period_disables() {
        let mut s = Scheduler::new(false);
        s.set_period(Task::Analytics, Some(0.0));
        assert_eq!(s.period(Task::Analytics), None);
    }

    #[test]
    fn resetting_suppresses_only_autosave() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        s.begin_reset();
        let fired = tasks(&s.update(6000.0));
        assert!(fired.contains(&Task::MainTick));
        assert!(!fired.contains(&Task::AutoSave));

        s.end_reset();
        assert!(tasks(&s.update(6001.0)).contains(&Task::AutoSave));
    }

    #[test]
    fn cancel_all_silences_until_end_reset() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        s.begin_reset();
        s.cancel_all();
        assert!(s.update(10_000.0).is_empty());

        s.end_reset();
        assert!(!s.is_resetting());
        // Re-armed: first update only records the timestamp.
        assert!(s.update(20_000.0).is_empty());
        assert_eq!(tasks(&s.update(20_250.0)), vec![Task::MainTick]);
    }

    #[test]
    fn clock_going_backwards_rearms() {
        let mut s = Scheduler::new(false);
        s.update(1000.0);
        assert!(s.update(500.0).is_empty());
        assert!(s.update(700.0).is_empty());
        assert_eq!(tasks(&s.update(750.0)), vec![Task::MainTick]);
    }

    #[test]
    fn steady_60fps() {
        let mut s = Scheduler::new(false);
        s.update(0.0);
        let mut mains = 0;
        for i in 1..=60 {
            mains += s
                .update(i as f64 * 16.667)
                .iter()
                .filter(|f| f.task == Task::MainTick)
                .count();
        }
        // ~1 second at 4 ticks/sec
        assert!((3..=4).contains(&mains), "expected ~4 ticks, got {}", mains);
    }
}
