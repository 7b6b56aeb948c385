//! Gym Gains: an incremental lifting game with three prestige tiers.

pub mod actions;
pub mod catalog;
pub mod challenge;
pub mod economy;
pub mod format;
pub mod logic;
pub mod multipliers;
pub mod prestige;
pub mod render;
pub mod save;
pub mod sound;
pub mod state;

#[cfg(test)]
mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::time::{Scheduler, Task};

use catalog::{Tier, UpgradeKind};
use economy::is_milestone;
use format::{format_number, format_time};
use logic::{GearCategory, LiftOutcome};
use sound::{SoundCue, SoundCues};
use state::GymState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Gym,
    Gear,
    Supplements,
    Bros,
    Prestige,
    Trophies,
    Daily,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Gym,
        Tab::Gear,
        Tab::Supplements,
        Tab::Bros,
        Tab::Prestige,
        Tab::Trophies,
        Tab::Daily,
        Tab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Gym => "Gym",
            Tab::Gear => "Gear",
            Tab::Supplements => "Supps",
            Tab::Bros => "Bros",
            Tab::Prestige => "Prestige",
            Tab::Trophies => "Trophies",
            Tab::Daily => "Daily",
            Tab::Settings => "Settings",
        }
    }

    pub fn sub_tabs(self) -> &'static [&'static str] {
        match self {
            Tab::Gym => &["Lift", "Passive", "Multiplier"],
            Tab::Gear => &["Boosts", "Equipment", "Locations"],
            Tab::Prestige => &["Competition", "Pro Card", "Olympia"],
            Tab::Trophies => &["Achievements", "Stats"],
            _ => &[],
        }
    }
}

/// Rows of the settings list.
pub const SETTING_LIMITER: usize = 0;
pub const SETTING_LOW_ACTIVITY: usize = 1;
pub const SETTING_SOUND: usize = 2;
pub const SETTING_NOTATION: usize = 3;
pub const SETTING_EXPORT: usize = 4;
pub const SETTING_IMPORT: usize = 5;
pub const SETTING_HARD_RESET: usize = 6;

/// An action waiting for a yes/no answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirm {
    Reset(Tier),
    HardReset,
}

/// Presentation state. Never saved.
#[derive(Clone, Debug)]
pub struct UiState {
    pub tab: Tab,
    pub sub_tab: usize,
    pub confirm: Option<Confirm>,
    pub last_lift: Option<LiftOutcome>,
    /// Wall clock of the latest frame (epoch ms).
    pub now_ms: f64,
}

impl UiState {
    fn new(now_ms: f64) -> Self {
        Self {
            tab: Tab::Gym,
            sub_tab: 0,
            confirm: None,
            last_lift: None,
            now_ms,
        }
    }

    pub fn upgrade_kind(&self) -> UpgradeKind {
        UpgradeKind::ALL[self.sub_tab.min(UpgradeKind::ALL.len() - 1)]
    }

    pub fn gear_category(&self) -> GearCategory {
        match self.sub_tab {
            0 => GearCategory::OneTime,
            1 => GearCategory::Equipment,
            _ => GearCategory::Locations,
        }
    }

    pub fn tier(&self) -> Tier {
        match self.sub_tab {
            0 => Tier::Prestige,
            1 => Tier::Ascension,
            _ => Tier::Transcendence,
        }
    }
}

pub struct GymGame {
    pub state: GymState,
    pub ui: UiState,
    scheduler: Scheduler,
    sound: SoundCues,
}

impl GymGame {
    pub fn new() -> Self {
        Self::from_state(GymState::new(), 0.0)
    }

    pub fn from_state(state: GymState, now_ms: f64) -> Self {
        let mut game = Self {
            scheduler: Scheduler::new(state.settings.low_activity),
            sound: SoundCues::new(state.settings.sound_enabled),
            state,
            ui: UiState::new(now_ms),
        };
        game.sync_ally_period();
        game
    }

    /// Resume a saved run, crediting the time spent away.
    pub fn resume(state: GymState, now_ms: f64) -> Self {
        let mut game = Self::from_state(state, now_ms);
        if let Some((secs, earned)) = logic::apply_offline_progress(&mut game.state, now_ms) {
            let earned = format_number(earned, game.state.settings.notation);
            game.state
                .add_log(&format!("Welcome back! {} away, +{} calories", format_time(secs), earned), true);
        }
        game
    }

    /// Cues queued since the last call, for the audio backend.
    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        self.sound.drain()
    }

    /// Wipe all progress, including the stored save.
    pub fn hard_reset(&mut self) {
        self.scheduler.begin_reset();
        self.scheduler.cancel_all();
        #[cfg(target_arch = "wasm32")]
        save::delete_save();
        self.state = GymState::new();
        self.ui = UiState::new(self.ui.now_ms);
        self.apply_settings();
        self.sync_ally_period();
        self.scheduler.end_reset();
        self.state.add_log("Progress wiped. Fresh start!", true);
    }

    /// Base64 save code, or `None` (logged) on failure.
    pub fn export_code(&mut self) -> Option<String> {
        match save::export_save(&self.state) {
            Ok(code) => {
                self.state.add_log("Save exported.", false);
                Some(code)
            }
            Err(e) => {
                self.state.add_log(&format!("Export failed: {e}"), true);
                self.sound.play(SoundCue::Error);
                None
            }
        }
    }

    /// Replace the run with an exported save. The current run is kept on failure.
    pub fn import_code(&mut self, code: &str) -> bool {
        match save::import_save(code) {
            Ok(state) => {
                self.state = state;
                self.apply_settings();
                self.sync_ally_period();
                self.state.add_log("Save imported.", true);
                true
            }
            Err(e) => {
                self.state.add_log(&format!("Import failed: {e}"), true);
                self.sound.play(SoundCue::Error);
                false
            }
        }
    }

    pub fn save(&mut self, now_ms: f64, manual: bool) {
        if self.scheduler.is_resetting() {
            return;
        }
        self.state.last_save_ms = now_ms;
        match persist(&self.state) {
            Ok(()) => {
                if manual {
                    self.state.add_log("Game saved.", false);
                }
            }
            Err(e) => self.state.add_log(&format!("Save failed: {e}"), true),
        }
    }

    fn apply_settings(&mut self) {
        self.scheduler.set_low_activity(self.state.settings.low_activity);
        self.sound.set_enabled(self.state.settings.sound_enabled);
    }

    fn sync_ally_period(&mut self) {
        let period = logic::auto_lift_interval(&self.state);
        self.scheduler.set_period(Task::AllyAutoLift, period);
    }

    fn run_task(&mut self, task: Task, elapsed_secs: f64, now_ms: f64) {
        match task {
            Task::MainTick => {
                challenge::refresh_daily(&mut self.state, &challenge::date_key(now_ms));
                let report = logic::tick(&mut self.state, elapsed_secs, now_ms);
                if !report.new_achievements.is_empty() {
                    self.sound.play(SoundCue::Milestone);
                }
            }
            Task::Analytics => logic::record_history(&mut self.state),
            Task::AutoBuy => {
                logic::auto_buy(&mut self.state, now_ms);
            }
            Task::AllyAutoLift => {
                // Whole elapsed span; fractions carry in pending.lifts.
                let lifts = multipliers::auto_lifts_per_sec(&self.state) * elapsed_secs;
                logic::ally_auto_lift(&mut self.state, lifts, now_ms);
            }
            Task::AutoSave => self.save(now_ms, false),
        }
    }

    fn feedback(&mut self, ok: bool) {
        self.sound.play(if ok { SoundCue::Purchase } else { SoundCue::Error });
    }

    fn lift(&mut self) {
        let outcome = logic::lift(&mut self.state, self.ui.now_ms);
        if outcome.accepted {
            self.sound.play(if outcome.is_crit { SoundCue::Crit } else { SoundCue::Lift });
            self.ui.last_lift = Some(outcome);
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        if self.ui.tab != tab {
            self.ui.tab = tab;
            self.ui.sub_tab = 0;
        }
    }

    fn select_sub_tab(&mut self, idx: usize) -> bool {
        if idx < self.ui.tab.sub_tabs().len() {
            self.ui.sub_tab = idx;
            true
        } else {
            false
        }
    }

    fn step_sub_tab(&mut self, forward: bool) -> bool {
        let n = self.ui.tab.sub_tabs().len();
        if n == 0 {
            return false;
        }
        self.ui.sub_tab = if forward {
            (self.ui.sub_tab + 1) % n
        } else {
            (self.ui.sub_tab + n - 1) % n
        };
        true
    }

    fn buy_all(&mut self) -> bool {
        let now = self.ui.now_ms;
        let bought = match self.ui.tab {
            Tab::Gym => logic::buy_available(&mut self.state, self.ui.upgrade_kind(), now) as usize,
            Tab::Gear => logic::buy_all_gear(&mut self.state, self.ui.gear_category()),
            _ => return false,
        };
        if bought > 0 {
            self.state.add_log(&format!("Bought {} items.", bought), false);
        }
        self.feedback(bought > 0);
        true
    }

    fn request_reset(&mut self) -> bool {
        if self.ui.tab != Tab::Prestige {
            return false;
        }
        let tier = self.ui.tier();
        if prestige::can_reset(&self.state, tier, self.ui.now_ms) {
            self.ui.confirm = Some(Confirm::Reset(tier));
        } else {
            let need = format_number(prestige::threshold(tier), self.state.settings.notation);
            let source = match tier {
                Tier::Prestige => "total calories",
                Tier::Ascension => "Protein Points",
                Tier::Transcendence => "Titan Tokens",
            };
            self.state.add_log(&format!("Need {} {} to reset.", need, source), false);
            self.sound.play(SoundCue::Error);
        }
        true
    }

    fn confirmed(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::Reset(tier) => {
                let payout = prestige::reset_tier(&mut self.state, tier, self.ui.now_ms);
                if payout >= 1.0 {
                    self.sound.play(SoundCue::LevelUp);
                } else {
                    self.sound.play(SoundCue::Error);
                }
            }
            Confirm::HardReset => self.hard_reset(),
        }
    }

    fn activate_item(&mut self, idx: usize) -> bool {
        let now = self.ui.now_ms;
        match self.ui.tab {
            Tab::Gym => {
                let indices = self.state.upgrade_indices(self.ui.upgrade_kind());
                let Some(&i) = indices.get(idx) else {
                    return false;
                };
                let before = self.state.upgrades[i].level;
                let bought = logic::purchase_selected(&mut self.state, i, now);
                let after = self.state.upgrades[i].level;
                if bought > 0 {
                    let name = self.state.upgrades[i].def.name;
                    self.state.add_log(&format!("{} x{} (lv {})", name, bought, after), false);
                }
                if self.state.upgrades[i].def.has_milestones && (before + 1..=after).any(is_milestone) {
                    self.sound.play(SoundCue::Milestone);
                } else {
                    self.feedback(bought > 0);
                }
            }
            Tab::Gear => {
                let ok = match self.ui.gear_category() {
                    GearCategory::OneTime if idx < self.state.one_time_upgrades.len() => {
                        logic::purchase_one_time(&mut self.state, idx)
                    }
                    GearCategory::Equipment if idx < self.state.equipment.len() => {
                        logic::purchase_equipment(&mut self.state, idx)
                    }
                    GearCategory::Locations if idx < self.state.locations.len() => {
                        if self.state.locations[idx].unlocked {
                            logic::select_location(&mut self.state, idx)
                        } else {
                            logic::purchase_location(&mut self.state, idx)
                        }
                    }
                    _ => return false,
                };
                self.feedback(ok);
            }
            Tab::Supplements => {
                if idx >= self.state.consumables.len() {
                    return false;
                }
                let ok = logic::use_consumable(&mut self.state, idx, now);
                if ok {
                    let name = self.state.consumables[idx].def.name;
                    self.state.add_log(&format!("Used {}.", name), false);
                }
                self.feedback(ok);
            }
            Tab::Bros => {
                if idx >= self.state.allies.len() {
                    return false;
                }
                let ok = logic::hire_or_promote_ally(&mut self.state, idx);
                if ok {
                    let ally = &self.state.allies[idx];
                    let text = if ally.level == 1 {
                        format!("{} joined: \"{}\"", ally.def.name, ally.def.quote)
                    } else {
                        format!("{} promoted to lv {}", ally.def.name, ally.level)
                    };
                    self.state.add_log(&text, false);
                }
                self.feedback(ok);
            }
            Tab::Prestige => {
                let tier = self.ui.tier();
                if idx >= self.state.tier_upgrades(tier).len() {
                    return false;
                }
                let ok = prestige::buy_tier_upgrade(&mut self.state, tier, idx);
                self.feedback(ok);
            }
            Tab::Trophies => return false,
            Tab::Daily => {
                if idx != 0 {
                    return false;
                }
                let ok = challenge::claim_daily_challenge(&mut self.state);
                self.sound.play(if ok { SoundCue::LevelUp } else { SoundCue::Error });
            }
            Tab::Settings => return self.activate_setting(idx),
        }
        true
    }

    fn activate_setting(&mut self, idx: usize) -> bool {
        let settings = &mut self.state.settings;
        match idx {
            SETTING_LIMITER => settings.click_limiter = !settings.click_limiter,
            SETTING_LOW_ACTIVITY => settings.low_activity = !settings.low_activity,
            SETTING_SOUND => settings.sound_enabled = !settings.sound_enabled,
            SETTING_NOTATION => settings.notation = settings.notation.toggle(),
            SETTING_EXPORT => {
                if let Some(code) = self.export_code() {
                    present_export(&code);
                }
            }
            SETTING_IMPORT => {
                if let Some(code) = request_import() {
                    self.import_code(&code);
                }
            }
            SETTING_HARD_RESET => self.ui.confirm = Some(Confirm::HardReset),
            _ => return false,
        }
        self.apply_settings();
        true
    }

    fn dispatch(&mut self, action: u16) -> bool {
        if let Some(confirm) = self.ui.confirm.take() {
            if action == actions::CONFIRM {
                self.confirmed(confirm);
            }
            return true;
        }

        let consumed = match action {
            actions::LIFT => {
                self.lift();
                true
            }
            a if (actions::TAB_BASE..actions::TAB_BASE + Tab::ALL.len() as u16).contains(&a) => {
                self.select_tab(Tab::ALL[(a - actions::TAB_BASE) as usize]);
                true
            }
            a if (actions::SUB_TAB_BASE..actions::SUB_TAB_PREV).contains(&a) => {
                self.select_sub_tab((a - actions::SUB_TAB_BASE) as usize)
            }
            actions::SUB_TAB_PREV => self.step_sub_tab(false),
            actions::SUB_TAB_NEXT => self.step_sub_tab(true),
            actions::BUY_ALL => self.buy_all(),
            actions::CYCLE_BUY_AMOUNT => {
                let settings = &mut self.state.settings;
                settings.buy_amount = settings.buy_amount.next();
                true
            }
            actions::CYCLE_AUTO_BUY => {
                let settings = &mut self.state.settings;
                settings.auto_buy = settings.auto_buy.next();
                true
            }
            actions::SAVE => {
                self.save(self.ui.now_ms, true);
                true
            }
            actions::RESET => self.request_reset(),
            a if (actions::ITEM_BASE..actions::ITEM_BASE + actions::MAX_ITEMS).contains(&a) => {
                self.activate_item((a - actions::ITEM_BASE) as usize)
            }
            _ => false,
        };
        if consumed {
            self.sync_ally_period();
        }
        consumed
    }
}

impl Default for GymGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn persist(state: &GymState) -> Result<(), save::SaveError> {
    save::save_game(state)
}

/// Natively there is no storage; still prove the snapshot serializes.
#[cfg(not(target_arch = "wasm32"))]
fn persist(state: &GymState) -> Result<(), save::SaveError> {
    save::to_json(state).map(|_| ())
}

#[cfg(target_arch = "wasm32")]
fn present_export(code: &str) {
    save::show_export_dialog(code);
}

#[cfg(not(target_arch = "wasm32"))]
fn present_export(_code: &str) {}

#[cfg(target_arch = "wasm32")]
fn request_import() -> Option<String> {
    save::ask_import_code()
}

#[cfg(not(target_arch = "wasm32"))]
fn request_import() -> Option<String> {
    None
}

impl Game for GymGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let action = match event {
            InputEvent::Key(c) => match actions::key_action(*c) {
                Some(a) => a,
                None => return false,
            },
            InputEvent::Click(id) => *id,
        };
        self.dispatch(action)
    }

    fn tick(&mut self, now_ms: f64) {
        self.ui.now_ms = now_ms;
        for fired in self.scheduler.update(now_ms) {
            self.run_task(fired.task, fired.elapsed_secs, now_ms);
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, &self.ui, f, area, click_state);
    }
}
