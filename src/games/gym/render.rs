//! Gym Gains rendering. Read-only over the ledger; every button registers its
//! click target as it is drawn.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::{self, item_key};
use super::catalog::{AllyEffect, ConsumableEffect, Tier, UpgradeKind, SYNERGIES};
use super::economy::{bulk_quote, current_rank, milestone_multiplier, next_milestone};
use super::format::{format_number, format_time};
use super::logic::{ally_cost, consumable_cost, GearCategory};
use super::multipliers::{self, lift_power, passive_income, synergy_active, Multipliers};
use super::prestige;
use super::state::GymState;
use super::{
    Confirm, Tab, UiState, SETTING_EXPORT, SETTING_HARD_RESET, SETTING_IMPORT, SETTING_LIMITER,
    SETTING_LOW_ACTIVITY, SETTING_NOTATION, SETTING_SOUND,
};

/// Sparkline characters for the calorie history (8 levels of height).
const SPARKLINE_CHARS: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];

/// How long the lift button stays highlighted after a lift.
const LIFT_FLASH_MS: f64 = 150.0;

pub fn render(state: &GymState, ui: &UiState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let m = multipliers::compute(state, ui.now_ms);
    let narrow = is_narrow_layout(area.width);

    // Side log panel when wide enough
    let (main_area, side_log) = if area.width >= 100 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let tab_rows: u16 = if narrow { 2 } else { 1 };
    let sub_rows: u16 = if ui.tab.sub_tabs().is_empty() { 0 } else { 1 };
    let log_rows: u16 = if side_log.is_some() { 0 } else { 4 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),        // header
            Constraint::Length(3),        // lift button
            Constraint::Length(tab_rows), // tabs
            Constraint::Length(sub_rows), // sub-tabs
            Constraint::Min(5),           // content
            Constraint::Length(2),        // status + action bar
            Constraint::Length(log_rows), // inline log
        ])
        .split(main_area);

    render_header(state, &m, f, chunks[0]);
    render_lift_button(state, ui, f, chunks[1], click_state);
    render_tabs(ui, f, chunks[2], narrow, click_state);
    if sub_rows > 0 {
        render_sub_tabs(ui, f, chunks[3], click_state);
    }
    match ui.tab {
        Tab::Gym => render_upgrades(state, ui, &m, f, chunks[4], click_state),
        Tab::Gear => render_gear(state, ui, f, chunks[4], click_state),
        Tab::Supplements => render_supplements(state, ui, f, chunks[4], click_state),
        Tab::Bros => render_bros(state, f, chunks[4], click_state),
        Tab::Prestige => render_prestige(state, ui, f, chunks[4], click_state),
        Tab::Trophies => render_trophies(state, ui, &m, f, chunks[4]),
        Tab::Daily => render_daily(state, f, chunks[4], click_state),
        Tab::Settings => render_settings(state, f, chunks[4], click_state),
    }
    render_action_bar(state, ui, f, chunks[5], click_state);

    match side_log {
        Some(log_area) => render_log(state, f, log_area),
        None if log_rows > 0 => render_log(state, f, chunks[6]),
        None => {}
    }
}

fn fmt(state: &GymState, n: f64) -> String {
    format_number(n, state.settings.notation)
}

fn key_label(idx: usize) -> String {
    format!("[{}]", item_key(idx))
}

fn row_style(affordable: bool) -> Style {
    if affordable {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    }
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn bordered(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

/// Render a list inside a bordered block and register its row targets.
fn render_list(
    cl: ClickableList<'static>,
    block: Block<'static>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_header(state: &GymState, m: &Multipliers, f: &mut Frame, area: Rect) {
    let (_, rank) = current_rank(state.total_calories);
    let power = lift_power(state, m);
    let passive = passive_income(state, m);

    let mut top = vec![
        Span::styled(
            format!(" {} cal ", fmt(state, state.calories.floor())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("+{}/s ", fmt(state, passive)), Style::default().fg(Color::Green)),
        Span::styled(format!("│ {} x{}", rank.name, rank.bonus), Style::default().fg(Color::Cyan)),
    ];
    let loc = state.current_location_def();
    if loc.lift_mult > 1.0 {
        top.push(Span::styled(format!(" │ {}", loc.name), dim()));
    }

    let mut bottom = vec![
        Span::raw(format!(" {}/lift ", fmt(state, power))),
        Span::styled(
            format!("crit {:.0}% x{} ", m.crit_chance * 100.0, m.crit_mult),
            Style::default().fg(Color::Red),
        ),
        Span::styled(format!("combo {}/{}", state.combo, m.max_combo), Style::default().fg(Color::Magenta)),
    ];
    for tier in [Tier::Prestige, Tier::Ascension, Tier::Transcendence] {
        let amount = state.tier_currency(tier);
        if amount > 0.0 {
            bottom.push(Span::styled(
                format!(" │ {} {}", fmt(state, amount), tier.currency_name()),
                Style::default().fg(Color::LightYellow),
            ));
        }
    }

    let widget = Paragraph::new(vec![Line::from(top), Line::from(bottom)])
        .block(bordered(" GYM GAINS ".to_string(), Color::Yellow));
    f.render_widget(widget, area);
}

fn render_lift_button(
    state: &GymState,
    ui: &UiState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let flashing = state.last_lift_ms.is_some_and(|t| ui.now_ms - t < LIFT_FLASH_MS);
    let mut spans = vec![Span::styled(
        " [SPACE] LIFT! ",
        if flashing {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        },
    )];
    if let Some(last) = ui.last_lift.filter(|l| l.accepted && state.combo > 0) {
        let text = if last.is_crit {
            format!(" +{} CRIT!", fmt(state, last.damage))
        } else {
            format!(" +{}", fmt(state, last.damage))
        };
        let style = if last.is_crit {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(text, style));
    }

    let border = if flashing { Color::Yellow } else { Color::DarkGray };
    let widget = Paragraph::new(Line::from(spans).centered()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(widget, area);
    click_state.borrow_mut().add_click_target(area, actions::LIFT);
}

fn tab_style(active: bool, color: Color) -> Style {
    if active {
        Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    }
}

fn render_tabs(ui: &UiState, f: &mut Frame, area: Rect, narrow: bool, click_state: &Rc<RefCell<ClickState>>) {
    let per_row = if narrow { 4 } else { Tab::ALL.len() };
    let mut cs = click_state.borrow_mut();
    for (row, chunk) in Tab::ALL.chunks(per_row).enumerate() {
        let y = area.y + row as u16;
        if y >= area.y + area.height {
            break;
        }
        let mut bar = TabBar::new("│");
        for tab in chunk {
            let idx = Tab::ALL.iter().position(|t| t == tab).unwrap_or(0);
            let label = format!("{} {}", idx + 1, tab.label());
            bar = bar.tab(label, tab_style(*tab == ui.tab, Color::Cyan), actions::TAB_BASE + idx as u16);
        }
        bar.render(f, Rect::new(area.x, y, area.width, 1), &mut cs);
    }
}

fn render_sub_tabs(ui: &UiState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut bar = TabBar::new(" ");
    for (i, label) in ui.tab.sub_tabs().iter().enumerate() {
        bar = bar.tab(*label, tab_style(i == ui.sub_tab, Color::Magenta), actions::SUB_TAB_BASE + i as u16);
    }
    bar = bar.tab("[ ] switch", dim(), actions::SUB_TAB_NEXT);
    bar.render(f, area, &mut click_state.borrow_mut());
}

fn render_upgrades(
    state: &GymState,
    ui: &UiState,
    m: &Multipliers,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let kind = ui.upgrade_kind();
    let amount = state.settings.buy_amount;
    let mut cl = ClickableList::new();

    for (row, idx) in state.upgrade_indices(kind).into_iter().enumerate() {
        let u = &state.upgrades[idx];
        let action = actions::ITEM_BASE + row as u16;
        if !u.is_unlocked(state.total_calories) {
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("{} ??? (at {} total)", key_label(row), fmt(state, u.def.unlock_at)),
                    dim(),
                )),
                action,
            );
            continue;
        }

        let effect = match kind {
            UpgradeKind::Lift => format!("+{}/lift", fmt(state, u.def.effect)),
            UpgradeKind::Passive => format!("+{}/s", fmt(state, u.def.effect)),
            UpgradeKind::Multiplier => format!("x{} all", u.def.effect),
        };
        let level = match u.def.max_level {
            Some(max) => format!("Lv {}/{}", u.level, max),
            None => format!("Lv {}", u.level),
        };

        let mut spans = vec![Span::raw(format!("{} {} ", key_label(row), u.def.name)), Span::styled(level, dim())];
        if u.is_maxed() {
            spans.push(Span::styled("  MAX", Style::default().fg(Color::Cyan)));
        } else {
            let quote = bulk_quote(u.def, u.level, state.calories, amount, m.cost_reduction);
            let count = quote.count.max(1);
            let affordable = quote.count > 0 && quote.total_cost <= state.calories;
            spans.push(Span::styled(
                format!("  {} x{}", fmt(state, quote.total_cost), count),
                row_style(affordable),
            ));
        }
        spans.push(Span::styled(format!("  {}", effect), Style::default().fg(Color::Cyan)));
        if u.def.has_milestones {
            let next = next_milestone(u.level);
            spans.push(Span::styled(
                format!("  x{:.1} @{}", milestone_multiplier(next) / milestone_multiplier(u.level), next),
                dim(),
            ));
        }
        cl.push_clickable(Line::from(spans), action);
    }

    let title = format!(" {} upgrades ({}) ", kind.label(), amount.label());
    render_list(cl, bordered(title, Color::Green), f, area, click_state);
}

fn render_gear(state: &GymState, ui: &UiState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    let total = state.total_calories;
    let locked = |row: usize, unlock_at: f64| {
        Line::from(Span::styled(format!("{} ??? (at {} total)", key_label(row), fmt(state, unlock_at)), dim()))
    };

    let title = match ui.gear_category() {
        GearCategory::OneTime => {
            for (row, item) in state.one_time_upgrades.iter().enumerate() {
                let action = actions::ITEM_BASE + row as u16;
                if !item.purchased && total < item.def.unlock_at {
                    cl.push_clickable(locked(row, item.def.unlock_at), action);
                    continue;
                }
                let status = if item.purchased {
                    Span::styled("  owned", Style::default().fg(Color::Cyan))
                } else {
                    Span::styled(format!("  {}", fmt(state, item.def.cost)), row_style(state.calories >= item.def.cost))
                };
                cl.push_clickable(
                    Line::from(vec![
                        Span::raw(format!("{} {}", key_label(row), item.def.name)),
                        status,
                        Span::styled(format!("  {}", item.def.bonus.kind.describe(item.def.bonus.value)), dim()),
                    ]),
                    action,
                );
            }
            " Boosts "
        }
        GearCategory::Equipment => {
            for (row, item) in state.equipment.iter().enumerate() {
                let action = actions::ITEM_BASE + row as u16;
                if !item.purchased && total < item.def.unlock_at {
                    cl.push_clickable(locked(row, item.def.unlock_at), action);
                    continue;
                }
                let status = if item.purchased {
                    Span::styled("  owned", Style::default().fg(Color::Cyan))
                } else {
                    Span::styled(format!("  {}", fmt(state, item.def.cost)), row_style(state.calories >= item.def.cost))
                };
                let bonuses: Vec<String> = item.def.bonuses.iter().map(|b| b.kind.describe(b.value)).collect();
                cl.push_clickable(
                    Line::from(vec![
                        Span::raw(format!("{} {}", key_label(row), item.def.name)),
                        status,
                        Span::styled(format!("  {}", bonuses.join(", ")), dim()),
                    ]),
                    action,
                );
            }
            " Equipment "
        }
        GearCategory::Locations => {
            for (row, loc) in state.locations.iter().enumerate() {
                let action = actions::ITEM_BASE + row as u16;
                if !loc.unlocked && total < loc.def.unlock_at {
                    cl.push_clickable(locked(row, loc.def.unlock_at), action);
                    continue;
                }
                let status = if row == state.current_location {
                    Span::styled("  training here", Style::default().fg(Color::Yellow))
                } else if loc.unlocked {
                    Span::styled("  move", Style::default().fg(Color::Cyan))
                } else {
                    Span::styled(format!("  {}", fmt(state, loc.def.cost)), row_style(state.calories >= loc.def.cost))
                };
                cl.push_clickable(
                    Line::from(vec![
                        Span::raw(format!("{} {}", key_label(row), loc.def.name)),
                        status,
                        Span::styled(
                            format!("  x{} lift x{} passive x{} PP", loc.def.lift_mult, loc.def.passive_mult, loc.def.pp_mult),
                            dim(),
                        ),
                    ]),
                    action,
                );
            }
            " Locations "
        }
    };
    render_list(cl, bordered(title.to_string(), Color::Blue), f, area, click_state);
}

fn render_supplements(
    state: &GymState,
    ui: &UiState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    for (row, c) in state.consumables.iter().enumerate() {
        let action = actions::ITEM_BASE + row as u16;
        if c.uses == 0 && state.total_calories < c.def.unlock_at {
            cl.push_clickable(
                Line::from(Span::styled(format!("{} ??? (at {} total)", key_label(row), fmt(state, c.def.unlock_at)), dim())),
                action,
            );
            continue;
        }
        let effect = match c.def.effect {
            ConsumableEffect::Timed(b) => format!("{} for {}", b.kind.describe(b.value), format_time(c.def.duration_secs)),
            ConsumableEffect::InstantCalories(amount) => format!("+{} calories", fmt(state, amount)),
        };
        let status = if c.def.one_time && c.uses > 0 {
            Span::styled("  used", dim())
        } else {
            let cost = consumable_cost(c.def.cost, c.uses);
            Span::styled(format!("  {}", fmt(state, cost)), row_style(state.calories >= cost))
        };
        let mut spans = vec![Span::raw(format!("{} {}", key_label(row), c.def.name)), status];
        if let Some(end) = c.active_until_ms.filter(|end| *end > ui.now_ms) {
            spans.push(Span::styled(
                format!("  active {}", format_time((end - ui.now_ms) / 1000.0)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(format!("  {}", effect), dim()));
        cl.push_clickable(Line::from(spans), action);
    }
    render_list(cl, bordered(" Supplements ".to_string(), Color::LightMagenta), f, area, click_state);
}

fn render_bros(state: &GymState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    for (row, ally) in state.allies.iter().enumerate() {
        let action = actions::ITEM_BASE + row as u16;
        if ally.level == 0 && state.total_calories < ally.def.unlock_at {
            cl.push_clickable(
                Line::from(Span::styled(format!("{} ??? (at {} total)", key_label(row), fmt(state, ally.def.unlock_at)), dim())),
                action,
            );
            continue;
        }
        let cost = ally_cost(ally.def.base_cost, ally.def.cost_multiplier, ally.level);
        let verb = if ally.level == 0 { "hire" } else { "promote" };
        let level = ally.level as f64;
        let effect = match ally.def.kind {
            AllyEffect::AutoLift => format!("{} lifts / 5s", ally.def.effect * level),
            AllyEffect::CritChance => format!("+{:.0}% crit", ally.def.effect * level * 100.0),
            AllyEffect::PassiveMult => format!("x{:.2} passive", 1.0 + (ally.def.effect - 1.0) * level),
        };
        cl.push_clickable(
            Line::from(vec![
                Span::raw(format!("{} {} ", key_label(row), ally.def.name)),
                Span::styled(format!("Lv {}", ally.level), dim()),
                Span::styled(
                    format!("  {} {} {}", verb, fmt(state, cost.amount), cost.currency.name()),
                    row_style(cost.currency.balance(state) >= cost.amount),
                ),
                Span::styled(format!("  {}", effect), Style::default().fg(Color::Cyan)),
            ]),
            action,
        );
        if ally.level > 0 {
            cl.push(Line::from(Span::styled(format!("      \"{}\"", ally.def.quote), dim())));
        }
    }
    render_list(cl, bordered(" Gym Bros ".to_string(), Color::LightGreen), f, area, click_state);
}

fn render_prestige(state: &GymState, ui: &UiState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let tier = ui.tier();
    let currency = tier.currency_name();
    let payout = prestige::potential_payout(state, tier, ui.now_ms);
    let source = prestige::source_amount(state, tier);
    let source_name = match tier {
        Tier::Prestige => "total calories",
        Tier::Ascension => "PP",
        Tier::Transcendence => "TT",
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(
            format!(" {} {} ", fmt(state, state.tier_currency(tier)), currency),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("from {} {}", fmt(state, source), source_name), dim()),
    ]));
    if payout >= 1.0 {
        let next = prestige::next_point_at(state, tier, ui.now_ms);
        cl.push(Line::from(Span::styled(
            format!(" Reset now for +{} {} (next at {})", fmt(state, payout), currency, fmt(state, next)),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else {
        cl.push(Line::from(Span::styled(
            format!(" Requires {} {}", fmt(state, prestige::threshold(tier)), source_name),
            dim(),
        )));
    }
    cl.push(Line::from(""));

    let balance = state.tier_currency(tier);
    for (row, u) in state.tier_upgrades(tier).iter().enumerate() {
        let status = if u.is_maxed() {
            Span::styled("  MAX", Style::default().fg(Color::Cyan))
        } else {
            Span::styled(format!("  {} {}", fmt(state, u.cost()), currency), row_style(balance >= u.cost()))
        };
        cl.push_clickable(
            Line::from(vec![
                Span::raw(format!("{} {} ", key_label(row), u.def.name)),
                Span::styled(format!("Lv {}/{}", u.level, u.def.max_level), dim()),
                status,
                Span::styled(format!("  {}", u.def.bonus.describe(u.def.effect)), dim()),
            ]),
            actions::ITEM_BASE + row as u16,
        );
    }

    let title = format!(" {} ", ui.tab.sub_tabs().get(ui.sub_tab).copied().unwrap_or("Prestige"));
    render_list(cl, bordered(title, Color::Yellow), f, area, click_state);
}

fn sparkline(values: &[f64]) -> String {
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return String::new();
    }
    values
        .iter()
        .map(|v| {
            let level = ((v / max) * (SPARKLINE_CHARS.len() - 1) as f64).round() as usize;
            SPARKLINE_CHARS[level.min(SPARKLINE_CHARS.len() - 1)]
        })
        .collect()
}

fn render_trophies(state: &GymState, ui: &UiState, m: &Multipliers, f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if ui.sub_tab == 0 {
        for a in &state.achievements {
            let (mark, style) = if a.unlocked {
                ("✓", Style::default().fg(Color::Green))
            } else {
                ("·", dim())
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {} {}", mark, a.def.name), style),
                Span::styled(format!("  {}", a.def.description), dim()),
                Span::styled(format!("  ({})", a.def.reward.kind.describe(a.def.reward.value)), dim()),
            ]));
        }
        let done = state.achievements.iter().filter(|a| a.unlocked).count();
        let title = format!(" Achievements {}/{} ", done, state.achievements.len());
        f.render_widget(Paragraph::new(lines).block(bordered(title, Color::Green)), area);
        return;
    }

    let stats = state.statistics();
    let row = |label: &str, value: String| {
        Line::from(vec![Span::styled(format!(" {:<18}", label), dim()), Span::raw(value)])
    };
    lines.push(row("Lifetime calories", fmt(state, stats.lifetime_calories)));
    lines.push(row("Total lifts", fmt(state, stats.total_lifts as f64)));
    lines.push(row("Critical hits", fmt(state, stats.critical_hits as f64)));
    lines.push(row("Best combo", stats.max_combo.to_string()));
    lines.push(row("Upgrade levels", fmt(state, stats.upgrades_purchased as f64)));
    lines.push(row("Play time", format_time(stats.play_time_secs)));
    lines.push(row(
        "Resets",
        format!("{} / {} / {}", stats.prestige_count, stats.ascension_count, state.transcendence_count),
    ));
    lines.push(row("Crit", format!("{:.1}% x{}", m.crit_chance * 100.0, m.crit_mult)));
    let active: Vec<&str> = SYNERGIES
        .iter()
        .enumerate()
        .filter(|(i, _)| synergy_active(state, *i))
        .map(|(_, s)| s.name)
        .collect();
    if !active.is_empty() {
        lines.push(row("Synergies", active.join(", ")));
    }
    let history: Vec<f64> = state.calorie_history.iter().map(|p| p.calories).collect();
    let spark = sparkline(&history);
    if !spark.is_empty() {
        lines.push(row("Calories", spark));
    }
    f.render_widget(Paragraph::new(lines).block(bordered(" Stats ".to_string(), Color::Cyan)), area);
}

fn render_daily(state: &GymState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut cl = ClickableList::new();
    match &state.daily_challenge {
        None => cl.push(Line::from(Span::styled(" No challenge yet today.", dim()))),
        Some(ch) => {
            cl.push(Line::from(Span::styled(
                format!(" {}", ch.kind.name()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            cl.push(Line::from(format!(" {}", ch.description())));
            let ratio = if ch.target > 0.0 { (ch.progress / ch.target).clamp(0.0, 1.0) } else { 1.0 };
            let filled = (ratio * 20.0).round() as usize;
            cl.push(Line::from(vec![
                Span::styled(format!(" {}", "█".repeat(filled)), Style::default().fg(Color::Green)),
                Span::styled("░".repeat(20 - filled), dim()),
                Span::raw(format!(" {}/{}", fmt(state, ch.progress.min(ch.target)), fmt(state, ch.target))),
            ]));
            let reward_name = match ch.reward_currency {
                super::challenge::RewardCurrency::Calories => "calories",
                super::challenge::RewardCurrency::ProteinPoints => "PP",
                super::challenge::RewardCurrency::TitanTokens => "TT",
            };
            cl.push(Line::from(Span::styled(
                format!(" Reward {} {}  ({} window)", fmt(state, ch.reward), reward_name, format_time(ch.time_limit_secs as f64)),
                dim(),
            )));
            cl.push(Line::from(""));
            if ch.completed {
                cl.push(Line::from(Span::styled(" Completed. Come back tomorrow!", Style::default().fg(Color::Cyan))));
            } else {
                cl.push_clickable(
                    Line::from(Span::styled(format!(" {} Claim reward", key_label(0)), row_style(ch.is_claimable()))),
                    actions::ITEM_BASE,
                );
            }
        }
    }
    render_list(cl, bordered(" Daily Challenge ".to_string(), Color::LightYellow), f, area, click_state);
}

fn render_settings(state: &GymState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let s = &state.settings;
    let on_off = |b: bool| if b { "ON" } else { "OFF" };
    let rows: [(usize, String); 7] = [
        (SETTING_LIMITER, format!("Click limiter: {}", on_off(s.click_limiter))),
        (SETTING_LOW_ACTIVITY, format!("Low activity mode: {}", on_off(s.low_activity))),
        (SETTING_SOUND, format!("Sound: {}", on_off(s.sound_enabled))),
        (SETTING_NOTATION, format!("Notation: {:?}", s.notation)),
        (SETTING_EXPORT, "Export save".to_string()),
        (SETTING_IMPORT, "Import save".to_string()),
        (SETTING_HARD_RESET, "Hard reset (wipes everything)".to_string()),
    ];
    let mut cl = ClickableList::new();
    for (idx, text) in rows {
        let style = if idx == SETTING_HARD_RESET {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push_clickable(
            Line::from(Span::styled(format!("{} {}", key_label(idx), text), style)),
            actions::ITEM_BASE + idx as u16,
        );
    }
    render_list(cl, bordered(" Settings ".to_string(), Color::Gray), f, area, click_state);
}

/// Status line (confirm prompt or latest message) above a row of command buttons.
fn render_action_bar(
    state: &GymState,
    ui: &UiState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let status_area = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let buttons_area = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1));
    let command = Style::default().fg(Color::White);
    let accent = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut bar = TabBar::new("│");
    let status = match ui.confirm {
        Some(confirm) => {
            bar = bar.tab("[y] Yes", accent, actions::CONFIRM).tab("[Esc] No", command, actions::CANCEL);
            let text = match confirm {
                Confirm::Reset(tier) => format!(
                    " Reset for +{} {}?",
                    fmt(state, prestige::potential_payout(state, tier, ui.now_ms)),
                    tier.currency_name()
                ),
                Confirm::HardReset => " Wipe ALL progress?".to_string(),
            };
            Line::from(Span::styled(text, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        }
        None => {
            match ui.tab {
                Tab::Gym => {
                    bar = bar
                        .tab("[v] Buy all", accent, actions::BUY_ALL)
                        .tab(format!("[x] {}", state.settings.buy_amount.label()), command, actions::CYCLE_BUY_AMOUNT)
                        .tab(format!("[u] Auto {}", state.settings.auto_buy.label()), command, actions::CYCLE_AUTO_BUY);
                }
                Tab::Gear => bar = bar.tab("[v] Buy all", accent, actions::BUY_ALL),
                Tab::Prestige => {
                    let label = match ui.tier() {
                        Tier::Prestige => "[r] Compete",
                        Tier::Ascension => "[r] Go Pro",
                        Tier::Transcendence => "[r] Transcend",
                    };
                    bar = bar.tab(label, accent, actions::RESET);
                }
                _ => {}
            }
            bar = bar.tab("[s] Save", command, actions::SAVE);
            match state.log.last() {
                Some(entry) => Line::from(Span::styled(
                    format!(" {}", entry.text),
                    if entry.is_important { Style::default().fg(Color::Yellow) } else { dim() },
                )),
                None => Line::from(""),
            }
        }
    };

    f.render_widget(Paragraph::new(status), status_area);
    if buttons_area.height > 0 && !bar.is_empty() {
        bar.render(f, buttons_area, &mut click_state.borrow_mut());
    }
}

fn render_log(state: &GymState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .log
        .iter()
        .rev()
        .take(visible)
        .enumerate()
        .map(|(i, entry)| {
            let recent = i < 3;
            let style = match (entry.is_important, recent) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => dim(),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(bordered(" Log ".to_string(), Color::Blue)), area);
}
