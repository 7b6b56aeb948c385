//! Input normalization: keyboard codes and pointer clicks become `InputEvent`s.
//!
//! Pointer input is resolved against click targets registered by the renderer
//! during the last frame; the game itself only ever sees action IDs.

use ratzilla::event::KeyCode;
use ratzilla::ratatui::layout::{Position, Rect};

/// Lift key alias produced for Enter.
pub const KEY_ENTER: char = '\n';
/// Produced for Esc; closes confirmations.
pub const KEY_ESC: char = '\x1b';

/// Keyboard and pointer input, normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A click/tap on a registered target, identified by its action ID.
    Click(u16),
}

/// Map a browser key code to an event. Unhandled keys yield `None`.
pub fn key_event(code: &KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Char(c) => Some(InputEvent::Key(c.to_ascii_lowercase())),
        KeyCode::Enter => Some(InputEvent::Key(KEY_ENTER)),
        KeyCode::Esc => Some(InputEvent::Key(KEY_ESC)),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets of the last rendered frame plus the grid size they refer to.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Full-width target on one row of `area`; rows outside the area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if (area.top()..area.bottom()).contains(&row) {
            self.add_click_target(Rect { y: row, height: 1, ..area }, action_id);
        }
    }

    /// Register targets for a horizontal row of buttons.
    ///
    /// `tab_widths` holds `(display_width, action_id)` per padded label, laid
    /// out left to right with `separator_width` cells between them. Neighbours
    /// split each separator down the middle; the outer buttons reach the row
    /// edges. Anything past `total_width` is clipped.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        if tab_widths.is_empty() || total_width == 0 {
            return;
        }

        // Boundary after each label except the last: end of label + half the separator.
        let mut boundaries = Vec::with_capacity(tab_widths.len() + 1);
        boundaries.push(0u16);
        let mut end = 0u16;
        for (w, _) in &tab_widths[..tab_widths.len() - 1] {
            end = end.saturating_add(*w);
            boundaries.push(end.saturating_add(separator_width / 2));
            end = end.saturating_add(separator_width);
        }
        boundaries.push(total_width);

        for (edges, (_, action_id)) in boundaries.windows(2).zip(tab_widths) {
            let left = edges[0].min(total_width);
            let right = edges[1].min(total_width);
            if right > left {
                self.add_click_target(Rect::new(x + left, y, right - left, height), *action_id);
            }
        }
    }

    /// Action of the topmost target under a cell (later registrations win).
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        let cell = Position::new(col, row);
        self.targets
            .iter()
            .rev()
            .find(|t| t.rect.contains(cell))
            .map(|t| t.action_id)
    }
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Map a pixel offset along one axis of the grid to a cell index.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || !(0.0..extent).contains(&offset) {
        return None;
    }
    Some(((offset / extent) * cells as f64) as u16).filter(|c| *c < cells)
}
