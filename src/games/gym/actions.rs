//! Semantic action IDs for Gym Gains click targets and their key bindings.
//!
//! Render registers these IDs on screen regions; keys are mapped onto the same
//! IDs so keyboard and pointer input share one dispatch path.

use crate::input::{KEY_ENTER, KEY_ESC};

// ── Core ────────────────────────────────────────────────────────
pub const LIFT: u16 = 0;

// ── Navigation (base + index) ──────────────────────────────────
pub const TAB_BASE: u16 = 10;
pub const SUB_TAB_BASE: u16 = 20;
pub const SUB_TAB_PREV: u16 = 28;
pub const SUB_TAB_NEXT: u16 = 29;

// ── Commands ────────────────────────────────────────────────────
pub const BUY_ALL: u16 = 30;
pub const CYCLE_BUY_AMOUNT: u16 = 31;
pub const CYCLE_AUTO_BUY: u16 = 32;
pub const SAVE: u16 = 33;
pub const RESET: u16 = 34;
pub const CONFIRM: u16 = 35;
pub const CANCEL: u16 = 36;

// ── Row of the current list (base + row index 0..15) ───────────
pub const ITEM_BASE: u16 = 100;
pub const MAX_ITEMS: u16 = 16;

/// Key shown next to list row `idx` (`a`..`p`).
pub fn item_key(idx: usize) -> char {
    (b'a' + (idx as u8).min(MAX_ITEMS as u8 - 1)) as char
}

/// Keyboard binding for every action.
pub fn key_action(key: char) -> Option<u16> {
    match key {
        ' ' | KEY_ENTER => Some(LIFT),
        '1'..='8' => Some(TAB_BASE + (key as u8 - b'1') as u16),
        '[' => Some(SUB_TAB_PREV),
        ']' => Some(SUB_TAB_NEXT),
        'a'..='p' => Some(ITEM_BASE + (key as u8 - b'a') as u16),
        'v' => Some(BUY_ALL),
        'x' => Some(CYCLE_BUY_AMOUNT),
        'u' => Some(CYCLE_AUTO_BUY),
        's' => Some(SAVE),
        'r' => Some(RESET),
        'y' => Some(CONFIRM),
        KEY_ESC => Some(CANCEL),
        _ => None,
    }
}
