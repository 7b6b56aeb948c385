mod audio;
mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::gym::state::GymState;
use games::gym::GymGame;
use games::Game;
use input::{pixel_to_cell, ClickState, InputEvent};
use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_y = mouse_y as f64 - rect.top();
    let click_x = mouse_x as f64 - rect.left();

    let col = pixel_to_cell(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_to_cell(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

#[cfg(target_arch = "wasm32")]
fn load_saved() -> Option<GymState> {
    match games::gym::save::load_game() {
        Ok(state) => state,
        Err(e) => {
            web_sys::console::warn_1(&format!("save ignored: {}", e).into());
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_saved() -> Option<GymState> {
    None
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let now = js_sys::Date::now();
    let game = match load_saved() {
        Some(state) => GymGame::resume(state, now),
        None => GymGame::from_state(GymState::new(), now),
    };
    let game = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let audio = Rc::new(RefCell::new(audio::Audio::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed || mouse_event.button != MouseButton::Left {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let action = cs.hit_test(col, row);
            drop(cs);

            if let Some(id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(event) = input::key_event(&key_event.code) {
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let mut g = game.borrow_mut();
            g.tick(js_sys::Date::now());

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            g.render(f, size, &click_state);

            let cues = g.drain_sounds();
            if !cues.is_empty() {
                audio.borrow_mut().play_all(&cues);
            }
        }
    });

    Ok(())
}
