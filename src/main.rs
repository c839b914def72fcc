mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use games::kingdom::KingdomGame;
use games::Game;
use input::{ClickState, GridBounds, InputEvent};
use time::FrameClock;

/// Bounding box of the grid container that DomBackend creates inside <body>.
fn grid_bounds() -> Option<GridBounds> {
    let document = web_sys::window()?.document()?;
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();
    Some(GridBounds {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    })
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let game = Rc::new(RefCell::new(KingdomGame::load()));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(FrameClock::default()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    web_sys::console::log_1(&"Cookie Kingdom: started".into());

    // Mouse/touch: pixel -> cell -> registered action.
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                grid_bounds()
                    .and_then(|grid| {
                        grid.cell_at(
                            mouse_event.x as f64,
                            mouse_event.y as f64,
                            cs.terminal_cols,
                            cs.terminal_rows,
                        )
                    })
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action_id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Esc => InputEvent::Cancel,
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web(move |f| {
        let delta = clock.borrow_mut().update(now_ms());
        game.borrow_mut().tick(delta);

        let area = f.area();
        click_state.borrow_mut().begin_frame(area);
        game.borrow().render(f, area, &click_state);
    });

    Ok(())
}
