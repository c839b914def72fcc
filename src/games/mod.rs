/// Game trait implemented by everything the host can drive.

pub mod kingdom;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

pub trait Game {
    /// Handle an input event. Returns true if the event was consumed.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Advance the simulation by `delta_seconds` of (already clamped) real time.
    fn tick(&mut self, delta_seconds: f64);

    /// Render into `area`, registering click targets in `click_state`.
    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>);
}
