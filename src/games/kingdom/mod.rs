/// Cookie Kingdom: an idle cookie clicker with slot-activated upgrades,
/// per-upgrade leveling and a tick-driven calendar.

pub mod actions;
pub mod catalog;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

#[cfg(test)]
mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use actions::*;
use catalog::Catalog;
use logic::format_number;
use state::{GameState, TickReport, ACTIVE_SLOT_COUNT, COOKIES_PER_TICK_REWARD};

/// Oldest entries are dropped past this many.
pub const MAX_LOG_ENTRIES: usize = 50;
/// How long the cookie button stays highlighted after a click.
const CLICK_FLASH_SECS: f64 = 0.15;

/// Upgrade selection keys, in catalog order.
const SELECT_KEYS: [char; 8] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k'];
/// Slot keys, in slot order.
const SLOT_KEYS: [char; ACTIVE_SLOT_COUNT] = ['q', 'w', 'e', 'r'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Upgrades,
    Items,
    Inventory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

pub struct KingdomGame {
    pub state: GameState,
    pub catalog: Catalog,
    pub tab: Tab,
    /// Upgrade picked for slotting, waiting for a slot tap.
    pub selected_upgrade: Option<String>,
    pub log: Vec<LogEntry>,
    /// Seconds of click highlight remaining.
    pub click_flash: f64,
    autosave_timer: f64,
}

impl KingdomGame {
    pub fn new(state: GameState, catalog: Catalog) -> Self {
        let mut game = Self {
            state,
            catalog,
            tab: Tab::Upgrades,
            selected_upgrade: None,
            log: Vec::new(),
            click_flash: 0.0,
            autosave_timer: 0.0,
        };
        game.add_log("Welcome to Cookie Kingdom! Rule by baking more cookies than anyone else.", true);
        game
    }

    /// The shipped catalog with the saved game, if the browser has one.
    pub fn load() -> Self {
        let catalog = Catalog::standard();
        let state = GameState::new();

        #[cfg(target_arch = "wasm32")]
        let state = {
            if let Err(e) = catalog.validate() {
                web_sys::console::warn_1(&format!("Cookie Kingdom: catalog problem: {e}").into());
            }
            let loaded = save::load_game();
            if loaded != state {
                web_sys::console::log_1(&"Cookie Kingdom: save data loaded".into());
            }
            loaded
        };

        Self::new(state, catalog)
    }

    pub fn add_log(&mut self, text: impl Into<String>, is_important: bool) {
        self.log.push(LogEntry {
            text: text.into(),
            is_important,
        });
        if self.log.len() > MAX_LOG_ENTRIES {
            let excess = self.log.len() - MAX_LOG_ENTRIES;
            self.log.drain(..excess);
        }
    }

    // ── Player actions ──────────────────────────────────────────

    pub fn click_cookie(&mut self) -> bool {
        self.click_flash = CLICK_FLASH_SECS;
        let earned = logic::click(&mut self.state, &self.catalog.upgrades);
        if earned > 0.0 {
            self.persist();
            true
        } else {
            self.hint("Only slotted upgrades generate cookies. Buy one and slot it!");
            false
        }
    }

    pub fn buy_upgrade_at(&mut self, index: usize) -> bool {
        let Some(upgrade) = self.catalog.upgrades.get(index) else {
            return false;
        };
        if logic::buy_upgrade(&mut self.state, upgrade) {
            let text = format!(
                "Bought {} {} (owned {})",
                upgrade.icon,
                upgrade.name,
                self.state.owned_count(&upgrade.id)
            );
            self.add_log(text, false);
            self.persist();
            true
        } else {
            let cost = logic::upgrade_cost(upgrade, self.state.owned_count(&upgrade.id));
            let text = format!("Need {} cookies for {}", format_number(cost), upgrade.name);
            self.hint(&text);
            false
        }
    }

    pub fn buy_item_at(&mut self, index: usize) -> bool {
        let Some(item) = self.catalog.items.get(index) else {
            return false;
        };
        if logic::buy_item(&mut self.state, item) {
            let text = format!(
                "Collected {} [{}] (x{})",
                item.name,
                item.rarity.name(),
                self.state.owned_item_count(&item.id)
            );
            self.add_log(text, false);
            self.persist();
            true
        } else {
            let cost = logic::item_cost(item, self.state.owned_item_count(&item.id));
            let text = format!("Need {} cookies for {}", format_number(cost), item.name);
            self.hint(&text);
            false
        }
    }

    /// Pick an owned upgrade for slotting. Picking it again drops the selection.
    pub fn select_upgrade_at(&mut self, index: usize) -> bool {
        let Some(upgrade) = self.catalog.upgrades.get(index) else {
            return false;
        };
        if self.selected_upgrade.as_deref() == Some(upgrade.id.as_str()) {
            self.selected_upgrade = None;
            return true;
        }
        if self.state.owned_count(&upgrade.id) == 0 {
            let text = format!("Buy {} first", upgrade.name);
            self.hint(&text);
            return false;
        }
        self.selected_upgrade = Some(upgrade.id.clone());
        true
    }

    /// Tap on a slot: place the selected upgrade there, or empty the slot
    /// when nothing is selected.
    pub fn slot_action(&mut self, slot_index: usize) -> bool {
        if slot_index >= ACTIVE_SLOT_COUNT {
            return false;
        }
        match self.selected_upgrade.take() {
            Some(upgrade_id) => {
                if !logic::assign_slot(&mut self.state, &upgrade_id, slot_index) {
                    return false;
                }
                let name = self.upgrade_name(&upgrade_id);
                self.add_log(format!("{} placed in slot {}", name, slot_index + 1), false);
                self.persist();
                true
            }
            None => {
                let Some(upgrade_id) = self.state.active_slots[slot_index].clone() else {
                    return false;
                };
                if !logic::unassign_slot(&mut self.state, slot_index) {
                    return false;
                }
                let name = self.upgrade_name(&upgrade_id);
                self.add_log(format!("{} removed from slot {}", name, slot_index + 1), false);
                self.persist();
                true
            }
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selected_upgrade.take().is_some()
    }

    fn set_tab(&mut self, tab: Tab) -> bool {
        self.tab = tab;
        true
    }

    // ── Frame step ──────────────────────────────────────────────

    /// Advance the simulation and turn what happened into log entries.
    pub fn advance(&mut self, delta_seconds: f64) -> TickReport {
        let day_before = logic::current_day(&self.state);
        let season_before = logic::current_season(&self.state);

        let report = logic::tick(&mut self.state, &self.catalog.upgrades, delta_seconds);

        if report.world.rewards > 0 {
            let reward = report.world.rewards as f64 * COOKIES_PER_TICK_REWARD;
            self.add_log(format!("12th tick reward: +{} cookies", format_number(reward)), true);
        }
        let day = logic::current_day(&self.state);
        if day != day_before {
            let season = logic::current_season(&self.state);
            if season != season_before {
                self.add_log(format!("Day {}: {} has arrived", day, season.name()), true);
            } else {
                self.add_log(format!("Day {} begins", day), false);
            }
        }
        for level_up in &report.level_ups {
            let name = self.upgrade_name(&level_up.upgrade_id);
            let text = if level_up.gained() == 1 {
                format!("{} leveled up to {}!", name, level_up.to)
            } else {
                format!("{} leveled up +{} to {}!", name, level_up.gained(), level_up.to)
            };
            self.add_log(text, true);
        }

        self.click_flash = (self.click_flash - delta_seconds.max(0.0)).max(0.0);

        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.autosave_timer += delta_seconds;
            if self.autosave_timer >= save::AUTOSAVE_INTERVAL_SECS {
                self.autosave_timer = 0.0;
                self.persist();
            }
        }

        report
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn upgrade_name(&self, upgrade_id: &str) -> String {
        self.catalog
            .find_upgrade(upgrade_id)
            .map_or_else(|| upgrade_id.to_string(), |u| u.name.clone())
    }

    /// Non-important log line, skipped when it repeats the latest entry.
    fn hint(&mut self, text: &str) {
        if self.log.last().is_some_and(|last| last.text == text) {
            return;
        }
        self.add_log(text, false);
    }

    #[cfg(target_arch = "wasm32")]
    fn persist(&self) {
        if let Err(e) = save::save_game(&self.state) {
            web_sys::console::warn_1(&format!("Cookie Kingdom: save failed: {e}").into());
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist(&self) {}

    fn handle_key(&mut self, key: char) -> bool {
        if let Some(index) = SELECT_KEYS.iter().position(|&k| k == key) {
            return self.select_upgrade_at(index);
        }
        if let Some(slot) = SLOT_KEYS.iter().position(|&k| k == key) {
            return self.slot_action(slot);
        }
        match key {
            'c' => self.click_cookie(),
            'u' => self.set_tab(Tab::Upgrades),
            't' => self.set_tab(Tab::Items),
            'v' => self.set_tab(Tab::Inventory),
            'x' => self.clear_selection(),
            '1'..='9' => {
                let index = (key as u8 - b'1') as usize;
                match self.tab {
                    Tab::Upgrades => self.buy_upgrade_at(index),
                    Tab::Items => self.buy_item_at(index),
                    Tab::Inventory => false,
                }
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            CLICK_COOKIE => self.click_cookie(),
            TAB_UPGRADES => self.set_tab(Tab::Upgrades),
            TAB_ITEMS => self.set_tab(Tab::Items),
            TAB_INVENTORY => self.set_tab(Tab::Inventory),
            CANCEL_SELECTION => self.clear_selection(),
            id if (BUY_UPGRADE_BASE..SELECT_UPGRADE_BASE).contains(&id) => {
                self.buy_upgrade_at((id - BUY_UPGRADE_BASE) as usize)
            }
            id if (SELECT_UPGRADE_BASE..SLOT_BASE).contains(&id) => {
                self.select_upgrade_at((id - SELECT_UPGRADE_BASE) as usize)
            }
            id if (SLOT_BASE..BUY_ITEM_BASE).contains(&id) => {
                self.slot_action((id - SLOT_BASE) as usize)
            }
            id if (BUY_ITEM_BASE..CANCEL_SELECTION).contains(&id) => {
                self.buy_item_at((id - BUY_ITEM_BASE) as usize)
            }
            _ => false,
        }
    }
}

impl Game for KingdomGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(c.to_ascii_lowercase()),
            InputEvent::Cancel => self.clear_selection(),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn tick(&mut self, delta_seconds: f64) {
        self.advance(delta_seconds);
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
