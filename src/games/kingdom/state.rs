/// Cookie Kingdom game state definitions.

use std::collections::BTreeMap;

/// Cost growth per owned upgrade unit.
pub const COST_MULTIPLIER: f64 = 1.15;
/// Cost growth per owned collectible item.
pub const ITEM_COST_MULTIPLIER: f64 = 1.2;
/// Production bonus per upgrade level (+15% per level).
pub const LEVEL_BONUS_PER_LEVEL: f64 = 0.15;
/// Number of activation slots.
pub const ACTIVE_SLOT_COUNT: usize = 4;

/// Real seconds per world tick.
pub const SECONDS_PER_TICK: f64 = 10.0;
/// World ticks per in-game day (480 seconds).
pub const TICKS_PER_DAY: u64 = 48;
/// A lump-sum reward is granted every time total ticks cross a multiple of this.
pub const TICKS_PER_REWARD: u64 = 12;
/// Cookies granted per reward crossing.
pub const COOKIES_PER_TICK_REWARD: f64 = 1000.0;
/// Days per season.
pub const DAYS_PER_SEASON: u64 = 30;

/// What an upgrade's output feeds into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductionKind {
    /// Adds cookies per manual click.
    Click,
    /// Adds cookies per second.
    Cps,
}

/// Static definition of a purchasable upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub kind: ProductionKind,
    /// Base output per owned unit, before the level multiplier.
    pub amount: f64,
    /// Cost of the first unit.
    pub base_cost: u64,
    /// Seconds of slotted ownership needed to gain one level.
    pub level_duration_sec: f64,
}

/// Collectible item rarity, ordered from most to least common.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    /// All rarities in ascending order.
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Legendary,
        ]
    }

    pub fn name(&self) -> &str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Static definition of a collectible item. Items have no production effect.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    /// Short badge shown in place of an image.
    pub badge: String,
    pub tooltip: String,
    pub rarity: Rarity,
    pub base_cost: u64,
}

/// Calendar season derived from the current day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Seasons in calendar order.
    pub fn all() -> &'static [Season] {
        &[Season::Spring, Season::Summer, Season::Fall, Season::Winter]
    }

    pub fn name(&self) -> &str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// One upgrade gaining one or more levels during a progress advance.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelUp {
    pub upgrade_id: String,
    pub from: u32,
    pub to: u32,
}

impl LevelUp {
    pub fn gained(&self) -> u32 {
        self.to - self.from
    }
}

/// Result of advancing world time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldAdvance {
    /// Whole ticks completed during the advance.
    pub ticks: u64,
    /// Reward crossings granted during the advance.
    pub rewards: u64,
}

/// Everything a single frame step changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub world: WorldAdvance,
    /// Cookies earned from passive production.
    pub income: f64,
    pub level_ups: Vec<LevelUp>,
}

/// Full simulation state of a Cookie Kingdom game.
///
/// Map fields treat an absent key as zero. Each upgrade id occupies at
/// most one entry of `active_slots`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable cookies. Never negative.
    pub cookies: f64,
    /// Cookies earned all-time (clicks, production, rewards). Never decreases.
    pub lifetime_cookies: f64,
    /// Completed world ticks since game start.
    pub total_ticks: u64,
    /// Sub-tick accumulator in `[0, SECONDS_PER_TICK)`.
    pub tick_progress_seconds: f64,
    /// Owned count per upgrade id.
    pub upgrades: BTreeMap<String, u32>,
    /// Level per upgrade id.
    pub upgrade_levels: BTreeMap<String, u32>,
    /// Seconds of slotted time accumulated toward the next level.
    pub upgrade_level_progress: BTreeMap<String, f64>,
    pub active_slots: [Option<String>; ACTIVE_SLOT_COUNT],
    /// Owned count per collectible item id.
    pub inventory_items: BTreeMap<String, u32>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            cookies: 0.0,
            lifetime_cookies: 0.0,
            total_ticks: 0,
            tick_progress_seconds: 0.0,
            upgrades: BTreeMap::new(),
            upgrade_levels: BTreeMap::new(),
            upgrade_level_progress: BTreeMap::new(),
            active_slots: std::array::from_fn(|_| None),
            inventory_items: BTreeMap::new(),
        }
    }

    pub fn owned_count(&self, upgrade_id: &str) -> u32 {
        self.upgrades.get(upgrade_id).copied().unwrap_or(0)
    }

    pub fn owned_item_count(&self, item_id: &str) -> u32 {
        self.inventory_items.get(item_id).copied().unwrap_or(0)
    }

    pub fn upgrade_level(&self, upgrade_id: &str) -> u32 {
        self.upgrade_levels.get(upgrade_id).copied().unwrap_or(0)
    }

    pub fn level_progress(&self, upgrade_id: &str) -> f64 {
        self.upgrade_level_progress
            .get(upgrade_id)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_slotted(&self, upgrade_id: &str) -> bool {
        self.slot_of(upgrade_id).is_some()
    }

    /// Index of the slot holding `upgrade_id`, if any.
    pub fn slot_of(&self, upgrade_id: &str) -> Option<usize> {
        self.active_slots
            .iter()
            .position(|slot| slot.as_deref() == Some(upgrade_id))
    }

    /// Credit earned cookies to both the wallet and the lifetime total.
    pub(super) fn earn(&mut self, amount: f64) {
        self.cookies += amount;
        self.lifetime_cookies += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = GameState::new();
        assert_eq!(state.cookies, 0.0);
        assert_eq!(state.lifetime_cookies, 0.0);
        assert_eq!(state.total_ticks, 0);
        assert!(state.upgrades.is_empty());
        assert!(state.active_slots.iter().all(|s| s.is_none()));
        assert_eq!(state.active_slots.len(), ACTIVE_SLOT_COUNT);
    }

    #[test]
    fn absent_keys_read_as_zero() {
        let state = GameState::new();
        assert_eq!(state.owned_count("missing"), 0);
        assert_eq!(state.owned_item_count("missing"), 0);
        assert_eq!(state.upgrade_level("missing"), 0);
        assert_eq!(state.level_progress("missing"), 0.0);
        assert!(!state.is_slotted("missing"));
    }

    #[test]
    fn slot_of_finds_index() {
        let mut state = GameState::new();
        state.active_slots[2] = Some("bakery".into());
        assert_eq!(state.slot_of("bakery"), Some(2));
        assert!(state.is_slotted("bakery"));
        assert_eq!(state.slot_of("chef"), None);
    }

    #[test]
    fn earn_credits_both_totals() {
        let mut state = GameState::new();
        state.cookies = 5.0;
        state.earn(10.0);
        assert_eq!(state.cookies, 15.0);
        assert_eq!(state.lifetime_cookies, 10.0);
    }

    #[test]
    fn rarity_is_ordered() {
        let all = Rarity::all();
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Rarity::Legendary.name(), "legendary");
    }

    #[test]
    fn level_up_gained() {
        let up = LevelUp {
            upgrade_id: "x".into(),
            from: 1,
            to: 4,
        };
        assert_eq!(up.gained(), 3);
    }
}
