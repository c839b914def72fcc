//! Cookie Kingdom game logic: pure functions over `GameState`.
//!
//! Every transition takes `&mut GameState` and reports whether it applied.
//! A rejected transition leaves the state untouched, so callers may invoke
//! any action speculatively.

use super::state::{
    GameState, ItemDefinition, LevelUp, ProductionKind, Season, TickReport, UpgradeDefinition,
    WorldAdvance, ACTIVE_SLOT_COUNT, COOKIES_PER_TICK_REWARD, COST_MULTIPLIER, DAYS_PER_SEASON,
    ITEM_COST_MULTIPLIER, LEVEL_BONUS_PER_LEVEL, SECONDS_PER_TICK, TICKS_PER_DAY,
    TICKS_PER_REWARD,
};

// ── Upgrade economy ─────────────────────────────────────────────

/// Cost of the next unit when `owned` units are already owned.
/// Grows without a ceiling and becomes infinite once it leaves `f64` range.
pub fn upgrade_cost(upgrade: &UpgradeDefinition, owned: u32) -> f64 {
    scaled_cost(upgrade.base_cost, COST_MULTIPLIER, owned)
}

pub fn can_buy_upgrade(state: &GameState, upgrade: &UpgradeDefinition) -> bool {
    let owned = state.owned_count(&upgrade.id);
    owned < u32::MAX && affords(state.cookies, upgrade_cost(upgrade, owned))
}

/// Try to buy one unit of an upgrade. Returns true if successful.
pub fn buy_upgrade(state: &mut GameState, upgrade: &UpgradeDefinition) -> bool {
    let owned = state.owned_count(&upgrade.id);
    let Some(next) = owned.checked_add(1) else {
        return false;
    };
    let cost = upgrade_cost(upgrade, owned);
    if !affords(state.cookies, cost) {
        return false;
    }
    state.cookies -= cost;
    state.upgrades.insert(upgrade.id.clone(), next);
    true
}

/// `floor(base * multiplier^owned)`.
fn scaled_cost(base_cost: u64, multiplier: f64, owned: u32) -> f64 {
    (base_cost as f64 * multiplier.powf(owned as f64)).floor()
}

/// False for an infinite or NaN cost.
fn affords(cookies: f64, cost: f64) -> bool {
    cost.is_finite() && cookies >= cost
}

// ── Slots ───────────────────────────────────────────────────────

/// Place an owned upgrade into `slot_index`, removing it from any other slot.
/// Whatever previously held the slot becomes unslotted.
/// Returns false when the index is out of range, the upgrade is not owned,
/// or the slots would be unchanged.
pub fn assign_slot(state: &mut GameState, upgrade_id: &str, slot_index: usize) -> bool {
    if slot_index >= ACTIVE_SLOT_COUNT {
        return false;
    }
    if state.owned_count(upgrade_id) == 0 {
        return false;
    }
    if state.active_slots[slot_index].as_deref() == Some(upgrade_id) {
        return false;
    }

    for slot in state.active_slots.iter_mut() {
        if slot.as_deref() == Some(upgrade_id) {
            *slot = None;
        }
    }
    state.active_slots[slot_index] = Some(upgrade_id.to_string());
    true
}

/// Clear a slot. Returns false when the index is out of range or the slot is empty.
pub fn unassign_slot(state: &mut GameState, slot_index: usize) -> bool {
    match state.active_slots.get_mut(slot_index) {
        Some(slot) if slot.is_some() => {
            *slot = None;
            true
        }
        _ => false,
    }
}

// ── Production ──────────────────────────────────────────────────

/// Per-unit output multiplier for an upgrade at `level`.
pub fn power_multiplier(level: u32) -> f64 {
    1.0 + level as f64 * LEVEL_BONUS_PER_LEVEL
}

/// Output of one slotted upgrade (zero when unslotted).
pub fn upgrade_output(state: &GameState, upgrade: &UpgradeDefinition) -> f64 {
    if !state.is_slotted(&upgrade.id) {
        return 0.0;
    }
    let owned = state.owned_count(&upgrade.id) as f64;
    upgrade.amount * power_multiplier(state.upgrade_level(&upgrade.id)) * owned
}

fn production(state: &GameState, definitions: &[UpgradeDefinition], kind: ProductionKind) -> f64 {
    definitions
        .iter()
        .filter(|u| u.kind == kind)
        .map(|u| upgrade_output(state, u))
        .sum()
}

/// Cookies per manual click. Zero when no click upgrade is slotted.
pub fn cookies_per_click(state: &GameState, definitions: &[UpgradeDefinition]) -> f64 {
    production(state, definitions, ProductionKind::Click)
}

pub fn cookies_per_second(state: &GameState, definitions: &[UpgradeDefinition]) -> f64 {
    production(state, definitions, ProductionKind::Cps)
}

/// Manual click. Returns the cookies earned; zero or less credits nothing.
pub fn click(state: &mut GameState, definitions: &[UpgradeDefinition]) -> f64 {
    let earned = cookies_per_click(state, definitions);
    if earned.is_nan() || earned <= 0.0 {
        return 0.0;
    }
    state.earn(earned);
    earned
}

/// Add passive production for `delta_seconds`. Returns true if anything was earned.
pub fn apply_passive_income(
    state: &mut GameState,
    definitions: &[UpgradeDefinition],
    delta_seconds: f64,
) -> bool {
    if !is_positive_finite(delta_seconds) {
        return false;
    }
    let earned = cookies_per_second(state, definitions) * delta_seconds;
    if earned.is_nan() || earned <= 0.0 {
        return false;
    }
    state.earn(earned);
    true
}

// ── Leveling ────────────────────────────────────────────────────

/// Fraction of the way to the next level, in `[0, 1]`. Zero when unowned.
pub fn upgrade_progress_ratio(state: &GameState, upgrade: &UpgradeDefinition) -> f64 {
    if state.owned_count(&upgrade.id) == 0 || !is_positive_finite(upgrade.level_duration_sec) {
        return 0.0;
    }
    (state.level_progress(&upgrade.id) / upgrade.level_duration_sec).clamp(0.0, 1.0)
}

/// Accumulate slotted time for every owned, slotted upgrade and convert
/// whole level durations into levels, carrying the remainder.
/// Unslotted upgrades keep their progress frozen.
/// Returns one entry per upgrade that gained levels, in definition order.
pub fn advance_upgrade_progress(
    state: &mut GameState,
    definitions: &[UpgradeDefinition],
    delta_seconds: f64,
) -> Vec<LevelUp> {
    let mut level_ups = Vec::new();
    if !is_positive_finite(delta_seconds) {
        return level_ups;
    }

    for upgrade in definitions {
        if state.owned_count(&upgrade.id) == 0 || !state.is_slotted(&upgrade.id) {
            continue;
        }
        let duration = upgrade.level_duration_sec;
        if !is_positive_finite(duration) {
            continue;
        }

        let progress = state.level_progress(&upgrade.id) + delta_seconds;
        let (gained, remainder) = split_periods(progress, duration);
        state
            .upgrade_level_progress
            .insert(upgrade.id.clone(), remainder);

        if gained > 0 {
            let from = state.upgrade_level(&upgrade.id);
            let to = from.saturating_add(u32::try_from(gained).unwrap_or(u32::MAX));
            state.upgrade_levels.insert(upgrade.id.clone(), to);
            level_ups.push(LevelUp {
                upgrade_id: upgrade.id.clone(),
                from,
                to,
            });
        }
    }

    level_ups
}

// ── World clock ─────────────────────────────────────────────────

/// Advance the world clock by `delta_seconds` of real time, completing
/// whole ticks and granting a reward for every multiple of
/// `TICKS_PER_REWARD` crossed.
pub fn advance_world_time(state: &mut GameState, delta_seconds: f64) -> WorldAdvance {
    if !is_positive_finite(delta_seconds) {
        return WorldAdvance::default();
    }

    let elapsed = state.tick_progress_seconds + delta_seconds;
    let (ticks, remainder) = split_periods(elapsed, SECONDS_PER_TICK);
    state.tick_progress_seconds = remainder;
    if ticks == 0 {
        return WorldAdvance::default();
    }

    let previous_rewards = state.total_ticks / TICKS_PER_REWARD;
    state.total_ticks = state.total_ticks.saturating_add(ticks);
    let rewards = state.total_ticks / TICKS_PER_REWARD - previous_rewards;
    if rewards > 0 {
        state.earn(rewards as f64 * COOKIES_PER_TICK_REWARD);
    }

    WorldAdvance { ticks, rewards }
}

/// In-game day, starting at 1.
pub fn current_day(state: &GameState) -> u64 {
    state.total_ticks / TICKS_PER_DAY + 1
}

pub fn current_season(state: &GameState) -> Season {
    let seasons = Season::all();
    let index = ((current_day(state) - 1) / DAYS_PER_SEASON) % seasons.len() as u64;
    seasons[index as usize]
}

pub fn seconds_until_next_tick(state: &GameState) -> f64 {
    (SECONDS_PER_TICK - state.tick_progress_seconds).max(0.0)
}

/// Ticks until the next reward. A full period when sitting exactly on a multiple.
pub fn ticks_until_next_reward(state: &GameState) -> u64 {
    TICKS_PER_REWARD - state.total_ticks % TICKS_PER_REWARD
}

pub fn seconds_until_next_reward(state: &GameState) -> f64 {
    let whole_ticks = (ticks_until_next_reward(state) - 1) as f64;
    whole_ticks * SECONDS_PER_TICK + seconds_until_next_tick(state)
}

// ── Frame step ──────────────────────────────────────────────────

/// Advance the whole simulation by one host frame:
/// world time, then passive income, then upgrade progress.
pub fn tick(
    state: &mut GameState,
    definitions: &[UpgradeDefinition],
    delta_seconds: f64,
) -> TickReport {
    if !is_positive_finite(delta_seconds) {
        return TickReport::default();
    }
    let world = advance_world_time(state, delta_seconds);
    let before = state.cookies;
    apply_passive_income(state, definitions, delta_seconds);
    let income = state.cookies - before;
    let level_ups = advance_upgrade_progress(state, definitions, delta_seconds);
    TickReport {
        world,
        income,
        level_ups,
    }
}

// ── Item economy ────────────────────────────────────────────────

pub fn item_cost(item: &ItemDefinition, owned: u32) -> f64 {
    scaled_cost(item.base_cost, ITEM_COST_MULTIPLIER, owned)
}

pub fn can_buy_item(state: &GameState, item: &ItemDefinition) -> bool {
    let owned = state.owned_item_count(&item.id);
    owned < u32::MAX && affords(state.cookies, item_cost(item, owned))
}

/// Try to buy one collectible item. Returns true if successful.
pub fn buy_item(state: &mut GameState, item: &ItemDefinition) -> bool {
    let owned = state.owned_item_count(&item.id);
    let Some(next) = owned.checked_add(1) else {
        return false;
    };
    let cost = item_cost(item, owned);
    if !affords(state.cookies, cost) {
        return false;
    }
    state.cookies -= cost;
    state.inventory_items.insert(item.id.clone(), next);
    true
}

// ── Helpers ─────────────────────────────────────────────────────

fn is_positive_finite(seconds: f64) -> bool {
    seconds.is_finite() && seconds > 0.0
}

/// Split `total` into whole `period`s and a remainder in `[0, period)`.
/// `period` must be positive and finite.
fn split_periods(total: f64, period: f64) -> (u64, f64) {
    let mut whole = (total / period).floor().max(0.0);
    let mut remainder = total - whole * period;
    // Division rounding can leave the remainder a hair outside the range.
    if remainder < 0.0 && whole > 0.0 {
        whole -= 1.0;
        remainder += period;
    }
    if remainder >= period {
        whole += 1.0;
        remainder -= period;
    }
    (whole as u64, remainder.max(0.0))
}

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if !n.is_finite() {
        return "∞".to_string();
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    let tenths = (frac * 10.0).round() as u8;
    if frac > 0.05 && tenths < 10 {
        format!("{}.{}", result, tenths)
    } else {
        result
    }
}
