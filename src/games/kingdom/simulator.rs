//! Scripted play-through for Cookie Kingdom.
//! Run with: cargo test simulate_session -- --nocapture

use crate::games::kingdom::catalog::Catalog;
use crate::games::kingdom::logic;
use crate::games::kingdom::save;
use crate::games::kingdom::state::*;

const FRAME_SECS: f64 = 0.25;
const FRAMES_PER_SECOND: u32 = 4;
const CLICKS_PER_SECOND: u32 = 5;

struct SessionStats {
    purchases: u32,
    items_bought: u32,
    rewards: u64,
    levels_gained: u64,
}

/// Output an owned upgrade would give if slotted, clicks weighted by click rate.
fn slotted_value(state: &GameState, upgrade: &UpgradeDefinition) -> f64 {
    let per_unit = upgrade.amount * logic::power_multiplier(state.upgrade_level(&upgrade.id));
    let weight = match upgrade.kind {
        ProductionKind::Click => CLICKS_PER_SECOND as f64,
        ProductionKind::Cps => 1.0,
    };
    per_unit * state.owned_count(&upgrade.id) as f64 * weight
}

/// Unowned upgrades first, then the best value per cookie.
fn pick_purchase<'a>(state: &GameState, catalog: &'a Catalog) -> Option<&'a UpgradeDefinition> {
    let affordable = catalog
        .upgrades
        .iter()
        .filter(|u| logic::can_buy_upgrade(state, u));
    let mut best: Option<(f64, &UpgradeDefinition)> = None;
    for upgrade in affordable {
        if state.owned_count(&upgrade.id) == 0 {
            return Some(upgrade);
        }
        let cost = logic::upgrade_cost(upgrade, state.owned_count(&upgrade.id));
        let score = upgrade.amount / cost;
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, upgrade));
        }
    }
    best.map(|(_, u)| u)
}

/// Put the most valuable owned upgrades into the slots.
fn arrange_slots(state: &mut GameState, catalog: &Catalog) {
    let mut owned: Vec<&UpgradeDefinition> = catalog
        .upgrades
        .iter()
        .filter(|u| state.owned_count(&u.id) > 0)
        .collect();
    owned.sort_by(|a, b| slotted_value(state, b).total_cmp(&slotted_value(state, a)));
    for (slot, upgrade) in owned.into_iter().take(ACTIVE_SLOT_COUNT).enumerate() {
        logic::assign_slot(state, &upgrade.id, slot);
    }
}

fn report(state: &GameState, catalog: &Catalog, seconds: u32, stats: &SessionStats) {
    eprintln!("┌─── {}m{}s ─────────────────────────", seconds / 60, seconds % 60);
    eprintln!(
        "│ Cookies: {}  CPS: {}  Per click: {}",
        logic::format_number(state.cookies),
        logic::format_number(logic::cookies_per_second(state, &catalog.upgrades)),
        logic::format_number(logic::cookies_per_click(state, &catalog.upgrades))
    );
    eprintln!(
        "│ Lifetime: {}  Day {} ({})  Purchases: {}  Items: {}",
        logic::format_number(state.lifetime_cookies),
        logic::current_day(state),
        logic::current_season(state).name(),
        stats.purchases,
        stats.items_bought
    );
    let upgrades: Vec<String> = catalog
        .upgrades
        .iter()
        .map(|u| format!("{}:{}(Lv{})", u.name, state.owned_count(&u.id), state.upgrade_level(&u.id)))
        .collect();
    eprintln!("│ Upgrades: {}", upgrades.join("  "));
    eprintln!("└────────────────────────────────────");
}

/// Play `total_seconds` with a greedy strategy, checking state invariants every second.
fn simulate(total_seconds: u32) -> (GameState, SessionStats) {
    let catalog = Catalog::standard();
    let mut state = GameState::new();
    let mut stats = SessionStats {
        purchases: 0,
        items_bought: 0,
        rewards: 0,
        levels_gained: 0,
    };

    for second in 1..=total_seconds {
        let lifetime_before = state.lifetime_cookies;
        let levels_before = state.upgrade_levels.clone();

        for _ in 0..CLICKS_PER_SECOND {
            logic::click(&mut state, &catalog.upgrades);
        }
        for _ in 0..FRAMES_PER_SECOND {
            let frame = logic::tick(&mut state, &catalog.upgrades, FRAME_SECS);
            stats.rewards += frame.world.rewards;
            stats.levels_gained += frame.level_ups.iter().map(|l| l.gained() as u64).sum::<u64>();
        }

        // One collectible a minute, before upgrades take the rest.
        if second % 60 == 0 {
            if let Some(item) = catalog.items.iter().find(|i| logic::can_buy_item(&state, i)) {
                assert!(logic::buy_item(&mut state, item));
                stats.items_bought += 1;
            }
        }
        while let Some(upgrade) = pick_purchase(&state, &catalog) {
            assert!(logic::buy_upgrade(&mut state, upgrade));
            stats.purchases += 1;
        }
        arrange_slots(&mut state, &catalog);

        assert!(state.cookies >= 0.0);
        assert!(state.lifetime_cookies >= lifetime_before);
        assert!(state.tick_progress_seconds >= 0.0 && state.tick_progress_seconds < SECONDS_PER_TICK);
        for (id, level) in &levels_before {
            assert!(state.upgrade_level(id) >= *level);
        }
        for upgrade in &catalog.upgrades {
            assert!(state.level_progress(&upgrade.id) < upgrade.level_duration_sec);
        }

        if second % 300 == 0 {
            report(&state, &catalog, second, &stats);
        }
    }

    (state, stats)
}

#[test]
fn simulate_session_30min() {
    let (state, stats) = simulate(1800);
    let catalog = Catalog::standard();

    assert_eq!(state.total_ticks, 180);
    assert_eq!(stats.rewards, 15);
    assert!(state.lifetime_cookies >= 15.0 * COOKIES_PER_TICK_REWARD);

    // Every upgrade is bought and slotted once the first reward lands.
    for upgrade in &catalog.upgrades {
        assert!(state.owned_count(&upgrade.id) > 0, "{} never bought", upgrade.id);
        assert!(state.is_slotted(&upgrade.id), "{} not slotted", upgrade.id);
    }

    let total_levels: u64 = state.upgrade_levels.values().map(|&l| l as u64).sum();
    assert_eq!(total_levels, stats.levels_gained);
    assert!(total_levels > 0);
    assert!(stats.items_bought > 0);
}

#[test]
fn simulate_session_is_deterministic() {
    let (a, _) = simulate(600);
    let (b, _) = simulate(600);
    assert_eq!(a, b);
}

#[test]
fn simulated_state_survives_save_roundtrip() {
    let (state, _) = simulate(900);
    let json = save::to_json(&state).unwrap();
    assert_eq!(save::from_json(&json).unwrap(), state);
}
