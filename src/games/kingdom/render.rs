//! Cookie Kingdom rendering.
//!
//! Layout: header, active slot strip, cookie button, tab bar, tab content,
//! and a message log (right column when wide, bottom strip when narrow).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::logic::{self, format_number};
use super::state::{ItemDefinition, ProductionKind, Rarity, UpgradeDefinition, ACTIVE_SLOT_COUNT};
use super::{KingdomGame, Tab, SELECT_KEYS, SLOT_KEYS};

const PROGRESS_BAR_WIDTH: usize = 10;

pub fn render(game: &KingdomGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);

    let (main_area, log_area) = if narrow {
        let v = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(20), Constraint::Length(6)])
            .split(area);
        (v[0], v[1])
    } else {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h[0], h[1])
    };

    let slot_height = if narrow { ACTIVE_SLOT_COUNT as u16 + 3 } else { 5 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),           // header
            Constraint::Length(slot_height), // slots
            Constraint::Length(3),           // cookie button
            Constraint::Length(1),           // tab bar
            Constraint::Min(4),              // tab content
        ])
        .split(main_area);

    let mut cs = click_state.borrow_mut();
    render_header(game, f, chunks[0], narrow);
    render_slots(game, f, chunks[1], &mut cs, narrow);
    render_cookie_button(game, f, chunks[2], &mut cs, narrow);
    render_tab_bar(game, f, chunks[3], &mut cs);
    match game.tab {
        Tab::Upgrades => render_upgrade_shop(game, f, chunks[4], &mut cs, narrow),
        Tab::Items => render_item_shop(game, f, chunks[4], &mut cs, narrow),
        Tab::Inventory => render_inventory(game, f, chunks[4], narrow),
    }
    drop(cs);

    render_log(game, f, log_area, narrow);
}

// ── Helpers ─────────────────────────────────────────────────────

fn borders_for(narrow: bool) -> Borders {
    if narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    }
}

fn key_hint(key: char) -> String {
    format!("[{}] ", key.to_ascii_uppercase())
}

/// Text progress bar, e.g. `▓▓▓░░░░░░░`.
fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    "▓".repeat(filled) + &"░".repeat(width - filled)
}

fn rarity_color(rarity: Rarity) -> Color {
    match rarity {
        Rarity::Common => Color::Gray,
        Rarity::Uncommon => Color::Green,
        Rarity::Rare => Color::Cyan,
        Rarity::Legendary => Color::Yellow,
    }
}

fn output_label(upgrade: &UpgradeDefinition, output: f64) -> String {
    match upgrade.kind {
        ProductionKind::Click => format!("+{} per click", format_number(output)),
        ProductionKind::Cps => format!("+{}/s", format_number(output)),
    }
}

// ── Header ──────────────────────────────────────────────────────

fn render_header(game: &KingdomGame, f: &mut Frame, area: Rect, narrow: bool) {
    let state = &game.state;
    let cps = logic::cookies_per_second(state, &game.catalog.upgrades);
    let per_click = logic::cookies_per_click(state, &game.catalog.upgrades);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("🍪 {} cookies", format_number(state.cookies.floor())),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}/s  {}/click", format_number(cps), format_number(per_click)),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "Day {} · {}",
                logic::current_day(state),
                logic::current_season(state).name()
            ),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            format!(
                "Next tick {:.1}s · 12th tick {:.1}s ({} ticks)",
                logic::seconds_until_next_tick(state),
                logic::seconds_until_next_reward(state),
                logic::ticks_until_next_reward(state)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Cookie Kingdom ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Active slots ────────────────────────────────────────────────

fn slot_lines<'a>(game: &'a KingdomGame, slot: usize) -> (Line<'a>, Line<'a>) {
    let key = Span::styled(
        key_hint(SLOT_KEYS[slot]),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    );
    let upgrade = game.state.active_slots[slot]
        .as_deref()
        .and_then(|id| game.catalog.find_upgrade(id));

    match upgrade {
        Some(u) => {
            let level = game.state.upgrade_level(&u.id);
            let ratio = logic::upgrade_progress_ratio(&game.state, u);
            (
                Line::from(vec![
                    key,
                    Span::styled(format!("{} {}", u.icon, u.name), Style::default().fg(Color::White)),
                ]),
                Line::from(Span::styled(
                    format!("    Lv{} {}", level, progress_bar(ratio, 6)),
                    Style::default().fg(Color::Green),
                )),
            )
        }
        None => (
            Line::from(vec![key, Span::styled("Drop Here", Style::default().fg(Color::DarkGray))]),
            Line::from(""),
        ),
    }
}

fn render_slots(game: &KingdomGame, f: &mut Frame, area: Rect, cs: &mut ClickState, narrow: bool) {
    let selected = game
        .selected_upgrade
        .as_deref()
        .and_then(|id| game.catalog.find_upgrade(id));
    let border_color = if selected.is_some() { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(border_color))
        .title(" Active Slots ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let hint_row = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
    let slots_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);

    if narrow {
        let mut cl = ClickableList::new();
        for slot in 0..ACTIVE_SLOT_COUNT {
            let (mut name, status) = slot_lines(game, slot);
            name.spans.extend(
                status
                    .spans
                    .into_iter()
                    .map(|s| Span::styled(format!(" {}", s.content.trim_start()), s.style)),
            );
            cl.push_clickable(name, SLOT_BASE + slot as u16);
        }
        cl.register_targets(slots_area, cs, 0);
        f.render_widget(Paragraph::new(cl.into_lines()), slots_area);
    } else {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, ACTIVE_SLOT_COUNT as u32); ACTIVE_SLOT_COUNT])
            .split(slots_area);
        for (slot, cell) in cells.iter().enumerate() {
            let (name, status) = slot_lines(game, slot);
            f.render_widget(Paragraph::new(vec![name, status]), *cell);
            cs.add_click_target(*cell, SLOT_BASE + slot as u16);
        }
    }

    let mut hint = ClickableList::new();
    match selected {
        Some(u) => hint.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!("Placing {} {}: tap a slot  ", u.icon, u.name),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(key_hint('x'), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::styled("cancel", Style::default().fg(Color::Cyan)),
            ]),
            CANCEL_SELECTION,
        ),
        None => hint.push(Line::from(Span::styled(
            "Only slotted upgrades generate cookies.",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    hint.register_targets(hint_row, cs, 0);
    f.render_widget(Paragraph::new(hint.into_lines()), hint_row);
}

// ── Cookie button ───────────────────────────────────────────────

fn render_cookie_button(game: &KingdomGame, f: &mut Frame, area: Rect, cs: &mut ClickState, narrow: bool) {
    let flashing = game.click_flash > 0.0;
    let style = if flashing {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    };
    let per_click = logic::cookies_per_click(&game.state, &game.catalog.upgrades);

    let line = Line::from(vec![
        Span::styled(key_hint('c'), style),
        Span::styled(format!("🍪 Bake cookie (+{})", format_number(per_click)), style),
    ]);
    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(if flashing { Color::White } else { Color::Yellow }));
    f.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
    cs.add_click_target(area, CLICK_COOKIE);
}

// ── Tabs ────────────────────────────────────────────────────────

fn render_tab_bar(game: &KingdomGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let style = |tab: Tab, color: Color| {
        if game.tab == tab {
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    };
    TabBar::new(" │ ")
        .tab("[U] Upgrades", style(Tab::Upgrades, Color::Green), TAB_UPGRADES)
        .tab("[T] Item Shop", style(Tab::Items, Color::Magenta), TAB_ITEMS)
        .tab("[V] Inventory", style(Tab::Inventory, Color::Cyan), TAB_INVENTORY)
        .render(f, area, cs);
}

fn render_upgrade_shop(game: &KingdomGame, f: &mut Frame, area: Rect, cs: &mut ClickState, narrow: bool) {
    let state = &game.state;
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "Buy upgrades for more cookies per click or per second.",
        Style::default().fg(Color::DarkGray),
    )));

    for (i, upgrade) in game.catalog.upgrades.iter().enumerate() {
        let owned = state.owned_count(&upgrade.id);
        let cost = logic::upgrade_cost(upgrade, owned);
        let affordable = logic::can_buy_upgrade(state, upgrade);
        let buy_style = if affordable {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        if i < 9 {
            let digit = char::from(b'1' + i as u8);
            cl.push_clickable(
                Line::from(vec![
                    Span::styled(key_hint(digit), buy_style),
                    Span::styled(format!("{} {}", upgrade.icon, upgrade.name), text_style),
                    Span::styled(
                        format!("  Owned {}  Cost {}", owned, format_number(cost)),
                        text_style,
                    ),
                ]),
                BUY_UPGRADE_BASE + i as u16,
            );
        }

        if !narrow {
            cl.push(Line::from(Span::styled(
                format!("    {}", upgrade.description),
                Style::default().fg(Color::DarkGray),
            )));
        }

        if let Some(&select_key) = SELECT_KEYS.get(i) {
            let is_selected = game.selected_upgrade.as_deref() == Some(upgrade.id.as_str());
            let line = if owned == 0 {
                Line::from(vec![
                    Span::styled(format!("    {}", key_hint(select_key)), Style::default().fg(Color::DarkGray)),
                    Span::styled("Buy this upgrade first", Style::default().fg(Color::DarkGray)),
                ])
            } else {
                let level = state.upgrade_level(&upgrade.id);
                let ratio = logic::upgrade_progress_ratio(state, upgrade);
                let slot_note = match state.slot_of(&upgrade.id) {
                    Some(slot) => format!(" slot {}", slot + 1),
                    None => " idle".to_string(),
                };
                let select_style = if is_selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                };
                Line::from(vec![
                    Span::styled(format!("    {}", key_hint(select_key)), select_style),
                    Span::styled(
                        format!(
                            "Lv{} {} {:>3}%",
                            level,
                            progress_bar(ratio, PROGRESS_BAR_WIDTH),
                            (ratio * 100.0).round() as u32
                        ),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(
                        format!(" {}{}", output_label(upgrade, logic::upgrade_output(state, upgrade)), slot_note),
                        Style::default().fg(Color::White),
                    ),
                ])
            };
            cl.push_clickable(line, SELECT_UPGRADE_BASE + i as u16);
        }
    }

    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(Color::Green))
        .title(" Royal Shop ");
    cl.register_targets_in(area, &block, cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_item_shop(game: &KingdomGame, f: &mut Frame, area: Rect, cs: &mut ClickState, narrow: bool) {
    let state = &game.state;
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        "Buy collectible items with cookies.",
        Style::default().fg(Color::DarkGray),
    )));

    for (i, item) in game.catalog.items.iter().enumerate().take(9) {
        let owned = state.owned_item_count(&item.id);
        let cost = logic::item_cost(item, owned);
        let affordable = logic::can_buy_item(state, item);
        let text_style = if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let digit = char::from(b'1' + i as u8);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    key_hint(digit),
                    if affordable {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                ),
                Span::styled(format!("«{}» ", item.badge), Style::default().fg(rarity_color(item.rarity))),
                Span::styled(item.name.as_str(), text_style),
                Span::styled(format!(" {}", item.rarity.name()), Style::default().fg(rarity_color(item.rarity))),
                Span::styled(
                    format!("  Owned {}  Cost {}", owned, format_number(cost)),
                    text_style,
                ),
            ]),
            BUY_ITEM_BASE + i as u16,
        );
        if !narrow {
            cl.push(Line::from(Span::styled(
                format!("    {}", item.tooltip),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Item Shop ");
    cl.register_targets_in(area, &block, cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

/// Owned items grouped by rarity, most common first. Ids missing from the
/// catalog are skipped.
fn inventory_groups(game: &KingdomGame) -> Vec<(Rarity, Vec<(&ItemDefinition, u32)>)> {
    let owned: Vec<(&ItemDefinition, u32)> = game
        .state
        .inventory_items
        .iter()
        .filter(|(_, &count)| count > 0)
        .filter_map(|(id, &count)| game.catalog.find_item(id).map(|item| (item, count)))
        .collect();

    Rarity::all()
        .iter()
        .filter_map(|&rarity| {
            let group: Vec<_> = owned.iter().copied().filter(|(item, _)| item.rarity == rarity).collect();
            (!group.is_empty()).then_some((rarity, group))
        })
        .collect()
}

fn render_inventory(game: &KingdomGame, f: &mut Frame, area: Rect, narrow: bool) {
    let mut lines = vec![Line::from(Span::styled(
        "Purchased items appear here.",
        Style::default().fg(Color::DarkGray),
    ))];

    let groups = inventory_groups(game);
    if groups.is_empty() {
        lines.push(Line::from(Span::styled(
            "No items yet. Buy from the Item Shop.",
            Style::default().fg(Color::White),
        )));
    }
    for (rarity, items) in groups {
        let color = rarity_color(rarity);
        lines.push(Line::from(Span::styled(
            format!("── {} ──", rarity.name()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for (item, count) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("«{}» ", item.badge), Style::default().fg(color)),
                Span::styled(item.name.as_str(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled(format!("  x{}", count), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", item.tooltip),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Inventory ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// ── Log ─────────────────────────────────────────────────────────

fn render_log(game: &KingdomGame, f: &mut Frame, area: Rect, narrow: bool) {
    let lines: Vec<Line> = game
        .log
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!("> {}", entry.text), style))
        })
        .collect();

    let block = Block::default()
        .borders(borders_for(narrow))
        .border_style(Style::default().fg(Color::Blue))
        .title(" Log ");
    let inner = block.inner(area);

    // Stick to the newest entries: scroll past whatever overflows after wrapping.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let overflow = paragraph
        .line_count(inner.width)
        .saturating_sub(inner.height as usize);
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
    f.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}
