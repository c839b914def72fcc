//! Clickable UI components: each one renders itself and registers the
//! click targets for what it drew.
//!
//! - [`TabBar`]: one row of tabs.
//! - [`ClickableList`]: lines, some of which are bound to actions.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

struct Tab {
    label: String,
    style: Style,
    action_id: u16,
}

/// A horizontal tab bar.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Upgrades", active_style, TAB_UPGRADES)
///     .tab("Item Shop", idle_style, TAB_ITEMS)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<Tab>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push(Tab {
            label: format!(" {} ", label.into()),
            style,
            action_id,
        });
        self
    }

    /// Wrap the bar in a block. Click targets follow the block's inner area.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// `(display_width, action_id)` per tab, as laid out on screen.
    fn tab_widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|t| (Line::from(t.label.as_str()).width() as u16, t.action_id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let widths = self.tab_widths();
        let separator_width = Line::from(self.separator).width() as u16;
        let separator_style = Style::default().fg(Color::DarkGray);

        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, tab) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, separator_style));
            }
            spans.push(Span::styled(tab.label, tab.style));
        }

        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        let mut paragraph = Paragraph::new(Line::from(spans));
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        f.render_widget(paragraph, area);

        // Full outer height keeps the bar easy to tap.
        let hit_area = Rect::new(inner.x, area.y, inner.width, area.height);
        cs.register_tab_targets(&widths, separator_width, hit_area);
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines paired with the actions they trigger.
///
/// Rows are resolved when targets are registered, so inserting lines
/// above a clickable one moves its target along with it. Lines are
/// assumed not to wrap.
#[derive(Default)]
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a full-width row target for every clickable line visible in
    /// `content`, skipping the first `scroll` lines.
    pub fn register_targets(&self, content: Rect, cs: &mut ClickState, scroll: usize) {
        for &(index, action_id) in &self.actions {
            let Some(offset) = index.checked_sub(scroll) else {
                continue;
            };
            if offset >= content.height as usize {
                continue;
            }
            cs.add_row_target(content, content.y + offset as u16, action_id);
        }
    }

    /// Same as [`register_targets`](Self::register_targets), for a list drawn
    /// inside `block` over `area`.
    pub fn register_targets_in(&self, area: Rect, block: &Block, cs: &mut ClickState) {
        self.register_targets(block.inner(area), cs, 0);
    }
}
