//! Input plumbing shared by the host and the game: normalized events,
//! click-target registry, and pixel -> terminal cell conversion.

use ratzilla::ratatui::layout::Rect;

/// Keyboard and pointer input, normalized before it reaches the game.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// Esc key.
    Cancel,
    /// A tap on a registered target, identified by its semantic action ID.
    Click(u16),
}

/// A screen region that triggers an action when tapped.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last render, plus the terminal size
/// they were registered against.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl Default for ClickState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame: remember the terminal size and drop stale targets.
    pub fn begin_frame(&mut self, area: Rect) {
        self.terminal_cols = area.width;
        self.terminal_rows = area.height;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Register a one-row target spanning `area`'s width. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.bottom() {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a row of tabs laid out left to right.
    ///
    /// `tab_widths` holds `(label_width, action_id)` per tab. Each target
    /// covers its label plus half of each neighbouring separator; the first
    /// and last tabs stretch to the edges of `area`.
    pub fn register_tab_targets(&mut self, tab_widths: &[(u16, u16)], separator_width: u16, area: Rect) {
        let Some(last) = tab_widths.len().checked_sub(1) else {
            return;
        };

        let mut spans: Vec<(u16, u16)> = Vec::with_capacity(tab_widths.len());
        let mut cursor = 0u16;
        for &(width, _) in tab_widths {
            spans.push((cursor, cursor + width));
            cursor += width + separator_width;
        }

        let half_gap = separator_width / 2;
        for (i, &(_, action_id)) in tab_widths.iter().enumerate() {
            let (start, end) = spans[i];
            let left = if i == 0 { 0 } else { start - (separator_width - half_gap) };
            let right = if i == last { area.width } else { (end + half_gap).min(area.width) };
            if right > left {
                self.add_click_target(
                    Rect::new(area.x + left, area.y, right - left, area.height.max(1)),
                    action_id,
                );
            }
        }
    }

    /// Action ID at a cell. Later registrations sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                col >= t.rect.x && col < t.rect.right() && row >= t.rect.y && row < t.rect.bottom()
            })
            .map(|t| t.action_id)
    }
}

/// Screens narrower than this stack their panels vertically.
pub const NARROW_LAYOUT_COLS: u16 = 60;

pub fn is_narrow_layout(width: u16) -> bool {
    width < NARROW_LAYOUT_COLS
}

// ── Pixel -> cell ───────────────────────────────────────────────

/// Bounding box of the terminal grid element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl GridBounds {
    /// Terminal `(col, row)` under a viewport pixel, or `None` outside the grid.
    pub fn cell_at(&self, x: f64, y: f64, cols: u16, rows: u16) -> Option<(u16, u16)> {
        let col = axis_cell(x - self.left, self.width, cols)?;
        let row = axis_cell(y - self.top, self.height, rows)?;
        Some((col, row))
    }
}

fn axis_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if !(extent > 0.0) || cells == 0 || !(offset >= 0.0) {
        return None;
    }
    let cell = (offset / (extent / cells as f64)).floor();
    if cell < cells as f64 {
        Some(cell as u16)
    } else {
        None
    }
}
