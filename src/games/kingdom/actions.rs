//! Semantic action IDs for Cookie Kingdom click targets.
//!
//! Registered during render, dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_COOKIE: u16 = 0;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_UPGRADES: u16 = 10;
pub const TAB_ITEMS: u16 = 11;
pub const TAB_INVENTORY: u16 = 12;

// ── Upgrade purchase (base + catalog index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Upgrade selection for slotting (base + catalog index) ───────
pub const SELECT_UPGRADE_BASE: u16 = 200;

// ── Active slots (base + slot index) ────────────────────────────
pub const SLOT_BASE: u16 = 300;

// ── Item purchase (base + catalog index) ────────────────────────
pub const BUY_ITEM_BASE: u16 = 400;
pub const CANCEL_SELECTION: u16 = 499;
