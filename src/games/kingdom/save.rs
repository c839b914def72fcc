//! Cookie Kingdom セーブ/ロード機能。
//!
//! ## 読み込み方針
//!
//! localStorage の中身は外部データとして扱い、フィールド単位で寛容に読み込む。
//!
//! - 数値フィールド: 数値 (または数値文字列) 以外・負数・非有限値は 0。
//! - マップフィールド: オブジェクト以外は空。不正な値のエントリは捨てる。
//! - `activeSlots`: 必ず `ACTIVE_SLOT_COUNT` 要素に切り詰め/補完する。
//!   文字列以外は空スロット、同じ ID が複数あれば最初のスロットだけ残す。
//!
//! JSON として壊れている場合だけ `SaveError` になり、呼び出し側で新規ゲームにする。
//! バージョン管理やマイグレーションは行わない。

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::state::{GameState, ACTIVE_SLOT_COUNT, SECONDS_PER_TICK};

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "cookie-kingdom-save-v1";

/// 定期オートセーブの間隔 (フレーム時間の秒数)。
pub const AUTOSAVE_INTERVAL_SECS: f64 = 5.0;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("localStorage is unavailable")]
    StorageUnavailable,
    #[error("localStorage write failed: {0}")]
    Storage(String),
}

/// シリアライズ用のセーブデータ構造体。キー名は camelCase。
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
struct SaveData {
    #[serde(deserialize_with = "lenient_amount")]
    cookies: f64,
    #[serde(deserialize_with = "lenient_amount")]
    lifetime_cookies: f64,
    #[serde(deserialize_with = "lenient_tick_count")]
    total_ticks: u64,
    #[serde(deserialize_with = "lenient_amount")]
    tick_progress_seconds: f64,
    #[serde(deserialize_with = "lenient_counts")]
    upgrades: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient_counts")]
    upgrade_levels: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient_amounts")]
    upgrade_level_progress: BTreeMap<String, f64>,
    #[serde(deserialize_with = "lenient_slots")]
    active_slots: Vec<Option<String>>,
    #[serde(deserialize_with = "lenient_counts")]
    inventory_items: BTreeMap<String, u32>,
}

/// GameState からセーブ用データを抽出する。
fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        cookies: state.cookies,
        lifetime_cookies: state.lifetime_cookies,
        total_ticks: state.total_ticks,
        tick_progress_seconds: state.tick_progress_seconds,
        upgrades: state.upgrades.clone(),
        upgrade_levels: state.upgrade_levels.clone(),
        upgrade_level_progress: state.upgrade_level_progress.clone(),
        active_slots: state.active_slots.to_vec(),
        inventory_items: state.inventory_items.clone(),
    }
}

/// セーブデータを正規化して GameState に変換する。
fn apply_save(save: SaveData) -> GameState {
    let mut state = GameState::new();
    state.cookies = save.cookies;
    state.lifetime_cookies = save.lifetime_cookies;
    state.total_ticks = save.total_ticks;
    state.tick_progress_seconds = if save.tick_progress_seconds < SECONDS_PER_TICK {
        save.tick_progress_seconds
    } else {
        0.0
    };
    state.upgrades = save.upgrades;
    state.upgrade_levels = save.upgrade_levels;
    state.upgrade_level_progress = save.upgrade_level_progress;
    state.inventory_items = save.inventory_items;

    // 余分なスロットは捨て、足りない分は空のまま。重複 ID は最初の1つだけ残す。
    for (index, slot) in save
        .active_slots
        .into_iter()
        .take(ACTIVE_SLOT_COUNT)
        .enumerate()
    {
        if let Some(id) = slot {
            if !state.is_slotted(&id) {
                state.active_slots[index] = Some(id);
            }
        }
    }
    state
}

/// GameState を JSON 文字列にする。
pub fn to_json(state: &GameState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// JSON 文字列から GameState を復元する。
/// JSON として読めない場合のみエラー。オブジェクト以外のトップレベルは新規状態。
pub fn from_json(json: &str) -> Result<GameState, SaveError> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Ok(GameState::new());
    }
    let save = SaveData::deserialize(value)?;
    Ok(apply_save(save))
}

// ── 寛容なデシリアライザ ─────────────────────────────────────────

/// 数値または数値文字列を f64 として読む。
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 有限かつ 0 以上の数値だけを通す。
fn as_amount(value: &Value) -> Option<f64> {
    as_number(value).filter(|n| n.is_finite() && *n >= 0.0)
}

fn as_count(value: &Value) -> Option<u32> {
    // f64 -> u32 のキャストは飽和する
    as_amount(value).map(|n| n.floor() as u32)
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(as_amount(&value).unwrap_or(0.0))
}

fn lenient_tick_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(as_amount(&value).map(|n| n.floor() as u64).unwrap_or(0))
}

fn lenient_map<T>(value: Value, convert: impl Fn(&Value) -> Option<T>) -> BTreeMap<String, T> {
    match value {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, v)| Some((key, convert(&v)?)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

fn lenient_counts<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_map(value, as_count))
}

fn lenient_amounts<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_map(value, as_amount))
}

fn lenient_slots<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<String>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let slots = match value {
        Value::Array(entries) => entries
            .into_iter()
            .map(|v| match v {
                Value::String(id) if !id.is_empty() => Some(id),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(slots)
}

// ── localStorage ────────────────────────────────────────────────

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// ゲーム状態を localStorage に保存する。
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) -> Result<(), SaveError> {
    let json = to_json(state)?;
    let storage = get_storage().ok_or(SaveError::StorageUnavailable)?;
    storage
        .set_item(STORAGE_KEY, &json)
        .map_err(|e| SaveError::Storage(format!("{e:?}")))
}

/// localStorage からゲーム状態を復元する。
/// ストレージが無い・キーが無い・壊れている場合は新規ゲームになる。
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> GameState {
    let storage = match get_storage() {
        Some(s) => s,
        None => return GameState::new(),
    };

    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return GameState::new(),
    };

    match from_json(&json) {
        Ok(state) => state,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Cookie Kingdom: セーブデータのパースに失敗（破棄します）: {e}").into(),
            );
            // 壊れたデータを削除
            let _ = storage.remove_item(STORAGE_KEY);
            GameState::new()
        }
    }
}
