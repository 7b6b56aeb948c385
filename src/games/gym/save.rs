//! Gym Gains セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   破壊的変更を行った場合のみインクリメントする。
//!
//! カタログ由来の配列は ID をキーに保存する。ロード時は新規状態の上に
//! ID 一致で可変フィールド（level / purchased / unlocked 等）だけを上書きする。
//! カタログから消えた ID は無視し、追加された項目はデフォルト値のまま残る。

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::Tier;
use super::challenge::DailyChallenge;
use super::state::{starting_location_index, GymState, HistoryPoint, PendingGains, Settings, TierUpgradeState};

/// セーブデータのフォーマットバージョン。
const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "gym_gains_save";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize save: {0}")]
    Serialize(serde_json::Error),
    #[error("save data is not valid JSON: {0}")]
    Parse(serde_json::Error),
    #[error("save string is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("save string is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("save version {found} is older than the oldest supported ({min})")]
    IncompatibleVersion { found: u32, min: u32 },
    #[error("browser storage is unavailable")]
    StorageUnavailable,
    #[error("failed to write browser storage: {0}")]
    StorageWrite(String),
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

/// レベルを持つ項目 (upgrade / tier upgrade / ally)。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct LevelSave {
    id: String,
    level: u32,
}

/// 購入・解放フラグだけを持つ項目。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct FlagSave {
    id: String,
    owned: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct ConsumableSave {
    id: String,
    #[serde(default)]
    uses: u32,
    #[serde(default)]
    active_until_ms: Option<f64>,
    #[serde(default)]
    cooldown_until_ms: Option<f64>,
}

/// シリアライズ用のセーブデータ。ログやクリック制限の履歴は含まない。
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    calories: f64,
    total_calories: f64,
    lifetime_calories: f64,
    protein_points: f64,
    titan_tokens: f64,
    divinity_points: f64,

    upgrades: Vec<LevelSave>,
    one_time_upgrades: Vec<FlagSave>,
    equipment: Vec<FlagSave>,
    locations: Vec<FlagSave>,
    current_location: String,
    consumables: Vec<ConsumableSave>,

    prestige_upgrades: Vec<LevelSave>,
    ascension_upgrades: Vec<LevelSave>,
    transcendence_upgrades: Vec<LevelSave>,
    allies: Vec<LevelSave>,
    /// 解放済み実績の ID。
    achievements: Vec<String>,

    // 統計
    total_lifts: u64,
    critical_hits: u64,
    max_combo: u32,
    upgrades_purchased: u64,
    play_time_secs: f64,
    prestige_count: u32,
    ascension_count: u32,
    transcendence_count: u32,

    combo: u32,
    pending: PendingGains,
    daily_challenge: Option<DailyChallenge>,
    calorie_history: Vec<HistoryPoint>,
    last_save_ms: f64,
    settings: Settings,
    rng_seed: u64,
}

fn levels(items: impl Iterator<Item = (&'static str, u32)>) -> Vec<LevelSave> {
    items.map(|(id, level)| LevelSave { id: id.to_string(), level }).collect()
}

fn flags(items: impl Iterator<Item = (&'static str, bool)>) -> Vec<FlagSave> {
    items.map(|(id, owned)| FlagSave { id: id.to_string(), owned }).collect()
}

fn tier_levels(upgrades: &[TierUpgradeState]) -> Vec<LevelSave> {
    levels(upgrades.iter().map(|u| (u.def.id, u.level)))
}

/// GymState からセーブ用データを抽出する。
fn extract_save(state: &GymState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            calories: state.calories,
            total_calories: state.total_calories,
            lifetime_calories: state.lifetime_calories,
            protein_points: state.protein_points,
            titan_tokens: state.titan_tokens,
            divinity_points: state.divinity_points,
            upgrades: levels(state.upgrades.iter().map(|u| (u.def.id, u.level))),
            one_time_upgrades: flags(state.one_time_upgrades.iter().map(|u| (u.def.id, u.purchased))),
            equipment: flags(state.equipment.iter().map(|e| (e.def.id, e.purchased))),
            locations: flags(state.locations.iter().map(|l| (l.def.id, l.unlocked))),
            current_location: state.current_location_def().id.to_string(),
            consumables: state
                .consumables
                .iter()
                .map(|c| ConsumableSave {
                    id: c.def.id.to_string(),
                    uses: c.uses,
                    active_until_ms: c.active_until_ms,
                    cooldown_until_ms: c.cooldown_until_ms,
                })
                .collect(),
            prestige_upgrades: tier_levels(&state.prestige_upgrades),
            ascension_upgrades: tier_levels(&state.ascension_upgrades),
            transcendence_upgrades: tier_levels(&state.transcendence_upgrades),
            allies: levels(state.allies.iter().map(|a| (a.def.id, a.level))),
            achievements: state
                .achievements
                .iter()
                .filter(|a| a.unlocked)
                .map(|a| a.def.id.to_string())
                .collect(),
            total_lifts: state.total_lifts,
            critical_hits: state.critical_hits,
            max_combo: state.max_combo,
            upgrades_purchased: state.upgrades_purchased,
            play_time_secs: state.play_time_secs,
            prestige_count: state.prestige_count,
            ascension_count: state.ascension_count,
            transcendence_count: state.transcendence_count,
            combo: state.combo,
            pending: state.pending.clone(),
            daily_challenge: state.daily_challenge.clone(),
            calorie_history: state.calorie_history.clone(),
            last_save_ms: state.last_save_ms,
            settings: state.settings.clone(),
            rng_seed: state.rng_seed,
        },
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn merge_tier(state: &mut GymState, tier: Tier, saved: &[LevelSave]) {
    for s in saved {
        if let Some(u) = state.tier_upgrades_mut(tier).iter_mut().find(|u| u.def.id == s.id) {
            u.level = s.level.min(u.def.max_level);
        }
    }
}

/// セーブデータを新規状態の上にマージする。
/// 未知の ID は無視し、レベルはカタログの上限に丸める。
fn apply_save(state: &mut GymState, save: &GameSave) {
    state.calories = finite_or_zero(save.calories);
    state.total_calories = finite_or_zero(save.total_calories);
    state.lifetime_calories = finite_or_zero(save.lifetime_calories).max(state.total_calories);
    state.protein_points = finite_or_zero(save.protein_points);
    state.titan_tokens = finite_or_zero(save.titan_tokens);
    state.divinity_points = finite_or_zero(save.divinity_points);

    for s in &save.upgrades {
        if let Some(u) = state.upgrades.iter_mut().find(|u| u.def.id == s.id) {
            u.level = s.level.min(u.def.max_level_or_inf());
        }
    }
    for s in &save.one_time_upgrades {
        if let Some(u) = state.one_time_upgrades.iter_mut().find(|u| u.def.id == s.id) {
            u.purchased = s.owned;
        }
    }
    for s in &save.equipment {
        if let Some(e) = state.equipment.iter_mut().find(|e| e.def.id == s.id) {
            e.purchased = s.owned;
        }
    }
    for s in &save.locations {
        if let Some(l) = state.locations.iter_mut().find(|l| l.def.id == s.id) {
            l.unlocked = s.owned;
        }
    }
    // 現在地は解放済みの場所のみ。それ以外は初期ジムに戻す。
    let start = starting_location_index();
    if let Some(l) = state.locations.get_mut(start) {
        l.unlocked = true;
    }
    state.current_location = state
        .locations
        .iter()
        .position(|l| l.def.id == save.current_location && l.unlocked)
        .unwrap_or(start);

    for s in &save.consumables {
        if let Some(c) = state.consumables.iter_mut().find(|c| c.def.id == s.id) {
            c.uses = s.uses;
            c.active_until_ms = s.active_until_ms;
            c.cooldown_until_ms = s.cooldown_until_ms;
        }
    }

    merge_tier(state, Tier::Prestige, &save.prestige_upgrades);
    merge_tier(state, Tier::Ascension, &save.ascension_upgrades);
    merge_tier(state, Tier::Transcendence, &save.transcendence_upgrades);

    for s in &save.allies {
        if let Some(a) = state.allies.iter_mut().find(|a| a.def.id == s.id) {
            a.level = s.level;
        }
    }
    for id in &save.achievements {
        if let Some(a) = state.achievements.iter_mut().find(|a| a.def.id == *id) {
            a.unlocked = true;
        }
    }

    // 統計
    state.total_lifts = save.total_lifts;
    state.critical_hits = save.critical_hits;
    state.max_combo = save.max_combo;
    state.upgrades_purchased = save.upgrades_purchased;
    state.play_time_secs = finite_or_zero(save.play_time_secs);
    state.prestige_count = save.prestige_count;
    state.ascension_count = save.ascension_count;
    state.transcendence_count = save.transcendence_count;

    state.combo = save.combo;
    state.pending = save.pending.clone();
    state.daily_challenge = save.daily_challenge.clone();
    state.calorie_history = save.calorie_history.clone();
    state.last_save_ms = save.last_save_ms;
    state.settings = save.settings.clone();
    if save.rng_seed != 0 {
        state.rng_seed = save.rng_seed;
    }
}

/// JSON 文字列へシリアライズする。
pub fn to_json(state: &GymState) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state)).map_err(SaveError::Serialize)
}

/// JSON をパースし、新規状態へマージした GymState を返す。
/// 失敗時は呼び出し側の状態に一切触れない。
pub fn from_json(json: &str) -> Result<GymState, SaveError> {
    let data: SaveData = serde_json::from_str(json).map_err(SaveError::Parse)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            found: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    let mut state = GymState::new();
    apply_save(&mut state, &data.game);
    Ok(state)
}

/// エクスポート用の base64 文字列。
pub fn export_save(state: &GymState) -> Result<String, SaveError> {
    Ok(BASE64.encode(to_json(state)?))
}

/// エクスポート文字列を読み込む。前後の空白は無視する。
pub fn import_save(encoded: &str) -> Result<GymState, SaveError> {
    let bytes = BASE64.decode(encoded.trim())?;
    let json = String::from_utf8(bytes)?;
    from_json(&json)
}

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// ゲーム状態を localStorage に保存する。
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GymState) -> Result<(), SaveError> {
    let json = to_json(state)?;
    let storage = get_storage().ok_or(SaveError::StorageUnavailable)?;
    storage
        .set_item(STORAGE_KEY, &json)
        .map_err(|e| SaveError::StorageWrite(format!("{e:?}")))
}

/// localStorage からゲーム状態を復元する。
/// セーブが無ければ `Ok(None)`。壊れたデータは削除してエラーを返す。
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> Result<Option<GymState>, SaveError> {
    let storage = get_storage().ok_or(SaveError::StorageUnavailable)?;
    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return Ok(None),
    };
    match from_json(&json) {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            web_sys::console::warn_1(&format!("Gym Gains: セーブデータを破棄します: {e}").into());
            let _ = storage.remove_item(STORAGE_KEY);
            Err(e)
        }
    }
}

/// セーブデータを削除する。
#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

/// エクスポート文字列をコピー用ダイアログに表示する。
#[cfg(target_arch = "wasm32")]
pub fn show_export_dialog(code: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.prompt_with_message_and_default("Copy your save code:", code);
    }
}

/// インポート文字列を入力させる。キャンセル時は `None`。
#[cfg(target_arch = "wasm32")]
pub fn ask_import_code() -> Option<String> {
    web_sys::window()?.prompt_with_message("Paste your save code:").ok()?
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn import_never_panics(input in ".{0,200}") {
            let _ = import_save(&input);
        }

        #[test]
        fn levels_survive_roundtrip(levels in proptest::collection::vec(0u32..200, 19)) {
            let mut s = GymState::new();
            for (u, l) in s.upgrades.iter_mut().zip(levels) {
                u.level = l.min(u.def.max_level_or_inf());
            }
            let restored = import_save(&export_save(&s).unwrap()).unwrap();
            prop_assert_eq!(&s.upgrades, &restored.upgrades);
        }
    }
}
