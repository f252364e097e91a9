//! 保存データ・プロジェクトファイルの読み込みと正規化
//!
//! スキーマのバージョン番号は記録されないため、読み込み経路
//! （localStorage相当の保存領域・バックアップ・プロジェクトファイル）
//! はすべて同じ正規化関数を通す。

use crate::error::{Error, Result};
use crate::project::ProjectState;
use serde_json::{Map, Value};

const PANEL_ITEMS: &str = "panelItems";
const PROJECT_INFO: &str = "projectInfo";
const ACTIVE_ITEM_ID: &str = "activeItemId";

/// 旧フィールド名 → 現在のフィールド名
const LEGACY_SCENE_KEYS: [(&str, &str); 2] = [("heading", "description"), ("location", "sceneSetting")];

/// 欠けているトップレベル項目を補い、`ProjectState` に変換する
///
/// - `projectInfo` → `{}`
/// - `panelItems` → `[]`
/// - `activeItemId` が未設定・無効なら最初のシーケンス
/// - シーンの旧フィールド名を現在の名前に読み替える（両方あれば現在の名前を優先）
pub fn normalize(value: Value) -> Result<ProjectState> {
    let Value::Object(mut map) = value else {
        return Err(Error::CorruptData("プロジェクトデータがオブジェクトではありません".into()));
    };

    fill_default(&mut map, PANEL_ITEMS, Value::Array(Vec::new()));
    fill_default(&mut map, PROJECT_INFO, Value::Object(Map::new()));
    fill_default(&mut map, ACTIVE_ITEM_ID, Value::Null);

    if !map.get(PANEL_ITEMS).is_some_and(Value::is_array) {
        return Err(Error::CorruptData("panelItems が配列ではありません".into()));
    }
    fold_legacy_scene_keys(&mut map);

    let mut state: ProjectState = serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::CorruptData(format!("プロジェクトデータの構造が不正: {}", e)))?;
    state.ensure_active();
    state.rebuild_session();
    Ok(state)
}

fn fill_default(map: &mut Map<String, Value>, key: &str, default: Value) {
    match map.get(key) {
        None | Some(Value::Null) => {
            map.insert(key.to_string(), default);
        }
        Some(_) => {}
    }
}

fn fold_legacy_scene_keys(map: &mut Map<String, Value>) {
    let Some(Value::Array(items)) = map.get_mut(PANEL_ITEMS) else {
        return;
    };
    for item in items.iter_mut() {
        let Some(Value::Array(scenes)) = item.get_mut("scenes") else {
            continue;
        };
        for scene in scenes.iter_mut().filter_map(Value::as_object_mut) {
            for (legacy, current) in LEGACY_SCENE_KEYS {
                let Some(old) = scene.remove(legacy) else {
                    continue;
                };
                if scene.get(current).map_or(true, Value::is_null) {
                    scene.insert(current.to_string(), old);
                }
            }
        }
    }
}

/// 保存領域の文字列を読み込む
pub fn parse_stored_blob(text: &str) -> Result<ProjectState> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::CorruptData(format!("JSONとして読み込めません: {}", e)))?;
    normalize(value)
}

/// プロジェクトファイルを読み込む（保存領域より厳格）
///
/// `panelItems` が配列で、`projectInfo` キーが存在することを要求する。
pub fn parse_project_file(text: &str) -> Result<ProjectState> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::CorruptData(format!("JSONとして読み込めません: {}", e)))?;

    let valid = value
        .as_object()
        .is_some_and(|obj| obj.get(PANEL_ITEMS).is_some_and(Value::is_array) && obj.contains_key(PROJECT_INFO));
    if !valid {
        return Err(Error::InvalidFormat(format!(
            "{} (配列) と {} が必要です",
            PANEL_ITEMS, PROJECT_INFO
        )));
    }
    normalize(value)
}

/// プロジェクトファイル（自己記述的なスナップショット）を生成
pub fn project_file_json(state: &ProjectState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;
    use crate::scene::{SceneFields, SceneStatus};

    #[test]
    fn test_fill_missing_top_level() {
        let state = parse_stored_blob("{}").expect("正規化失敗");
        assert!(state.panel_items.is_empty());
        assert_eq!(state.active_item_id, None);
        assert_eq!(state.project_info.prod_name, "");
    }

    #[test]
    fn test_null_fields_defaulted() {
        let state = parse_stored_blob(r#"{"panelItems": null, "projectInfo": null}"#).expect("正規化失敗");
        assert!(state.panel_items.is_empty());
    }

    #[test]
    fn test_active_item_auto_selected() {
        let json = r#"{
            "panelItems": [
                {"type": "schedule_break", "id": 1, "name": "DAY 1"},
                {"type": "sequence", "id": 2, "name": "X", "scenes": []}
            ],
            "activeItemId": null,
            "projectInfo": {}
        }"#;
        let state = parse_stored_blob(json).expect("正規化失敗");
        assert_eq!(state.active_item_id, Some(ItemId(2)));
    }

    #[test]
    fn test_active_item_pointing_at_break_repaired() {
        let json = r#"{
            "panelItems": [
                {"type": "schedule_break", "id": 1, "name": "DAY 1"},
                {"type": "sequence", "id": 2, "name": "X"}
            ],
            "activeItemId": 1
        }"#;
        let state = parse_stored_blob(json).expect("正規化失敗");
        assert_eq!(state.active_item_id, Some(ItemId(2)));
    }

    #[test]
    fn test_legacy_scene_keys() {
        let json = r#"{
            "panelItems": [
                {"type": "sequence", "id": 2, "name": "X", "scenes": [
                    {"id": 5, "heading": "Chase", "location": "ROOFTOP"},
                    {"id": 6, "heading": "Old", "description": "New", "location": "A", "sceneSetting": null}
                ]}
            ],
            "projectInfo": {}
        }"#;
        let state = parse_stored_blob(json).expect("正規化失敗");
        let scenes = &state.sequences().next().expect("シーケンスがない").scenes;
        assert_eq!(scenes[0].fields.description, "Chase");
        assert_eq!(scenes[0].fields.scene_setting, "ROOFTOP");
        assert_eq!(scenes[1].fields.description, "New");
        assert_eq!(scenes[1].fields.scene_setting, "A");

        // 書き出しは現在の名前だけ
        let json = project_file_json(&state).expect("シリアライズ失敗");
        assert!(!json.contains("heading"));
        assert!(!json.contains("\"location\""));
    }

    #[test]
    fn test_corrupt_inputs() {
        for text in ["not json", "[1, 2]", r#"{"panelItems": 3}"#, r#"{"panelItems": [{"type": "folder", "id": 1}]}"#] {
            let err = parse_stored_blob(text).unwrap_err();
            assert!(matches!(err, Error::CorruptData(_)), "CorruptDataではない: {} -> {:?}", text, err);
        }
    }

    #[test]
    fn test_project_file_strict() {
        let err = parse_project_file(r#"{"foo": 1}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));

        let err = parse_project_file(r#"{"panelItems": []}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));

        let err = parse_project_file("{").unwrap_err();
        assert!(matches!(err, Error::CorruptData(_)));

        assert!(parse_project_file(r#"{"panelItems": [], "projectInfo": null}"#).is_ok());
    }

    #[test]
    fn test_roundtrip() {
        let mut state = ProjectState::new();
        state.project_info.prod_name = "Night Bus".to_string();
        state.create_schedule_break("DAY 1").expect("区切り追加失敗");
        state.create_sequence(Some("Depot"));
        state
            .add_scene(SceneFields {
                number: "4".to_string(),
                status: Some(SceneStatus::Done),
                contact: "Yui".to_string(),
                ..Default::default()
            })
            .expect("シーン追加失敗");

        let json = project_file_json(&state).expect("シリアライズ失敗");
        assert!(json.contains("\"panelItems\""));
        assert!(json.contains("\"activeItemId\""));
        assert!(json.contains("\"projectInfo\""));

        let restored = parse_project_file(&json).expect("読み込み失敗");
        assert_eq!(restored, state);
        assert_eq!(restored.last_contact(), "Yui");
    }

    #[test]
    fn test_loaded_ids_not_reused() {
        let future = chrono::Utc::now().timestamp_millis() + 10_000_000;
        let json = format!(
            r#"{{"panelItems": [{{"type": "sequence", "id": {}, "name": "S", "scenes": [{{"id": {}}}]}}], "projectInfo": {{}}}}"#,
            future,
            future + 1
        );
        let mut state = parse_project_file(&json).expect("読み込み失敗");
        let id = state.add_scene(SceneFields::default()).expect("シーン追加失敗");
        assert!(id.0 > future + 1);
    }
}
