//! 永続化テスト
//!
//! 保存領域（メモリ・ファイル）への保存・読み込み・控えの復元を検証

use tempfile::tempdir;
use toshoot::common::{ItemId, ProjectState, SceneFields};
use toshoot::config::Config;
use toshoot::{
    FileStore, KeyValueStore, LoadOutcome, MemoryStore, ProjectManager, ProjectStore, StartupState, BACKUP_KEY,
    PRIMARY_KEY,
};

fn sample_state() -> ProjectState {
    let mut state = ProjectState::new();
    state.project_info.prod_name = "Harbor Lights".to_string();
    state.create_schedule_break("DAY 1").expect("区切り追加失敗");
    state.create_sequence(Some("Pier"));
    state
        .add_scene(SceneFields {
            number: "1".to_string(),
            cast: "Aoi".to_string(),
            ..Default::default()
        })
        .expect("シーン追加失敗");
    state
}

/// 保存データがなければ初回起動扱い
#[test]
fn test_load_without_data() {
    let store = ProjectStore::new(MemoryStore::new());
    let outcome = store.load().expect("読み込み失敗");
    assert_eq!(outcome, LoadOutcome::NoProject { backup_available: false });
}

/// 空のプロジェクトと「データなし」は区別される
#[test]
fn test_empty_project_is_not_first_run() {
    let mut store = ProjectStore::new(MemoryStore::new());
    store.save(&ProjectState::new()).expect("保存失敗");
    let outcome = store.load().expect("読み込み失敗");
    assert_eq!(outcome, LoadOutcome::Loaded(ProjectState::new()));
}

/// 保存→読み込みで構造が一致する
#[test]
fn test_save_and_load_roundtrip() {
    let state = sample_state();
    let mut store = ProjectStore::new(MemoryStore::new());
    store.save(&state).expect("保存失敗");

    match store.load().expect("読み込み失敗") {
        LoadOutcome::Loaded(loaded) => assert_eq!(loaded, state),
        other => panic!("読み込まれていない: {:?}", other),
    }
}

/// 壊れたデータは CorruptData
#[test]
fn test_corrupt_primary() {
    let mut backend = MemoryStore::new();
    backend.set(PRIMARY_KEY, "{ not json").expect("書き込み失敗");
    let store = ProjectStore::new(backend);

    let err = store.load().unwrap_err();
    assert!(err.is_corrupt_data(), "CorruptDataではない: {:?}", err);
}

/// activeItemId が null なら最初のシーケンスが選ばれる
#[test]
fn test_active_item_resolved_on_load() {
    let mut backend = MemoryStore::new();
    backend
        .set(
            PRIMARY_KEY,
            r#"{"panelItems":[{"type":"schedule_break","id":10,"name":"DAY 1"},{"type":"sequence","id":11,"name":"X"}],"activeItemId":null,"projectInfo":{}}"#,
        )
        .expect("書き込み失敗");
    let store = ProjectStore::new(backend);

    match store.load().expect("読み込み失敗") {
        LoadOutcome::Loaded(state) => assert_eq!(state.active_item_id, Some(ItemId(11))),
        other => panic!("読み込まれていない: {:?}", other),
    }
}

/// 控えだけがある場合は復元を提案し、復元すると通常の保存先へそのままコピーされる
#[test]
fn test_restore_backup() {
    let state = sample_state();
    let mut store = ProjectStore::new(MemoryStore::new());
    store.save_backup(&state).expect("控えの保存失敗");

    assert_eq!(store.load().expect("読み込み失敗"), LoadOutcome::NoProject { backup_available: true });

    let restored = store.restore_backup().expect("復元失敗");
    assert_eq!(restored, state);

    let primary = store.backend().get(PRIMARY_KEY).expect("読み込み失敗");
    let backup = store.backend().get(BACKUP_KEY).expect("読み込み失敗");
    assert_eq!(primary, backup);
}

/// 控えがなければ復元できない
#[test]
fn test_restore_without_backup() {
    let mut store = ProjectStore::new(MemoryStore::new());
    assert!(store.restore_backup().is_err());
}

/// クリアで両方のキーが消える
#[test]
fn test_clear_removes_both_slots() {
    let state = sample_state();
    let mut store = ProjectStore::new(MemoryStore::new());
    store.save(&state).expect("保存失敗");
    store.save_backup(&state).expect("控えの保存失敗");

    store.clear().expect("削除失敗");
    assert!(store.backend().is_empty());
}

/// ファイル保存領域でも同じように動く
#[test]
fn test_file_store_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let state = sample_state();

    {
        let backend = FileStore::open(dir.path().join("storage")).expect("保存領域を開けない");
        let mut store = ProjectStore::new(backend);
        store.save(&state).expect("保存失敗");
    }

    let backend = FileStore::open(dir.path().join("storage")).expect("保存領域を開けない");
    assert!(backend.dir().join("projectData.json").exists());
    assert!(!backend.dir().join("projectData.json.tmp").exists());

    let store = ProjectStore::new(backend);
    match store.load().expect("読み込み失敗") {
        LoadOutcome::Loaded(loaded) => assert_eq!(loaded, state),
        other => panic!("読み込まれていない: {:?}", other),
    }
}

/// ファイル保存領域は不正なキーを拒否する
#[test]
fn test_file_store_rejects_bad_key() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut backend = FileStore::open(dir.path()).expect("保存領域を開けない");
    assert!(backend.set("../escape", "{}").is_err());
    assert!(backend.get("a/b").is_err());
    assert!(backend.get("missing").expect("読み込み失敗").is_none());
    backend.remove("missing").expect("存在しないキーの削除は成功する");
}

/// 設定の保存領域ディレクトリで開き直すと同じプロジェクトが読み込まれる
#[test]
fn test_open_with_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config {
        storage_dir: Some(dir.path().join("toshoot")),
        ..Default::default()
    };

    let (mut manager, startup) = ProjectManager::open_with_config(&config).expect("開始失敗");
    assert_eq!(startup, StartupState::FirstRun { backup_available: false });
    manager.create_sequence(Some("Pier"));
    let saved = manager.state().clone();
    drop(manager);

    let (manager, startup) = ProjectManager::open_with_config(&config).expect("開始失敗");
    assert_eq!(startup, StartupState::Loaded);
    assert_eq!(manager.state(), &saved);
}
