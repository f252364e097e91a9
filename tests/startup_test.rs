//! 起動処理の統合テスト
//!
//! 設定ファイルの読み込みから保存領域を開くまでを検証。
//! HOME を差し替えるため、このファイルのテストは1つだけにする。

use tempfile::tempdir;
use toshoot::{Config, ProjectManager, ScheduleView, StartupState};

/// 設定ファイルの保存領域と1ページの件数が使われる
#[test]
fn test_open_default_reads_config_file() {
    let home = tempdir().expect("Failed to create temp dir");
    std::env::set_var("HOME", home.path());

    let storage = home.path().join("schedule-data");
    let config = Config {
        storage_dir: Some(storage.clone()),
        scenes_per_page: 2,
        ..Default::default()
    };
    let config_path = Config::config_path().expect("設定ファイルのパス取得失敗");
    assert!(config_path.starts_with(home.path()));
    config.save().expect("設定の保存失敗");

    let (mut manager, startup) = ProjectManager::open_default().expect("開始失敗");
    assert_eq!(startup, StartupState::FirstRun { backup_available: false });
    manager.create_sequence(Some("Pier"));
    for n in 1..=3 {
        manager
            .add_scene(toshoot::common::SceneFields {
                number: n.to_string(),
                ..Default::default()
            })
            .expect("シーン追加失敗");
    }
    match manager.view() {
        ScheduleView::Sequence { page, .. } => assert_eq!(page.total_pages, 2),
        other => panic!("シーケンス表示ではない: {:?}", other),
    }
    assert!(storage.join("projectData.json").exists());
    drop(manager);

    let (manager, startup) = ProjectManager::open_default().expect("開始失敗");
    assert_eq!(startup, StartupState::Loaded);
    assert_eq!(manager.state().scene_count(), 3);
}
